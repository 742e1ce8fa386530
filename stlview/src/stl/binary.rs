//! Binary STL decoding.
//!
//! ```text
//! u8[80]      header, ignored
//! u32         triangle count N (little-endian)
//! N records of 50 bytes:
//!     f32[3]  normal
//!     f32[3]  vertex 1
//!     f32[3]  vertex 2
//!     f32[3]  vertex 3
//!     u16     attribute byte count, ignored
//! ```
//!
//! A record holding NaN or infinities is dropped and decoding goes on; a stream that ends
//! inside a record aborts the whole load.

use std::io::{self, Read};

use tracing::{debug, warn};

use super::error::{LoadError, LoadResult};
use super::format::{COUNT_SIZE, HEADER_SIZE, MAX_TRIANGLES, RECORD_SIZE};
use super::triangle::{DecodedTriangles, Triangle};
use crate::math::*;

// Reserve no more than this up front, the declared count is untrusted.
const MAX_PREALLOCATED_TRIANGLES: usize = 1 << 16;

/// Decodes a binary STL from `reader`, positioned at the first header byte.
pub fn decode_binary<R: Read>(mut reader: R) -> LoadResult<DecodedTriangles> {
    let mut prefix = [0u8; (HEADER_SIZE + COUNT_SIZE) as usize];
    reader.read_exact(&mut prefix).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => LoadError::corrupted("file too small for binary STL format"),
        kind => LoadError::read(format!("failed to read binary header: {kind}")),
    })?;
    let count_bytes = &prefix[HEADER_SIZE as usize..];
    let triangle_count = u32::from_le_bytes([count_bytes[0], count_bytes[1], count_bytes[2], count_bytes[3]]);

    if triangle_count == 0 {
        return Err(LoadError::empty("STL file contains no triangles"));
    }
    if triangle_count >= MAX_TRIANGLES {
        return Err(LoadError::corrupted(format!("triangle count seems unreasonably large: {triangle_count}")));
    }

    let mut decoded = DecodedTriangles::default();
    decoded.triangles.reserve((triangle_count as usize).min(MAX_PREALLOCATED_TRIANGLES));

    let mut record = [0u8; RECORD_SIZE as usize];
    for index in 0..triangle_count {
        reader.read_exact(&mut record).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                LoadError::read(format!("stream ended inside triangle {index} of {triangle_count}"))
            }
            kind => LoadError::read(format!("error reading triangle {index}: {kind}")),
        })?;

        let triangle = parse_record(&record);
        if !triangle.is_finite() {
            debug!(index, "skipping binary triangle with non-finite values");
            decoded.skipped_non_finite += 1;
            continue;
        }
        if !decoded.push_validated(triangle) {
            debug!(index, "skipping degenerate binary triangle");
        }
    }

    if decoded.skipped() > 0 {
        warn!(
            non_finite = decoded.skipped_non_finite,
            degenerate = decoded.skipped_degenerate,
            kept = decoded.triangles.len(),
            "dropped unusable triangles from binary STL"
        );
    }
    if decoded.triangles.is_empty() {
        return Err(LoadError::empty("no valid triangles found in file"));
    }
    debug!(declared = triangle_count, kept = decoded.triangles.len(), "decoded binary STL");
    Ok(decoded)
}

/// Splits one 50-byte record into normal and corners; the attribute field is ignored.
fn parse_record(record: &[u8; RECORD_SIZE as usize]) -> Triangle {
    Triangle::new(
        read_vec3(&record[0..12]),
        read_vec3(&record[12..24]),
        read_vec3(&record[24..36]),
        read_vec3(&record[36..48]),
    )
}

fn read_vec3(buf: &[u8]) -> Vec3 {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vec3::new(x, y, z)
}

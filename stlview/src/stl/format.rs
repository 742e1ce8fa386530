//! Binary/ASCII classification by structural evidence.
//!
//! A file is binary when the triangle count declared after the 80-byte header accounts for
//! the file length exactly; otherwise it is ASCII when its first line starts with `solid`.
//! Extensions are never consulted.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

pub const HEADER_SIZE: u64 = 80;
pub const COUNT_SIZE: u64 = 4;
pub const RECORD_SIZE: u64 = 50;

/// Declared triangle counts at or above this are treated as a corrupted header.
pub const MAX_TRIANGLES: u32 = 50_000_000;

// Enough to hold any sane `solid <name>` line.
const FIRST_LINE_LIMIT: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StlFormat {
    #[default]
    Unknown,
    Binary,
    Ascii,
}

impl StlFormat {
    pub fn label(self) -> &'static str {
        match self {
            StlFormat::Unknown => "Unknown",
            StlFormat::Binary => "Binary STL",
            StlFormat::Ascii => "ASCII STL",
        }
    }
}

impl fmt::Display for StlFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The triangle count a file claims in its binary header, next to its real length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    pub triangle_count: u32,
    pub file_size: u64,
}

impl BinaryHeader {
    /// Reads the declared count from the start of `reader`.
    ///
    /// Returns `None` when the stream is too short to hold a header and a count.
    pub fn read<R: Read + Seek>(reader: &mut R) -> io::Result<Option<BinaryHeader>> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        if file_size < HEADER_SIZE + COUNT_SIZE {
            return Ok(None);
        }
        reader.seek(SeekFrom::Start(HEADER_SIZE))?;
        let mut count = [0u8; 4];
        reader.read_exact(&mut count)?;
        Ok(Some(BinaryHeader { triangle_count: u32::from_le_bytes(count), file_size }))
    }

    pub fn expected_size(&self) -> u64 {
        HEADER_SIZE + COUNT_SIZE + RECORD_SIZE * u64::from(self.triangle_count)
    }

    pub fn size_matches(&self) -> bool {
        self.expected_size() == self.file_size
    }

    /// Exact size match with a count in `1..MAX_TRIANGLES`.
    pub fn is_binary(&self) -> bool {
        self.size_matches() && self.triangle_count > 0 && self.triangle_count < MAX_TRIANGLES
    }
}

pub fn sniff_binary<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    Ok(BinaryHeader::read(reader)?.is_some_and(|header| header.is_binary()))
}

pub fn sniff_ascii<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    reader.seek(SeekFrom::Start(0))?;
    let mut line = Vec::new();
    BufReader::new(reader.take(FIRST_LINE_LIMIT)).read_until(b'\n', &mut line)?;
    Ok(starts_with_solid(&String::from_utf8_lossy(&line)))
}

/// Binary test first, then ASCII.
pub fn sniff<R: Read + Seek>(reader: &mut R) -> io::Result<StlFormat> {
    if sniff_binary(reader)? {
        Ok(StlFormat::Binary)
    } else if sniff_ascii(reader)? {
        Ok(StlFormat::Ascii)
    } else {
        Ok(StlFormat::Unknown)
    }
}

pub fn is_binary_stl<P: AsRef<Path>>(path: P) -> bool {
    File::open(path).and_then(|mut file| sniff_binary(&mut file)).unwrap_or(false)
}

pub fn is_ascii_stl<P: AsRef<Path>>(path: P) -> bool {
    File::open(path).and_then(|mut file| sniff_ascii(&mut file)).unwrap_or(false)
}

/// Classifies a file on disk; unreadable files are `Unknown`.
pub fn detect_format<P: AsRef<Path>>(path: P) -> StlFormat {
    File::open(path).and_then(|mut file| sniff(&mut file)).unwrap_or(StlFormat::Unknown)
}

/// Case-insensitive `solid` check on a first line, ignoring a UTF-8 byte order mark.
pub(crate) fn starts_with_solid(line: &str) -> bool {
    line.trim_start_matches('\u{FEFF}').trim().to_lowercase().starts_with("solid")
}

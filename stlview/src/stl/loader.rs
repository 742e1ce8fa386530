//! The load pipeline: pre-flight checks, format detection, decoding, post-processing.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::ascii::decode_ascii;
use super::binary::decode_binary;
use super::error::{LoadError, LoadResult, LoadStatus};
use super::format::{BinaryHeader, COUNT_SIZE, HEADER_SIZE, MAX_TRIANGLES, RECORD_SIZE, StlFormat, sniff};
use super::options::LoadOptions;
use super::triangle::Triangle;
use crate::math::*;
use crate::mesh::process::build_mesh;
use crate::mesh::StlMesh;

/// Loads and post-processes the STL file at `path`.
pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> LoadResult<StlMesh> {
    let path = path.as_ref();
    load_path(path, options).inspect_err(|e| {
        warn!(path = %path.display(), status = %e.status(), error = %e, "failed to load STL");
    })
}

fn load_path(path: &Path, options: &LoadOptions) -> LoadResult<StlMesh> {
    let mut file = open(path)?;
    let format = classify(&mut file).map_err(|e| LoadError::read(format!("failed to inspect file: {}", e.kind())))?;
    debug!(path = %path.display(), %format, "detected format");

    file.seek(SeekFrom::Start(0))
        .map_err(|e| LoadError::read(format!("failed to rewind file: {}", e.kind())))?;
    let reader = BufReader::new(file);
    let decoded = match format {
        StlFormat::Binary => decode_binary(reader)?,
        StlFormat::Ascii => decode_ascii(reader)?,
        StlFormat::Unknown => return Err(LoadError::invalid_format("file is neither binary nor ASCII STL")),
    };
    debug!(triangles = decoded.triangles.len(), skipped = decoded.skipped(), "decoded triangles");

    Ok(build_mesh(decoded, format, display_name(path), options))
}

fn open(path: &Path) -> LoadResult<File> {
    let cannot_open = |kind| LoadError::CannotOpenFile { path: path.to_path_buf(), kind };
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound { path: path.to_path_buf() },
        kind => cannot_open(kind),
    })?;
    if metadata.is_dir() {
        return Err(cannot_open(io::ErrorKind::IsADirectory));
    }
    if !metadata.is_file() {
        return Err(cannot_open(io::ErrorKind::InvalidInput));
    }
    if metadata.len() == 0 {
        return Err(LoadError::empty("file is empty"));
    }
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::FileNotFound { path: path.to_path_buf() },
        kind => cannot_open(kind),
    })
}

/// Sniffs the format. An unrecognised file whose binary header is plainly broken is still
/// handed to the binary decoder so that it fails as empty or corrupted rather than invalid.
///
/// Only files that look binary qualify: whole records after the prefix, and at least one
/// non-text byte in the prefix. Text files always stay `Unknown`.
fn classify(file: &mut File) -> io::Result<StlFormat> {
    let format = sniff(file)?;
    if format != StlFormat::Unknown {
        return Ok(format);
    }
    let Some(header) = BinaryHeader::read(file)? else {
        return Ok(StlFormat::Unknown);
    };
    let prefix_size = HEADER_SIZE + COUNT_SIZE;
    let declares_nothing = header.triangle_count == 0 && header.file_size == prefix_size;
    let broken_count = declares_nothing || header.triangle_count >= MAX_TRIANGLES;
    if !broken_count || (header.file_size - prefix_size) % RECORD_SIZE != 0 {
        return Ok(StlFormat::Unknown);
    }

    file.seek(SeekFrom::Start(0))?;
    let mut prefix = [0u8; (HEADER_SIZE + COUNT_SIZE) as usize];
    file.read_exact(&mut prefix)?;
    Ok(if prefix.iter().any(|&b| !is_text_byte(b)) { StlFormat::Binary } else { StlFormat::Unknown })
}

fn is_text_byte(b: u8) -> bool {
    b.is_ascii_graphic() || b.is_ascii_whitespace() || b >= 0x80
}

fn display_name(path: &Path) -> PathBuf {
    path.file_name().map(PathBuf::from).unwrap_or_else(|| path.to_path_buf())
}

/// Holds the outcome of the most recent load, for callers that poll results after the fact.
///
/// Every [`StlLoader::load_file`] starts from a cleared state; a failed load keeps only the
/// status and the error string.
#[derive(Debug, Clone, Default)]
pub struct StlLoader {
    options: LoadOptions,
    status: Option<LoadStatus>,
    error: String,
    mesh: Option<StlMesh>,
}

impl StlLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LoadOptions) {
        self.options = options;
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> LoadStatus {
        self.clear();
        let status = match load(path, &self.options) {
            Ok(mesh) => {
                self.mesh = Some(mesh);
                LoadStatus::Success
            }
            Err(e) => {
                self.error = e.to_string();
                e.status()
            }
        };
        self.status = Some(status);
        status
    }

    pub fn clear(&mut self) {
        self.status = None;
        self.error.clear();
        self.mesh = None;
    }

    /// `None` until the first load.
    pub fn status(&self) -> Option<LoadStatus> {
        self.status
    }

    /// Empty unless the last load failed.
    pub fn error_string(&self) -> &str {
        &self.error
    }

    pub fn mesh(&self) -> Option<&StlMesh> {
        self.mesh.as_ref()
    }

    pub fn vertex_data(&self) -> &[f32] {
        self.mesh.as_ref().map(|m| m.vertex_data()).unwrap_or_default()
    }

    pub fn indices(&self) -> &[u32] {
        self.mesh.as_ref().map(|m| m.indices.as_slice()).unwrap_or_default()
    }

    pub fn triangles(&self) -> &[Triangle] {
        self.mesh.as_ref().map(|m| m.triangles.as_slice()).unwrap_or_default()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.triangle_count())
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.vertex_count())
    }

    pub fn format(&self) -> StlFormat {
        self.mesh.as_ref().map_or(StlFormat::Unknown, |m| m.format)
    }

    pub fn format_label(&self) -> &'static str {
        self.format().label()
    }

    /// The sentinel (invalid) box while nothing is loaded.
    pub fn bounding_box(&self) -> BoundingBox {
        self.mesh.as_ref().map_or_else(BoundingBox::new, |m| m.bounding_box)
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.mesh.as_ref().map(|m| m.file_name.as_path())
    }
}

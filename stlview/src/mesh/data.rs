use std::path::PathBuf;

use super::vertex::*;
use crate::math::*;
use crate::stl::{StlFormat, Triangle};

/// A loaded, post-processed STL model ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StlMesh {
    pub file_name: PathBuf,
    pub format: StlFormat,
    /// Surviving triangles, after centering and normalization.
    pub triangles: Vec<Triangle>,
    /// Three per triangle, or the welded unique set when `indices` is not empty.
    pub vertices: Vec<Vertex>,
    /// One entry per triangle corner into `vertices`; empty unless vertices were merged.
    pub indices: Vec<u32>,
    pub bounding_box: BoundingBox,
    /// Triangles the decoder dropped as non-finite or degenerate.
    pub skipped_triangles: usize,
}

impl StlMesh {
    /// Interleaved `px py pz nx ny nz` floats, one group per vertex.
    pub fn vertex_data(&self) -> &[f32] {
        interleaved(&self.vertices)
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn format_label(&self) -> &'static str {
        self.format.label()
    }
}

//! Post-processing of decoded triangles, always in this order: bounding box, centering,
//! normalization, flat vertex buffer, welding.

use std::path::PathBuf;

use tracing::debug;

use super::data::StlMesh;
use super::vertex::Vertex;
use super::weld::weld;
use crate::math::*;
use crate::stl::{DecodedTriangles, LoadOptions, StlFormat, Triangle};

/// Stored normals shorter than this (squared) are treated as missing.
pub const MISSING_NORMAL_LENGTH_SQUARED: f32 = 0.001;

/// The longest side of a normalized model.
pub const NORMALIZED_EXTENT: f32 = 2.0;

pub fn bounding_box(triangles: &[Triangle]) -> BoundingBox {
    BoundingBox::from_points(triangles.iter().flat_map(|t| t.vertices))
}

/// Moves the model so that the bounding-box center lands on the origin.
pub fn center(triangles: &mut [Triangle], bbox: &mut BoundingBox) {
    if !bbox.is_valid() {
        return;
    }
    let offset = -bbox.center;
    for triangle in triangles.iter_mut() {
        for v in triangle.vertices.iter_mut() {
            *v += offset;
        }
    }
    bbox.translate(offset);
}

/// Scales the model uniformly so that its longest side measures [`NORMALIZED_EXTENT`].
pub fn normalize(triangles: &mut [Triangle], bbox: &mut BoundingBox) {
    if !bbox.is_valid() || bbox.max_dimension <= 0.0 {
        return;
    }
    let scale = NORMALIZED_EXTENT / bbox.max_dimension;
    for triangle in triangles.iter_mut() {
        for v in triangle.vertices.iter_mut() {
            *v *= scale;
        }
    }
    bbox.scale(scale);
}

/// The normal written for every corner of `triangle`.
pub fn emitted_normal(triangle: &Triangle, recompute: bool) -> Vec3 {
    if recompute || triangle.normal.length_squared() < MISSING_NORMAL_LENGTH_SQUARED {
        triangle.face_normal()
    } else {
        triangle.normal
    }
}

/// Three vertices per triangle, in corner order, sharing the triangle's normal.
pub fn flat_vertices(triangles: &[Triangle], recompute_normals: bool) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(triangles.len() * 3);
    for triangle in triangles {
        let normal = emitted_normal(triangle, recompute_normals);
        vertices.extend(triangle.vertices.iter().map(|&position| Vertex::new(position, normal)));
    }
    vertices
}

/// Runs the full post-processing chain over a successful decode.
pub fn build_mesh(decoded: DecodedTriangles, format: StlFormat, file_name: PathBuf, options: &LoadOptions) -> StlMesh {
    let skipped_triangles = decoded.skipped();
    let mut triangles = decoded.triangles;

    let mut bbox = bounding_box(&triangles);
    debug!(min = ?bbox.min, max = ?bbox.max, "bounding box");
    if options.auto_center {
        center(&mut triangles, &mut bbox);
    }
    if options.auto_normalize {
        normalize(&mut triangles, &mut bbox);
    }

    let mut vertices = flat_vertices(&triangles, options.recompute_normals);
    let mut indices = Vec::new();
    if options.merge_vertices {
        let corners = vertices.len();
        let welded = weld(&vertices, options.effective_tolerance());
        debug!(corners, unique = welded.vertices.len(), "welded vertices");
        vertices = welded.vertices;
        indices = welded.indices;
    }

    StlMesh { file_name, format, triangles, vertices, indices, bounding_box: bbox, skipped_triangles }
}

use crate::math::*;

/// Triangles with a smaller area are treated as degenerate.
pub const MIN_TRIANGLE_AREA: f32 = 1e-10;

/// Two corners closer than this (squared distance) are treated as the same point.
pub const MIN_VERTEX_DISTANCE_SQUARED: f32 = 1e-12;

/// Cross products at or below this squared length have no usable direction.
const MIN_NORMAL_LENGTH_SQUARED: f32 = 1e-12;

/// One STL facet: the normal stored in the file and the three corners in file order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub normal: Vec3,
    pub vertices: [Vec3; 3],
}

impl Triangle {
    pub const fn new(normal: Vec3, v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self { normal, vertices: [v1, v2, v3] }
    }

    /// `(v2 - v1) x (v3 - v1)`, unnormalized.
    pub fn cross(&self) -> Vec3 {
        let [v1, v2, v3] = self.vertices;
        cross(v2 - v1, v3 - v1)
    }

    pub fn area(&self) -> f32 {
        self.cross().length() * 0.5
    }

    /// Unit normal derived from the winding, or +Z when the corners span no plane.
    pub fn face_normal(&self) -> Vec3 {
        let n = self.cross();
        if n.length_squared() > MIN_NORMAL_LENGTH_SQUARED { n.normalized() } else { Vec3::UNIT_Z }
    }

    /// True if the normal and all corners are free of NaN and infinities.
    pub fn is_finite(&self) -> bool {
        self.normal.is_finite() && self.vertices.iter().all(|v| v.is_finite())
    }
}

/// Decoder output: the triangles that survived plus how many were dropped and why.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedTriangles {
    pub triangles: Vec<Triangle>,
    /// Binary records carrying NaN or infinite values.
    pub skipped_non_finite: usize,
    /// Facets rejected by [`is_valid_triangle`].
    pub skipped_degenerate: usize,
}

impl DecodedTriangles {
    pub fn skipped(&self) -> usize {
        self.skipped_non_finite + self.skipped_degenerate
    }

    /// Appends `triangle` if it passes [`is_valid_triangle`], counting it as degenerate otherwise.
    pub(crate) fn push_validated(&mut self, triangle: Triangle) -> bool {
        if is_valid_triangle(&triangle) {
            self.triangles.push(triangle);
            true
        } else {
            self.skipped_degenerate += 1;
            false
        }
    }
}

/// The single degeneracy check shared by both decoders.
///
/// Rejects triangles whose area is below [`MIN_TRIANGLE_AREA`] and triangles with two
/// corners within [`MIN_VERTEX_DISTANCE_SQUARED`] of each other.
pub fn is_valid_triangle(triangle: &Triangle) -> bool {
    let area = triangle.area();
    if area.is_nan() || area < MIN_TRIANGLE_AREA {
        return false;
    }
    let [v1, v2, v3] = triangle.vertices;
    [(v1, v2), (v2, v3), (v1, v3)]
        .iter()
        .all(|&(a, b)| (a - b).length_squared() > MIN_VERTEX_DISTANCE_SQUARED)
}

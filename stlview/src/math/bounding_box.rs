use crate::math::*;

/// Axis-aligned bounds of a mesh plus the derived values the post-processor needs.
///
/// A reset box holds `min = +inf` and `max = -inf`, meaning "no points yet".
/// `center`, `size` and `max_dimension` are only meaningful after [`BoundingBox::finalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
    pub center: Vec3,
    pub size: Vec3,
    pub max_dimension: f32,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
            center: Vec3::ZERO,
            size: Vec3::ZERO,
            max_dimension: 0.0,
        }
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut bbox = Self::new();
        for p in points {
            bbox.update(p);
        }
        bbox.finalize();
        bbox
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn update(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn finalize(&mut self) {
        if !self.is_valid() {
            return;
        }
        self.center = (self.min + self.max) * 0.5;
        self.size = self.max - self.min;
        self.max_dimension = self.size.max_element();
    }

    pub fn is_valid(&self) -> bool {
        self.min.x != f32::INFINITY && self.max.x != f32::NEG_INFINITY
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.min += offset;
        self.max += offset;
        self.center += offset;
    }

    pub fn scale(&mut self, factor: f32) {
        self.min *= factor;
        self.max *= factor;
        self.center *= factor;
        self.size *= factor;
        self.max_dimension *= factor;
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

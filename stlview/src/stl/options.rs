pub const DEFAULT_VERTEX_TOLERANCE: f32 = 1e-6;

/// Post-processing switches applied after a successful decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Translate the mesh so its bounding-box center sits at the origin.
    pub auto_center: bool,
    /// Uniformly scale the mesh so its longest side measures 2.
    pub auto_normalize: bool,
    /// Ignore normals stored in the file and derive them from the winding.
    pub recompute_normals: bool,
    /// Weld corners closer than `vertex_tolerance` and emit an index buffer.
    pub merge_vertices: bool,
    /// Euclidean distance under which two corners are the same vertex.
    pub vertex_tolerance: f32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            auto_center: true,
            auto_normalize: false,
            recompute_normals: false,
            merge_vertices: true,
            vertex_tolerance: DEFAULT_VERTEX_TOLERANCE,
        }
    }
}

impl LoadOptions {
    /// No centering, scaling, normal recomputation or welding.
    pub fn raw() -> Self {
        Self { auto_center: false, auto_normalize: false, recompute_normals: false, merge_vertices: false, ..Self::default() }
    }

    pub fn with_auto_center(mut self, enable: bool) -> Self {
        self.auto_center = enable;
        self
    }

    pub fn with_auto_normalize(mut self, enable: bool) -> Self {
        self.auto_normalize = enable;
        self
    }

    pub fn with_recompute_normals(mut self, enable: bool) -> Self {
        self.recompute_normals = enable;
        self
    }

    pub fn with_merge_vertices(mut self, enable: bool) -> Self {
        self.merge_vertices = enable;
        self
    }

    /// Negative, NaN and infinite tolerances become 0 (exact matching).
    pub fn with_vertex_tolerance(mut self, tolerance: f32) -> Self {
        self.vertex_tolerance = sanitize_tolerance(tolerance);
        self
    }

    pub(crate) fn effective_tolerance(&self) -> f32 {
        sanitize_tolerance(self.vertex_tolerance)
    }
}

fn sanitize_tolerance(tolerance: f32) -> f32 {
    if tolerance.is_finite() && tolerance > 0.0 { tolerance } else { 0.0 }
}

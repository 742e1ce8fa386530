//! STL loading and mesh preparation.
//!
//! [`stl::load`] reads a binary or ASCII STL file, drops unusable triangles and turns the
//! remaining triangle soup into a renderer-ready [`mesh::StlMesh`]: interleaved
//! position+normal floats, an optional welded index buffer and the model's bounding box.

pub mod math;
pub mod mesh;
pub mod stl;

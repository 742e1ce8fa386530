use crate::math::*;
use bytemuck::{Pod, Zeroable};

/// Number of floats one vertex occupies in the interleaved buffer.
pub const FLOATS_PER_VERTEX: usize = 6;

/// A mesh corner as uploaded to the GPU: position followed by normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Default, Zeroable, Pod)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Views a vertex list as the interleaved `px py pz nx ny nz` float stream.
pub fn interleaved(vertices: &[Vertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}

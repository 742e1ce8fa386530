pub mod bounding_box;
pub mod vec3;

pub use bounding_box::*;
pub use vec3::*;

pub mod data;
pub mod process;
pub mod vertex;
pub mod weld;

pub use data::*;
pub use vertex::*;
pub use weld::{Welded, weld, weld_linear};

pub mod ascii;
pub mod binary;
pub mod error;
pub mod format;
pub mod loader;
pub mod options;
pub mod triangle;

pub use ascii::decode_ascii;
pub use binary::decode_binary;
pub use error::*;
pub use format::*;
pub use loader::*;
pub use options::*;
pub use triangle::*;

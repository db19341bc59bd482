//! Utility functions

pub mod path;
pub mod reader;
pub mod writer;

pub use path::{export_file_name, strip_png_extension, transform_asset_path};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

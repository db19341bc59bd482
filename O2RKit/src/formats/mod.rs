//! Binary formats handled by `o2rkit`

pub mod dynos;
pub mod geo;
pub mod otr;
pub mod texture;

pub use dynos::{ResourceRecord, ResourceRegistry, parse_container, read_container};
pub use geo::{GeoCommand, GeoLayout, GeoOpcode, disassemble};
pub use otr::{ResourceHeader, ResourceType, export_record, parse_texture, write_texture};
pub use texture::{DecodedTexture, EncodedTexture, PixelSource, RasterImage, TextureFormat};

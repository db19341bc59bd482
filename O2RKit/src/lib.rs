//! # o2rkit
//!
//! Tools for moving Super Mario 64 assets into the OTR/O2R resource format
//! used by the PC port runtimes.
//!
//! ## Supported Formats
//!
//! - **Texture packs** - sm64-port `.zip` packs rewritten to the `alt/` tree
//! - **N64 textures** - RGBA32/16, CI4/8, I4/8 and IA4/8/16 encode and decode
//! - **OTR resources** - 64-byte resource header and texture payloads
//! - **Geo layouts** - bytecode disassembly of SM64 scene graph scripts
//! - **DynOS containers** - tagged light, texture and geo layout records
//!
//! ## Quick Start
//!
//! ### Converting a Texture Pack
//!
//! ```no_run
//! use o2rkit::metadata::NoMetadata;
//! use o2rkit::pack::{PackOptions, convert_pack_file};
//!
//! let report = convert_pack_file("pack.zip", None, &PackOptions::default(), &NoMetadata)?;
//! println!("{} textures converted", report.converted);
//! # Ok::<(), o2rkit::Error>(())
//! ```
//!
//! ### Encoding a Single Texture
//!
//! ```no_run
//! use o2rkit::formats::otr::write_texture;
//! use o2rkit::formats::texture::{EncodedTexture, TextureFormat};
//!
//! let png = std::fs::read("mario_eyes.png")?;
//! let texture = EncodedTexture::from_png(&png, TextureFormat::Rgba16)?;
//! std::fs::write("mario_eyes", write_texture(&texture))?;
//! # Ok::<(), o2rkit::Error>(())
//! ```
//!
//! ### Disassembling a Geo Layout
//!
//! ```
//! use o2rkit::formats::geo::{GeoOpcode, disassemble};
//!
//! let layout = disassemble(&[0x01, 0x00, 0x00, 0x00])?;
//! assert_eq!(layout.commands[0].opcode, GeoOpcode::End);
//! # Ok::<(), o2rkit::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `o2rkit` command-line binary

pub mod error;
pub mod formats;
pub mod metadata;
pub mod pack;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::dynos::{
        DataTag, LightRecord, ResourceRecord, ResourceRegistry, parse_container, read_container,
    };
    pub use crate::formats::geo::{GeoArg, GeoCommand, GeoLayout, GeoOpcode, disassemble};
    pub use crate::formats::otr::{
        ResourceHeader, ResourceType, export_record, parse_texture, write_texture,
    };
    pub use crate::formats::texture::{
        DecodedTexture, EncodedTexture, PixelSource, RasterImage, TextureFormat,
    };
    pub use crate::metadata::{
        MetadataDirectory, MetadataLookup, MetadataTable, NoMetadata, TextureMetadata,
    };
    pub use crate::pack::{PackOptions, PackReport, convert_pack, convert_pack_file, find_texture_packs};
    pub use crate::utils::{BinaryReader, BinaryWriter};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

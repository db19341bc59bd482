//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

/// Texture pack commands
#[derive(Subcommand)]
pub enum PackCommands {
    /// Convert a texture pack, or every pack in a directory
    Convert {
        /// Source .zip pack or directory of packs
        source: PathBuf,

        /// Output .zip (single pack only; defaults to cnv_<name>)
        destination: Option<PathBuf>,

        /// Only rename entries; keep PNGs as they are
        #[arg(long)]
        raw: bool,

        /// Texture metadata (JSON file or per-region directory)
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Texture encoding for converted PNGs
        #[arg(short, long, default_value = "RGBA32")]
        format: String,

        /// Resource version written into texture headers
        #[arg(long, default_value_t = crate::formats::otr::TEXTURE_VERSION)]
        resource_version: u32,
    },

    /// Show the output path of every entry in a pack
    Paths {
        /// Source .zip pack
        source: PathBuf,

        /// Show paths for rename-only conversion
        #[arg(long)]
        raw: bool,
    },
}

/// Texture commands
#[derive(Subcommand)]
pub enum TextureCommands {
    /// Encode a PNG as an OTR texture resource
    Encode {
        /// Source PNG
        source: PathBuf,

        /// Output resource file
        destination: PathBuf,

        /// Texture encoding (RGBA32, RGBA16, CI4, CI8, I4, I8, IA4, IA8, IA16)
        #[arg(short, long, default_value = "RGBA32")]
        format: String,
    },

    /// Decode an OTR texture resource to PNG
    Decode {
        /// Source resource file
        source: PathBuf,

        /// Output PNG
        destination: PathBuf,

        /// Palette texture resource for CI4/CI8
        #[arg(long)]
        tlut: Option<PathBuf>,
    },

    /// Show info about an OTR texture resource
    Info {
        /// Resource file
        path: PathBuf,
    },
}

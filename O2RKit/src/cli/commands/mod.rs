use clap::Subcommand;
use std::path::PathBuf;

pub mod definitions;
pub mod dynos;
mod execute;
pub mod geo;
pub mod pack;
pub mod texture;

use definitions::{PackCommands, TextureCommands};

/// Parse a byte offset given in decimal or `0x` hex
///
/// # Errors
/// Returns a message if `s` is not a valid number.
pub fn parse_offset(s: &str) -> Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("Invalid offset '{s}'. Use decimal or 0x-prefixed hex"))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Texture pack conversion (sm64-port .zip packs)
    Pack {
        #[command(subcommand)]
        command: PackCommands,
    },

    /// Single texture operations (PNG <-> OTR texture resource)
    Texture {
        #[command(subcommand)]
        command: TextureCommands,
    },

    /// Disassemble a geo layout script
    Geo {
        /// Raw big-endian geo layout bytes
        path: PathBuf,

        /// Byte offset to start at (decimal or 0x hex)
        #[arg(long, default_value = "0", value_parser = parse_offset)]
        offset: usize,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Read a DynOS .bin container
    Dynos {
        /// DynOS container file
        path: PathBuf,

        /// Write texture records as OTR resources into this directory
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Texture metadata (JSON file or per-region directory)
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
}

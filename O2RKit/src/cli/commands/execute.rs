//! Command execution implementations

use super::Commands;
use super::definitions::{PackCommands, TextureCommands};
use super::{dynos, geo, pack, texture};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Pack { command } => command.execute(),
            Commands::Texture { command } => command.execute(),
            Commands::Geo { path, offset, json } => geo::execute(path, *offset, *json),
            Commands::Dynos {
                path,
                export,
                metadata,
                json,
            } => dynos::execute(path, export.as_deref(), metadata.as_deref(), *json),
        }
    }
}

impl PackCommands {
    /// Execute the selected pack command.
    ///
    /// # Errors
    /// Returns an error if the underlying pack operation fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            PackCommands::Convert {
                source,
                destination,
                raw,
                metadata,
                format,
                resource_version,
            } => pack::convert(
                source,
                destination.as_deref(),
                *raw,
                metadata.as_deref(),
                format,
                *resource_version,
            ),
            PackCommands::Paths { source, raw } => pack::paths(source, *raw),
        }
    }
}

impl TextureCommands {
    /// Execute the selected texture command.
    ///
    /// # Errors
    /// Returns an error if the underlying texture operation fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            TextureCommands::Encode {
                source,
                destination,
                format,
            } => texture::encode(source, destination, format),
            TextureCommands::Decode {
                source,
                destination,
                tlut,
            } => texture::decode(source, destination, tlut.as_deref()),
            TextureCommands::Info { path } => texture::info(path),
        }
    }
}

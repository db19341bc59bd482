//! Texture pack conversion
//!
//! Rewrites an sm64-port texture pack (`.zip` of PNGs under `gfx/`) into the
//! `alt/` layout the runtime loads, optionally converting every PNG into a
//! binary texture resource.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

mod batch;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::formats::otr::{ResourceHeader, ResourceType, TEXTURE_VERSION, write_texture_with_header};
use crate::formats::texture::{EncodedTexture, TextureFormat};
use crate::metadata::{self, MetadataLookup};
use crate::utils::{strip_png_extension, transform_asset_path};

pub use batch::{BatchPackResult, batch_convert, find_texture_packs};

/// Prefix of output archives written next to their input
pub const OUTPUT_PREFIX: &str = "cnv_";

/// Options for a pack conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    /// Convert PNG entries into binary texture resources
    pub convert_textures: bool,
    /// Encoding used for converted textures
    pub format: TextureFormat,
    /// Resource version written into each texture header
    pub version: u32,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            convert_textures: true,
            format: TextureFormat::Rgba32,
            version: TEXTURE_VERSION,
        }
    }
}

impl PackOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable PNG to texture resource conversion.
    /// Disabled, entries are only renamed.
    #[must_use]
    pub fn with_conversion(mut self, convert: bool) -> Self {
        self.convert_textures = convert;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

/// Summary of one pack conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackReport {
    /// File entries read from the input
    pub entries: usize,
    /// PNGs written as texture resources
    pub converted: usize,
    /// Entries copied under their new name
    pub copied: usize,
    /// Entries with no runtime counterpart (skyboxes)
    pub dropped: usize,
    /// Entries that failed and were left out
    pub failed: usize,
    /// One message per failed entry
    pub failures: Vec<String>,
}

impl PackReport {
    /// Entries present in the output archive
    #[must_use]
    pub fn written(&self) -> usize {
        self.converted + self.copied
    }
}

/// What happened to one input entry
enum Outcome {
    Converted { path: String, data: Vec<u8> },
    Copied { path: String, data: Vec<u8> },
    Dropped,
    Failed { name: String, error: Error },
}

/// Output path an input entry maps to, or `None` if it is dropped
#[must_use]
pub fn output_entry_path(name: &str, options: &PackOptions) -> Option<String> {
    let path = transform_asset_path(name)?;
    if options.convert_textures && is_png(name) {
        Some(strip_png_extension(&path).to_string())
    } else {
        Some(path)
    }
}

fn is_png(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".png")
}

/// Metadata key for a pack entry: its path below `gfx/`
fn metadata_key(name: &str) -> &str {
    name.strip_prefix("gfx/").unwrap_or(name)
}

fn convert_texture(
    name: &str,
    data: &[u8],
    options: &PackOptions,
    lookup: &dyn MetadataLookup,
) -> Result<Vec<u8>> {
    let texture = EncodedTexture::from_png(data, options.format)?;
    let (h_scale, v_scale) = metadata::scale_for(
        lookup,
        metadata_key(name),
        texture.width,
        texture.height,
        options.format,
    )?;
    let texture = texture.with_scale(h_scale, v_scale);
    let header = ResourceHeader::new(ResourceType::Texture, options.version);
    Ok(write_texture_with_header(&texture, &header))
}

fn process_entry(
    name: String,
    data: Vec<u8>,
    options: &PackOptions,
    lookup: &dyn MetadataLookup,
) -> Outcome {
    let Some(path) = output_entry_path(&name, options) else {
        return Outcome::Dropped;
    };

    if options.convert_textures && is_png(&name) {
        match convert_texture(&name, &data, options, lookup) {
            Ok(data) => Outcome::Converted { path, data },
            Err(error) => Outcome::Failed { name, error },
        }
    } else {
        Outcome::Copied { path, data }
    }
}

/// Largest buffer reserved up front from a declared entry size
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// Initial capacity for an entry whose header declares `declared` bytes
fn preallocation(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOCATION, |size| size.min(MAX_PREALLOCATION))
}

/// Read every file entry of a zip archive, in archive order
fn read_entries<R: Read + Seek>(reader: R) -> Result<Vec<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().replace('\\', "/");
        let mut data = Vec::with_capacity(preallocation(file.size()));
        file.read_to_end(&mut data)?;
        entries.push((name, data));
    }

    Ok(entries)
}

/// Convert a texture pack archive from `reader` into `writer`.
///
/// Entries are processed in parallel and written in input order. An entry
/// that fails to convert is logged, counted and left out; it does not abort
/// the pack.
///
/// # Errors
/// Returns an error if the input is not a readable zip archive or the output
/// archive cannot be written.
pub fn convert_pack<R, W>(
    reader: R,
    writer: W,
    options: &PackOptions,
    lookup: &dyn MetadataLookup,
) -> Result<PackReport>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let entries = read_entries(reader)?;
    let mut report = PackReport {
        entries: entries.len(),
        ..PackReport::default()
    };

    let outcomes: Vec<Outcome> = entries
        .into_par_iter()
        .map(|(name, data)| process_entry(name, data, options, lookup))
        .collect();

    let file_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);
    let mut written = HashSet::new();

    for outcome in outcomes {
        let (path, data, converted) = match outcome {
            Outcome::Converted { path, data } => (path, data, true),
            Outcome::Copied { path, data } => (path, data, false),
            Outcome::Dropped => {
                report.dropped += 1;
                continue;
            }
            Outcome::Failed { name, error } => {
                warn!(entry = %name, error = %error, "entry failed to convert");
                report.failed += 1;
                report.failures.push(format!("{name}: {error}"));
                continue;
            }
        };

        if !written.insert(path.clone()) {
            warn!(path = %path, "duplicate output path, keeping the first entry");
            report.failed += 1;
            report.failures.push(format!("{path}: duplicate output path"));
            continue;
        }

        debug!(path = %path, bytes = data.len(), "writing entry");
        zip.start_file(path, file_options)?;
        zip.write_all(&data)?;

        if converted {
            report.converted += 1;
        } else {
            report.copied += 1;
        }
    }

    zip.finish()?;
    Ok(report)
}

/// `cnv_<name>` next to `input`
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{OUTPUT_PREFIX}{name}"))
}

/// Convert the pack at `input`, writing to `output` or
/// [`default_output_path`].
pub fn convert_pack_file<P: AsRef<Path>>(
    input: P,
    output: Option<&Path>,
    options: &PackOptions,
    lookup: &dyn MetadataLookup,
) -> Result<PackReport> {
    let input = input.as_ref();
    if !input.is_file() {
        return Err(Error::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
    if output == input {
        return Err(Error::InvalidPath(format!(
            "output would overwrite input: {}",
            input.display()
        )));
    }

    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(&output)?);
    let report = match convert_pack(reader, writer, options, lookup) {
        Ok(report) => report,
        Err(e) => {
            // no half-written archives
            let _ = std::fs::remove_file(&output);
            return Err(e);
        }
    };

    info!(
        input = %input.display(),
        output = %output.display(),
        converted = report.converted,
        copied = report.copied,
        failed = report.failed,
        "converted texture pack"
    );
    Ok(report)
}

/// Entry names of a pack paired with the path each maps to
pub fn preview_paths<R: Read + Seek>(reader: R, options: &PackOptions) -> Result<Vec<(String, Option<String>)>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut paths = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().replace('\\', "/");
        let mapped = output_entry_path(&name, options);
        paths.push((name, mapped));
    }
    Ok(paths)
}

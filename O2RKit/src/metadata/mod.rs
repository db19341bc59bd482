//! Texture authoring metadata
//!
//! Replacement textures are usually authored at a higher resolution than the
//! original asset. The runtime needs the original size and format to scale
//! them, so each texture is looked up by path in a metadata source.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::formats::texture::TextureFormat;

/// Regions searched by [`MetadataDirectory`] when none are given
pub const DEFAULT_REGIONS: [&str; 2] = ["us", "jp"];

/// Per-region file extensions tried in order
const METADATA_EXTENSIONS: [&str; 2] = ["json", "yml"];

/// Original dimensions and format of a texture asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureMetadata {
    pub width: u32,
    pub height: u32,
    /// String format code (`"RGBA16"`, `"CI4"`, ...)
    pub format: String,
}

impl TextureMetadata {
    pub fn texture_format(&self) -> Result<TextureFormat> {
        self.format.parse()
    }
}

/// Source of [`TextureMetadata`] keyed by asset path
pub trait MetadataLookup: Send + Sync {
    fn lookup(&self, path: &str) -> Option<TextureMetadata>;
}

/// Lookup that never finds anything; every texture keeps a 1.0 scale
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataLookup for NoMetadata {
    fn lookup(&self, _path: &str) -> Option<TextureMetadata> {
        None
    }
}

/// Keys tried for `path`: full path, file name, file name without `.png`,
/// then the bare stem before the first dot.
fn candidate_keys(path: &str) -> Vec<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let without_png = crate::utils::strip_png_extension(name);
    let stem = name.split('.').next().unwrap_or(name);

    let mut keys = vec![path, name, without_png, stem];
    keys.dedup();
    keys
}

/// In-memory table
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    entries: HashMap<String, TextureMetadata>,
}

impl MetadataTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `name -> {width, height, format}`
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, TextureMetadata> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Parse a YAML mapping with the same shape as [`Self::from_json`]
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let entries: HashMap<String, TextureMetadata> = serde_yaml::from_str(yaml)?;
        Ok(Self { entries })
    }

    /// Read a table, picking the parser from the extension (`.yml`/`.yaml`
    /// are YAML, anything else is JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        if is_yaml(path) {
            Self::from_yaml(&text)
        } else {
            Self::from_json(&text)
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, metadata: TextureMetadata) {
        self.entries.insert(key.into(), metadata);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetadataLookup for MetadataTable {
    fn lookup(&self, path: &str) -> Option<TextureMetadata> {
        candidate_keys(path)
            .into_iter()
            .find_map(|key| self.entries.get(key).cloned())
    }
}

/// Per-region files laid out as `<root>/<region>/<asset dir>.json` (or
/// `.yml`).
///
/// For `actors/mario/eyes.png` the `us` region file is
/// `<root>/us/actors/mario.json`. The first region holding the entry wins.
#[derive(Debug, Clone)]
pub struct MetadataDirectory {
    root: PathBuf,
    regions: Vec<String>,
}

impl MetadataDirectory {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            regions: DEFAULT_REGIONS.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    fn region_files(&self, region: &str, path: &str) -> impl Iterator<Item = PathBuf> + '_ {
        let dir = path.rsplit_once('/').map_or("", |(dir, _)| dir).to_string();
        let base = self.root.join(region);
        METADATA_EXTENSIONS
            .iter()
            .map(move |ext| base.join(format!("{dir}.{ext}")))
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
}

impl MetadataLookup for MetadataDirectory {
    fn lookup(&self, path: &str) -> Option<TextureMetadata> {
        for region in &self.regions {
            for file in self.region_files(region, path) {
                let table = match MetadataTable::from_file(&file) {
                    Ok(table) => table,
                    Err(Error::Io(_)) => {
                        debug!(region = %region, file = %file.display(), "no metadata file");
                        continue;
                    }
                    Err(e) => {
                        warn!(file = %file.display(), error = %e, "unreadable metadata file");
                        continue;
                    }
                };

                if let Some(found) = table.lookup(path) {
                    return Some(found);
                }
            }
        }
        None
    }
}

/// Open a metadata source from disk: a directory becomes a
/// [`MetadataDirectory`], a file is read as a single [`MetadataTable`].
pub fn open_lookup<P: AsRef<Path>>(path: P) -> Result<Box<dyn MetadataLookup>> {
    let path = path.as_ref();
    if path.is_dir() {
        Ok(Box::new(MetadataDirectory::new(path)))
    } else if path.is_file() {
        Ok(Box::new(MetadataTable::from_file(path)?))
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Horizontal byte scale and vertical pixel scale for a replacement texture.
///
/// `h = (width / meta.width) * (mult(target) / mult(meta.format))`,
/// `v = height / meta.height`. Without metadata both are 1.0.
///
/// # Errors
/// Returns [`Error::UnknownTextureTypeName`] if the metadata format is not a
/// known code.
pub fn compute_scale(
    width: u32,
    height: u32,
    target: TextureFormat,
    metadata: Option<&TextureMetadata>,
) -> Result<(f32, f32)> {
    let Some(meta) = metadata else {
        return Ok((1.0, 1.0));
    };

    let source = meta.texture_format()?;
    let h_scale = (width as f32 / meta.width as f32)
        * (target.pixel_multiplier() / source.pixel_multiplier());
    let v_scale = height as f32 / meta.height as f32;
    Ok((h_scale, v_scale))
}

/// Look `path` up and compute its scale, warning when nothing is found
pub fn scale_for(
    lookup: &dyn MetadataLookup,
    path: &str,
    width: u32,
    height: u32,
    target: TextureFormat,
) -> Result<(f32, f32)> {
    let metadata = lookup.lookup(path);
    if metadata.is_none() {
        warn!(path, "no texture metadata, using 1.0 scale");
    }
    compute_scale(width, height, target, metadata.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn meta(width: u32, height: u32, format: &str) -> TextureMetadata {
        TextureMetadata {
            width,
            height,
            format: format.to_string(),
        }
    }

    #[test]
    fn test_scale_formula() {
        // 64x64 RGBA32 replacement of a 32x32 RGBA16 original
        let m = meta(32, 32, "RGBA16");
        let (h, v) = compute_scale(64, 64, TextureFormat::Rgba32, Some(&m)).unwrap();
        assert!((h - 4.0).abs() < f32::EPSILON);
        assert!((v - 2.0).abs() < f32::EPSILON);

        let m = meta(32, 16, "CI4");
        let (h, v) = compute_scale(32, 32, TextureFormat::Rgba32, Some(&m)).unwrap();
        assert!((h - 8.0).abs() < f32::EPSILON);
        assert!((v - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_metadata_defaults_to_one() {
        assert_eq!(
            compute_scale(64, 64, TextureFormat::Rgba32, None).unwrap(),
            (1.0, 1.0)
        );
        assert_eq!(
            scale_for(&NoMetadata, "x.png", 8, 8, TextureFormat::Rgba32).unwrap(),
            (1.0, 1.0)
        );
    }

    #[test]
    fn test_unknown_format_is_fatal() {
        let m = meta(32, 32, "RGBA64");
        assert!(matches!(
            compute_scale(32, 32, TextureFormat::Rgba32, Some(&m)),
            Err(Error::UnknownTextureTypeName(_))
        ));
    }

    #[test]
    fn test_table_key_fallbacks() {
        let table = MetadataTable::from_json(
            r#"{"mario_eyes_center": {"width": 32, "height": 32, "format": "RGBA16"}}"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.lookup("actors/mario/mario_eyes_center.rgba16.png").is_some());
        assert!(table.lookup("mario_eyes_center").is_some());
        assert!(table.lookup("actors/mario/luigi.png").is_none());
    }

    #[test]
    fn test_directory_regions() {
        let temp = TempDir::new().unwrap();
        let jp = temp.path().join("jp").join("actors");
        std::fs::create_dir_all(&jp).unwrap();
        std::fs::write(
            jp.join("mario.json"),
            r#"{"eyes": {"width": 16, "height": 16, "format": "IA8"}}"#,
        )
        .unwrap();

        let dir = MetadataDirectory::new(temp.path());
        assert_eq!(dir.lookup("actors/mario/eyes.png"), Some(meta(16, 16, "IA8")));
        assert_eq!(dir.lookup("actors/mario/nose.png"), None);

        let us_only = MetadataDirectory::new(temp.path()).with_regions(["us"]);
        assert_eq!(us_only.lookup("actors/mario/eyes.png"), None);
    }

    #[test]
    fn test_directory_reads_yaml_regions() {
        let temp = TempDir::new().unwrap();
        let us = temp.path().join("us").join("actors");
        std::fs::create_dir_all(&us).unwrap();
        std::fs::write(
            us.join("mario.yml"),
            "eyes.rgba16.png:\n  width: 32\n  height: 32\n  format: RGBA16\n  size: 2048\n",
        )
        .unwrap();

        let dir = MetadataDirectory::new(temp.path());
        assert_eq!(
            dir.lookup("actors/mario/eyes.rgba16.png"),
            Some(meta(32, 32, "RGBA16"))
        );
    }

    #[test]
    fn test_table_from_yaml_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("meta.yaml");
        std::fs::write(&file, "a:\n  width: 4\n  height: 2\n  format: CI4\n").unwrap();

        let table = MetadataTable::from_file(&file).unwrap();
        assert_eq!(table.lookup("a.png"), Some(meta(4, 2, "CI4")));
        assert!(matches!(
            MetadataTable::from_yaml("- not\n- a map\n"),
            Err(Error::YamlError(_))
        ));
    }

    #[test]
    fn test_open_lookup() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("meta.json");
        std::fs::write(&file, r#"{"a": {"width": 1, "height": 1, "format": "I8"}}"#).unwrap();

        assert!(open_lookup(&file).unwrap().lookup("a.png").is_some());
        assert!(open_lookup(temp.path()).unwrap().lookup("a.png").is_none());
        assert!(matches!(
            open_lookup(temp.path().join("missing")),
            Err(Error::FileNotFound { .. })
        ));
    }
}

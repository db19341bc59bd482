//! CLI command for DynOS containers

use std::path::Path;

use tracing::warn;

use crate::formats::dynos::{ResourceRecord, read_container};
use crate::formats::otr::export_record;
use crate::metadata::{MetadataLookup, NoMetadata, open_lookup};
use crate::utils::export_file_name;

pub fn execute(
    path: &Path,
    export: Option<&Path>,
    metadata: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let lookup: Box<dyn MetadataLookup> = match metadata {
        Some(path) => open_lookup(path)?,
        None => Box::new(NoMetadata),
    };

    let data = std::fs::read(path)?;
    let records = read_container(&data, lookup.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("DynOS container: {}", path.display());
        println!();
        for record in &records {
            match record {
                ResourceRecord::Light(light) => println!(
                    "  Light    {}  ambient {:?} diffuse {:?} dir {:?}",
                    light.name,
                    light.ambient(),
                    light.diffuse(),
                    light.direction()
                ),
                ResourceRecord::Texture(texture) => println!(
                    "  Texture  {}  {}x{}",
                    texture.name, texture.texture.width, texture.texture.height
                ),
                ResourceRecord::GeoLayout(geo) => println!(
                    "  Geo      {}  {} commands",
                    geo.name,
                    geo.layout.len()
                ),
                ResourceRecord::Rejected { tag, name, error } => {
                    println!("  Rejected {name} ({tag:?}): {error}");
                }
            }
        }
        println!();
        println!("{} records", records.len());
    }

    if let Some(dir) = export {
        let written = export_textures(&records, dir)?;
        println!("Exported {written} textures to {}", dir.display());
    }

    Ok(())
}

/// Write every texture record into `dir` as an OTR resource.
///
/// Returns how many files were written. Names without a usable file name
/// component are skipped.
pub fn export_textures(records: &[ResourceRecord], dir: &Path) -> anyhow::Result<usize> {
    std::fs::create_dir_all(dir)?;
    let mut written = 0;
    for record in records {
        if !matches!(record, ResourceRecord::Texture(_)) {
            continue;
        }
        let Some(file_name) = export_file_name(record.name()) else {
            warn!(name = record.name(), "record name has no file name, skipping");
            continue;
        };
        std::fs::write(dir.join(file_name), export_record(record)?)?;
        written += 1;
    }
    Ok(written)
}

//! CLI commands for texture pack conversion

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::formats::texture::TextureFormat;
use crate::metadata::{MetadataLookup, NoMetadata, open_lookup};
use crate::pack::{self, PackOptions};

fn load_metadata(path: Option<&Path>) -> anyhow::Result<Box<dyn MetadataLookup>> {
    Ok(match path {
        Some(path) => open_lookup(path)?,
        None => Box::new(NoMetadata),
    })
}

/// Convert one pack, or every pack found under a directory
pub fn convert(
    source: &Path,
    destination: Option<&Path>,
    raw: bool,
    metadata: Option<&Path>,
    format: &str,
    version: u32,
) -> anyhow::Result<()> {
    let format: TextureFormat = format.parse()?;
    let options = PackOptions::new()
        .with_conversion(!raw)
        .with_format(format)
        .with_version(version);
    let lookup = load_metadata(metadata)?;

    if source.is_dir() {
        if destination.is_some() {
            anyhow::bail!("An output path can only be given for a single pack");
        }
        let packs = pack::find_texture_packs(source)?;
        if packs.is_empty() {
            println!("No texture packs found in {}", source.display());
            return Ok(());
        }

        println!("Converting {} texture packs", packs.len());
        let result = pack::batch_convert(&packs, &options, lookup.as_ref());
        for line in &result.results {
            println!("  {line}");
        }
        println!(
            "Done: {} converted, {} failed",
            result.success_count, result.fail_count
        );
        return Ok(());
    }

    let output = destination.map_or_else(|| pack::default_output_path(source), Path::to_path_buf);
    let report = pack::convert_pack_file(source, Some(output.as_path()), &options, lookup.as_ref())?;

    println!("Converted {} -> {}", source.display(), output.display());
    println!("  Textures converted: {}", report.converted);
    println!("  Files copied:       {}", report.copied);
    println!("  Entries dropped:    {}", report.dropped);
    if report.failed > 0 {
        println!("  Failed:             {}", report.failed);
        for failure in &report.failures {
            println!("    {failure}");
        }
    }

    Ok(())
}

/// Print the output path of every entry
pub fn paths(source: &Path, raw: bool) -> anyhow::Result<()> {
    let options = PackOptions::new().with_conversion(!raw);
    let reader = BufReader::new(File::open(source)?);

    for (name, mapped) in pack::preview_paths(reader, &options)? {
        match mapped {
            Some(path) => println!("{name} -> {path}"),
            None => println!("{name} (dropped)"),
        }
    }

    Ok(())
}

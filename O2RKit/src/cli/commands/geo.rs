//! CLI command for geo layout disassembly

use std::path::Path;

use crate::formats::geo::disassemble_at;

pub fn execute(path: &Path, offset: usize, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read(path)?;
    let layout = disassemble_at(&data, offset)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print!("{}", layout.listing());
        println!("{} commands", layout.len());
    }

    Ok(())
}

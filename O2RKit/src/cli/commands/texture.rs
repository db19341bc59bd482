//! CLI commands for single texture operations

use std::path::Path;

use crate::formats::otr::{parse_texture, write_texture};
use crate::formats::texture::{EncodedTexture, TextureFormat};

/// Encode a PNG into a texture resource
pub fn encode(source: &Path, destination: &Path, format: &str) -> anyhow::Result<()> {
    let format: TextureFormat = format.parse()?;
    let png = std::fs::read(source)?;
    let texture = EncodedTexture::from_png(&png, format)?;

    std::fs::write(destination, write_texture(&texture))?;
    println!(
        "Encoded {} ({}x{} {}) -> {}",
        source.display(),
        texture.width,
        texture.height,
        texture.format,
        destination.display()
    );
    Ok(())
}

/// Decode a texture resource to PNG
pub fn decode(source: &Path, destination: &Path, tlut: Option<&Path>) -> anyhow::Result<()> {
    let texture = parse_texture(&std::fs::read(source)?)?;
    let tlut = tlut
        .map(|path| -> anyhow::Result<EncodedTexture> { Ok(parse_texture(&std::fs::read(path)?)?) })
        .transpose()?;

    let decoded = texture.decode(tlut.as_ref())?;
    std::fs::write(destination, decoded.to_png_bytes()?)?;
    println!("Decoded {} -> {}", source.display(), destination.display());
    Ok(())
}

/// Show info about a texture resource
pub fn info(path: &Path) -> anyhow::Result<()> {
    let texture = parse_texture(&std::fs::read(path)?)?;

    println!("Texture Information: {}", path.display());
    println!();
    println!("Format: {}", texture.format);
    println!("Dimensions: {}x{}", texture.width, texture.height);
    println!("Scale: {} x {}", texture.h_scale, texture.v_scale);
    println!("Data size: {} bytes", texture.data_size);

    Ok(())
}

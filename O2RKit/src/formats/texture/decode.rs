//! N64 texture decoding back to RGBA

use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};

use super::types::TextureFormat;
use super::DecodedTexture;

/// 256-entry RGBA lookup table for the palette formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [[u8; 4]; 256],
}

impl Palette {
    /// Number of palette entries
    pub const LEN: usize = 256;

    /// Grayscale ramp used when no TLUT is attached.
    ///
    /// CI4 spreads its 16 indices over the full range (`index * 16`), CI8
    /// maps the index straight to gray. Alpha is opaque.
    #[must_use]
    pub fn grayscale(format: TextureFormat) -> Self {
        let mut entries = [[0u8, 0, 0, 0xFF]; 256];
        for (index, entry) in entries.iter_mut().enumerate() {
            let gray = if format == TextureFormat::Palette4 {
                ((index & 0x0F) * 16) as u8
            } else {
                index as u8
            };
            *entry = [gray, gray, gray, 0xFF];
        }
        Self { entries }
    }

    /// Overwrite entries from a decoded TLUT image, `index = y * width + x`.
    /// Pixels past the 256th are ignored.
    pub fn load_tlut(&mut self, tlut: &RgbaImage) {
        for (x, y, pixel) in tlut.enumerate_pixels() {
            let index = y as usize * tlut.width() as usize + x as usize;
            if index >= Self::LEN {
                continue;
            }
            self.entries[index] = pixel.0;
        }
    }

    #[must_use]
    pub fn get(&self, index: u8) -> [u8; 4] {
        self.entries[usize::from(index)]
    }
}

/// Decode `data` as a `width` x `height` texture in `format`.
///
/// For the palette formats the optional `tlut` supplies the colors; it is
/// itself decoded first (normally as RGBA16).
///
/// # Errors
/// Returns [`Error::InvalidTextureFormat`] for the `Invalid` sentinel and
/// [`Error::TextureDataTooShort`] if `data` does not cover every pixel.
pub fn decode(
    format: TextureFormat,
    width: u32,
    height: u32,
    data: &[u8],
    tlut: Option<&DecodedTexture>,
) -> Result<DecodedTexture> {
    if format == TextureFormat::Invalid {
        return Err(Error::InvalidTextureFormat);
    }

    let expected = format.buffer_size(width, height);
    if data.len() < expected {
        return Err(Error::TextureDataTooShort {
            expected,
            actual: data.len(),
        });
    }

    let palette = format.is_palette().then(|| {
        let mut palette = Palette::grayscale(format);
        if let Some(tlut) = tlut {
            palette.load_tlut(&tlut.pixels);
        }
        palette
    });

    let count = width as usize * height as usize;
    let mut pixels = RgbaImage::new(width, height);
    let mut indices = palette.as_ref().map(|_| Vec::with_capacity(count));

    for i in 0..count {
        let rgba = match format {
            TextureFormat::Invalid => return Err(Error::InvalidTextureFormat),
            TextureFormat::Rgba32 => [data[i * 4], data[i * 4 + 1], data[i * 4 + 2], data[i * 4 + 3]],
            TextureFormat::Rgba16 => rgba_from_5551(u16::from_be_bytes([data[i * 2], data[i * 2 + 1]])),
            TextureFormat::Palette4 | TextureFormat::Palette8 => {
                let index = if format == TextureFormat::Palette4 {
                    nibble(data, i)
                } else {
                    data[i]
                };
                if let Some(indices) = indices.as_mut() {
                    indices.push(index);
                }
                palette.as_ref().map_or([index, index, index, 0xFF], |p| p.get(index))
            }
            TextureFormat::Gray4 => gray(nibble(data, i) << 4, 0xFF),
            TextureFormat::Gray8 => gray(data[i], 0xFF),
            TextureFormat::GrayAlpha4 => {
                let n = nibble(data, i);
                gray(((n & 0x0E) >> 1) * 32, (n & 1) * 0xFF)
            }
            TextureFormat::GrayAlpha8 => gray(data[i] & 0xF0, (data[i] & 0x0F) << 4),
            TextureFormat::GrayAlpha16 => gray(data[i * 2], data[i * 2 + 1]),
        };

        let (x, y) = ((i % width as usize) as u32, (i / width as usize) as u32);
        pixels.put_pixel(x, y, Rgba(rgba));
    }

    Ok(DecodedTexture {
        format,
        width,
        height,
        pixels,
        indices,
    })
}

/// Expand a 5/5/5/1 word; color fields scale by 8, alpha to 0 or 255
#[must_use]
pub fn rgba_from_5551(word: u16) -> [u8; 4] {
    [
        (((word >> 11) & 0x1F) * 8) as u8,
        (((word >> 6) & 0x1F) * 8) as u8,
        (((word >> 1) & 0x1F) * 8) as u8,
        ((word & 1) * 0xFF) as u8,
    ]
}

/// Nibble `i` of a packed 4-bit buffer, high nibble first
fn nibble(data: &[u8], i: usize) -> u8 {
    let byte = data[i / 2];
    if i % 2 == 0 { byte >> 4 } else { byte & 0x0F }
}

fn gray(value: u8, alpha: u8) -> [u8; 4] {
    [value, value, value, alpha]
}

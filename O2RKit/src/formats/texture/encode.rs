//! Pixel encoding into N64 texture formats
//!
//! 4-bit formats pack pixels two per byte in row-major order, high nibble
//! first. Pairs run across row ends, so odd widths lose nothing. An odd pixel
//! count repeats the last pixel in the final low nibble.

use crate::error::{Error, Result};

use super::source::{Pixel, PixelSource};
use super::types::TextureFormat;

/// Encode every pixel of `source` into `format`.
///
/// The result is exactly `format.buffer_size(width, height)` bytes.
///
/// # Errors
/// Returns [`Error::InvalidTextureFormat`] for the `Invalid` sentinel.
pub fn encode<S: PixelSource + ?Sized>(source: &S, format: TextureFormat) -> Result<Vec<u8>> {
    let width = source.width();
    let height = source.height();
    let mut data = vec![0u8; format.buffer_size(width, height)];

    match format {
        TextureFormat::Invalid => return Err(Error::InvalidTextureFormat),
        TextureFormat::Rgba32 => {
            for_each_pixel(source, |i, p| {
                data[i * 4..i * 4 + 4].copy_from_slice(&[p.r, p.g, p.b, p.a]);
            });
        }
        TextureFormat::Rgba16 => {
            for_each_pixel(source, |i, p| {
                data[i * 2..i * 2 + 2].copy_from_slice(&rgba_to_5551(p).to_be_bytes());
            });
        }
        TextureFormat::GrayAlpha16 => {
            for_each_pixel(source, |i, p| {
                data[i * 2] = p.r;
                data[i * 2 + 1] = p.a;
            });
        }
        TextureFormat::Palette8 => for_each_pixel(source, |i, p| data[i] = p.index),
        TextureFormat::Gray8 => for_each_pixel(source, |i, p| data[i] = p.r),
        TextureFormat::GrayAlpha8 => {
            for_each_pixel(source, |i, p| data[i] = ((p.r >> 4) << 4) | (p.a >> 4));
        }
        TextureFormat::Palette4 => pack_nibbles(source, &mut data, |p| p.index & 0x0F),
        TextureFormat::Gray4 => pack_nibbles(source, &mut data, |p| p.r >> 4),
        TextureFormat::GrayAlpha4 => pack_nibbles(source, &mut data, ia4_nibble),
    }

    Ok(data)
}

/// 5/5/5/1 packing; any nonzero alpha sets the alpha bit
#[must_use]
pub fn rgba_to_5551(p: Pixel) -> u16 {
    (u16::from(p.r >> 3) << 11)
        | (u16::from(p.g >> 3) << 6)
        | (u16::from(p.b >> 3) << 1)
        | u16::from(p.a != 0)
}

/// 3-bit intensity, 1-bit alpha
fn ia4_nibble(p: Pixel) -> u8 {
    ((p.r >> 5) << 1) | u8::from(p.a != 0)
}

/// Visit pixels in row-major order with their flat index
fn for_each_pixel<S, F>(source: &S, mut f: F)
where
    S: PixelSource + ?Sized,
    F: FnMut(usize, Pixel),
{
    let width = source.width();
    for y in 0..source.height() {
        for x in 0..width {
            let i = y as usize * width as usize + x as usize;
            f(i, source.pixel(x, y));
        }
    }
}

fn pack_nibbles<S, F>(source: &S, data: &mut [u8], nibble: F)
where
    S: PixelSource + ?Sized,
    F: Fn(Pixel) -> u8,
{
    let count = source.width() as usize * source.height() as usize;
    for i in (0..count).step_by(2) {
        let high = nibble(source.pixel_at(i)) & 0x0F;
        let low = nibble(source.pixel_at(i + 1)) & 0x0F;
        data[i / 2] = (high << 4) | low;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }

    #[test]
    fn test_invalid_is_rejected() {
        assert!(matches!(
            encode(&solid(2, 2, [0; 4]), TextureFormat::Invalid),
            Err(Error::InvalidTextureFormat)
        ));
    }

    #[test]
    fn test_rgba32_is_raw_bytes() {
        let data = encode(&solid(1, 2, [1, 2, 3, 4]), TextureFormat::Rgba32).unwrap();
        assert_eq!(data, vec![1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_rgba16_is_big_endian_5551() {
        let data = encode(&solid(1, 1, [255, 0, 0, 255]), TextureFormat::Rgba16).unwrap();
        assert_eq!(data, vec![0xF8, 0x01]);

        let data = encode(&solid(1, 1, [0, 0, 255, 0]), TextureFormat::Rgba16).unwrap();
        assert_eq!(data, vec![0x00, 0x3E]);
    }

    #[test]
    fn test_gray_alpha_formats() {
        let px = [0xB7, 0, 0, 0x5C];
        assert_eq!(encode(&solid(1, 1, px), TextureFormat::GrayAlpha16).unwrap(), vec![0xB7, 0x5C]);
        assert_eq!(encode(&solid(1, 1, px), TextureFormat::GrayAlpha8).unwrap(), vec![0xB5]);
        // (0xB7 >> 5) << 1 | 1 = 0b1011 in both nibbles
        assert_eq!(encode(&solid(2, 1, px), TextureFormat::GrayAlpha4).unwrap(), vec![0xBB]);
    }

    #[test]
    fn test_gray4_pairs_adjacent_pixels() {
        let mut img = RgbaImage::new(4, 1);
        for (x, v) in [0x10u8, 0x20, 0x30, 0xF0].into_iter().enumerate() {
            img.put_pixel(x as u32, 0, Rgba([v, 0, 0, 255]));
        }
        assert_eq!(encode(&img, TextureFormat::Gray4).unwrap(), vec![0x12, 0x3F]);
    }

    #[test]
    fn test_odd_pixel_count_repeats_last_pixel() {
        let mut img = RgbaImage::new(3, 1);
        for (x, v) in [0x10u8, 0x20, 0x30].into_iter().enumerate() {
            img.put_pixel(x as u32, 0, Rgba([v, 0, 0, 255]));
        }
        let data = encode(&img, TextureFormat::Gray4).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data, vec![0x12, 0x33]);
    }

    #[test]
    fn test_palette_uses_index() {
        let img = solid(2, 1, [5, 200, 200, 255]);
        assert_eq!(encode(&img, TextureFormat::Palette8).unwrap(), vec![5, 5]);
        assert_eq!(encode(&img, TextureFormat::Palette4).unwrap(), vec![0x55]);
    }

    #[test]
    fn test_output_length_matches_buffer_size() {
        let img = solid(5, 3, [9, 9, 9, 9]);
        for format in TextureFormat::ALL {
            let data = encode(&img, format).unwrap();
            assert_eq!(data.len(), format.buffer_size(5, 3), "{format}");
        }
    }
}

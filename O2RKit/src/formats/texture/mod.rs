//! N64 texture codec
//!
//! Converts between ordinary raster images and the nine N64 texture
//! encodings (RGBA32/16, CI4/8, I4/8, IA4/8/16).
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

mod decode;
mod encode;
mod source;
mod types;

use std::io::Cursor;

use image::{DynamicImage, RgbaImage};
use serde::Serialize;

use crate::error::{Error, Result};

pub use decode::{Palette, decode, rgba_from_5551};
pub use encode::{encode, rgba_to_5551};
pub use source::{Pixel, PixelSource, RasterImage};
pub use types::TextureFormat;

/// A texture in one of the N64 encodings, ready for a resource payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedTexture {
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    #[serde(skip)]
    pub data: Vec<u8>,
    /// Byte length of `data`; always `format.buffer_size(width, height)`
    pub data_size: u32,
    pub h_scale: f32,
    pub v_scale: f32,
}

impl EncodedTexture {
    /// Wrap already encoded bytes. Extra trailing bytes are dropped.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTextureFormat`] for `Invalid` and
    /// [`Error::TextureDataTooShort`] if `data` is smaller than the format needs.
    pub fn new(format: TextureFormat, width: u32, height: u32, mut data: Vec<u8>) -> Result<Self> {
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
        data.truncate(expected);

        Ok(Self {
            format,
            width,
            height,
            data_size: expected as u32,
            data,
            h_scale: 1.0,
            v_scale: 1.0,
        })
    }

    /// Encode a pixel source
    pub fn from_source<S: PixelSource + ?Sized>(source: &S, format: TextureFormat) -> Result<Self> {
        let data = encode(source, format)?;
        Self::new(format, source.width(), source.height(), data)
    }

    /// Decode PNG bytes and encode them as `format`
    pub fn from_png(bytes: &[u8], format: TextureFormat) -> Result<Self> {
        let raster = RasterImage::from_png(bytes)?;
        Self::from_source(&raster, format)
    }

    #[must_use]
    pub fn with_scale(mut self, h_scale: f32, v_scale: f32) -> Self {
        self.h_scale = h_scale;
        self.v_scale = v_scale;
        self
    }

    /// Decode back to RGBA, resolving palette colors through `tlut` if given
    pub fn decode(&self, tlut: Option<&EncodedTexture>) -> Result<DecodedTexture> {
        let tlut = tlut.map(|t| t.decode(None)).transpose()?;
        decode(self.format, self.width, self.height, &self.data, tlut.as_ref())
    }
}

/// Result of decoding an [`EncodedTexture`]
#[derive(Debug, Clone)]
pub struct DecodedTexture {
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub pixels: RgbaImage,
    /// Raw palette indices, present for CI4/CI8 only
    pub indices: Option<Vec<u8>>,
}

impl DecodedTexture {
    /// Encode as PNG. Formats without alpha are written as RGB.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let image = DynamicImage::ImageRgba8(self.pixels.clone());
        let image = if self.format.has_alpha() {
            image
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };

        let mut png_data = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut png_data));
        image
            .write_with_encoder(encoder)
            .map_err(|e| Error::PngEncodeFailed {
                message: e.to_string(),
            })?;

        Ok(png_data)
    }
}

impl PixelSource for DecodedTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Pixel {
        let [r, g, b, a] = self.pixels.get_pixel(x, y).0;
        let index = self
            .indices
            .as_ref()
            .map_or(r, |indices| indices[y as usize * self.width as usize + x as usize]);
        Pixel { r, g, b, a, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = ((x * 37 + y * 91) % 256) as u8;
            Rgba([v, v.wrapping_mul(3), v.wrapping_add(40), v.wrapping_mul(7)])
        })
    }

    fn round_trip(source: &RgbaImage, format: TextureFormat) -> RgbaImage {
        let encoded = EncodedTexture::from_source(source, format).unwrap();
        assert_eq!(encoded.data.len(), encoded.data_size as usize);
        encoded.decode(None).unwrap().pixels
    }

    #[test]
    fn test_rgba32_round_trip_is_exact() {
        let source = gradient(8, 4);
        assert_eq!(round_trip(&source, TextureFormat::Rgba32), source);
    }

    #[test]
    fn test_rgba16_round_trip_quantizes() {
        let source = gradient(8, 4);
        let out = round_trip(&source, TextureFormat::Rgba16);
        for (s, o) in source.pixels().zip(out.pixels()) {
            assert_eq!(o.0[0], s.0[0] & 0xF8);
            assert_eq!(o.0[1], s.0[1] & 0xF8);
            assert_eq!(o.0[2], s.0[2] & 0xF8);
            assert_eq!(o.0[3], if s.0[3] == 0 { 0 } else { 255 });
        }
    }

    #[test]
    fn test_gray_round_trips() {
        let source = gradient(6, 2);
        let i8 = round_trip(&source, TextureFormat::Gray8);
        let i4 = round_trip(&source, TextureFormat::Gray4);
        let ia16 = round_trip(&source, TextureFormat::GrayAlpha16);
        let ia8 = round_trip(&source, TextureFormat::GrayAlpha8);
        let ia4 = round_trip(&source, TextureFormat::GrayAlpha4);

        for (x, y, s) in source.enumerate_pixels() {
            let [r, _, _, a] = s.0;
            assert_eq!(i8.get_pixel(x, y).0, [r, r, r, 255]);
            assert_eq!(i4.get_pixel(x, y).0[0], r & 0xF0);
            assert_eq!(ia16.get_pixel(x, y).0, [r, r, r, a]);
            assert_eq!(ia8.get_pixel(x, y).0, [r & 0xF0, r & 0xF0, r & 0xF0, a & 0xF0]);
            assert_eq!(ia4.get_pixel(x, y).0[0], (r >> 5) * 32);
            assert_eq!(ia4.get_pixel(x, y).0[3], if a == 0 { 0 } else { 255 });
        }
    }

    #[test]
    fn test_odd_width_multi_row_four_bit() {
        // 3x2, intensities 0x10..0x60 row-major
        let source = RgbaImage::from_fn(3, 2, |x, y| {
            let v = ((y * 3 + x + 1) * 0x10) as u8;
            Rgba([v, v, v, 255])
        });
        let encoded = EncodedTexture::from_source(&source, TextureFormat::Gray4).unwrap();
        assert_eq!(encoded.data, vec![0x12, 0x34, 0x56]);

        let out = encoded.decode(None).unwrap().pixels;
        let row0: Vec<u8> = (0..3).map(|x| out.get_pixel(x, 0).0[0]).collect();
        let row1: Vec<u8> = (0..3).map(|x| out.get_pixel(x, 1).0[0]).collect();
        assert_eq!(row0, vec![0x10, 0x20, 0x30]);
        assert_eq!(row1, vec![0x40, 0x50, 0x60]);

        let odd_count = RgbaImage::from_fn(3, 1, |x, _| {
            let v = ((x + 1) * 0x10) as u8;
            Rgba([v, v, v, 255])
        });
        let encoded = EncodedTexture::from_source(&odd_count, TextureFormat::Gray4).unwrap();
        assert_eq!(encoded.data, vec![0x12, 0x33]);
    }

    #[test]
    fn test_palette_round_trip_keeps_indices() {
        let source = RgbaImage::from_fn(4, 2, |x, y| Rgba([(x + 4 * y) as u8, 0, 0, 255]));
        let encoded = EncodedTexture::from_source(&source, TextureFormat::Palette4).unwrap();
        let decoded = encoded.decode(None).unwrap();
        assert_eq!(decoded.indices.as_deref(), Some(&[0u8, 1, 2, 3, 4, 5, 6, 7][..]));

        let again = EncodedTexture::from_source(&decoded, TextureFormat::Palette4).unwrap();
        assert_eq!(again.data, encoded.data);
    }

    #[test]
    fn test_new_validates_length() {
        assert!(matches!(
            EncodedTexture::new(TextureFormat::Rgba16, 2, 2, vec![0; 7]),
            Err(Error::TextureDataTooShort { expected: 8, actual: 7 })
        ));
        let texture = EncodedTexture::new(TextureFormat::Gray8, 2, 2, vec![1; 6]).unwrap();
        assert_eq!(texture.data.len(), 4);
        assert_eq!(texture.data_size, 4);
    }

    #[test]
    fn test_png_round_trip() {
        let source = gradient(4, 4);
        let encoded = EncodedTexture::from_source(&source, TextureFormat::Rgba32).unwrap();
        let png = encoded.decode(None).unwrap().to_png_bytes().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let reloaded = EncodedTexture::from_png(&png, TextureFormat::Rgba32).unwrap();
        assert_eq!(reloaded.data, encoded.data);
    }

    #[test]
    fn test_opaque_formats_write_rgb_png() {
        let source = gradient(2, 2);
        let encoded = EncodedTexture::from_source(&source, TextureFormat::Gray8).unwrap();
        let png = encoded.decode(None).unwrap().to_png_bytes().unwrap();
        let raster = RasterImage::from_png(&png).unwrap();
        assert_eq!(raster.channels(), 3);
    }
}

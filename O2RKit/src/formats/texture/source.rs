//! Pixel sources the codec encodes from
//!
//! The codec only sees canonical 8-bit RGBA pixels plus a palette index.
//! Channel synthesis and 16-bit narrowing happen here, once.

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// One canonical pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    /// Palette index (the first channel for non-indexed sources)
    pub index: u8,
}

/// A readable pixel grid
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Pixel at (`x`, `y`); both must be in bounds
    fn pixel(&self, x: u32, y: u32) -> Pixel;

    /// Pixel at row-major index `index`, clamped to the last pixel
    fn pixel_at(&self, index: usize) -> Pixel {
        let width = (self.width() as usize).max(1);
        let last = (width * self.height() as usize).saturating_sub(1);
        let index = index.min(last);
        self.pixel((index % width) as u32, (index / width) as u32)
    }
}

impl PixelSource for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> Pixel {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Pixel { r, g, b, a, index: r }
    }
}

/// Decoded image that keeps its original channel count and bit depth
#[derive(Debug, Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: u8,
    bits_per_channel: u8,
    samples: Vec<u16>,
}

impl RasterImage {
    /// Decode a PNG container
    ///
    /// # Errors
    /// Returns [`Error::PngDecodeFailed`] if the bytes are not a valid PNG.
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| {
            Error::PngDecodeFailed {
                message: e.to_string(),
            }
        })?;
        Ok(Self::from_dynamic(&image))
    }

    /// Wrap an already decoded image
    #[must_use]
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, bits_per_channel, samples): (u8, u8, Vec<u16>) = match image {
            DynamicImage::ImageLuma8(buf) => (1, 8, widen(buf.as_raw())),
            DynamicImage::ImageLumaA8(buf) => (2, 8, widen(buf.as_raw())),
            DynamicImage::ImageRgb8(buf) => (3, 8, widen(buf.as_raw())),
            DynamicImage::ImageRgba8(buf) => (4, 8, widen(buf.as_raw())),
            DynamicImage::ImageLuma16(buf) => (1, 16, buf.as_raw().clone()),
            DynamicImage::ImageLumaA16(buf) => (2, 16, buf.as_raw().clone()),
            DynamicImage::ImageRgb16(buf) => (3, 16, buf.as_raw().clone()),
            DynamicImage::ImageRgba16(buf) => (4, 16, buf.as_raw().clone()),
            other => (4, 8, widen(other.to_rgba8().as_raw())),
        };

        Self {
            width,
            height,
            channels,
            bits_per_channel,
            samples,
        }
    }

    /// Number of stored channels (1-4)
    #[must_use]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// 8 or 16
    #[must_use]
    pub fn bits_per_channel(&self) -> u8 {
        self.bits_per_channel
    }

    fn sample(&self, index: usize) -> u8 {
        let value = self.samples[index];
        if self.bits_per_channel == 16 {
            (value / 256) as u8
        } else {
            value as u8
        }
    }
}

fn widen(raw: &[u8]) -> Vec<u16> {
    raw.iter().map(|&v| u16::from(v)).collect()
}

impl PixelSource for RasterImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// Missing channels are synthesized: gray duplicates to RGB, a second
    /// channel is alpha, absent alpha is opaque.
    fn pixel(&self, x: u32, y: u32) -> Pixel {
        let channels = usize::from(self.channels);
        let base = (y as usize * self.width as usize + x as usize) * channels;
        let c0 = self.sample(base);

        let (r, g, b, a) = match self.channels {
            1 => (c0, c0, c0, 0xFF),
            2 => (c0, c0, c0, self.sample(base + 1)),
            3 => (c0, self.sample(base + 1), self.sample(base + 2), 0xFF),
            _ => (
                c0,
                self.sample(base + 1),
                self.sample(base + 2),
                self.sample(base + 3),
            ),
        };

        Pixel { r, g, b, a, index: c0 }
    }
}

//! N64 texture format table
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// N64 texture encodings understood by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum TextureFormat {
    /// Sentinel for "no format"; never valid input to the codec
    Invalid = 0,
    /// 32-bit RGBA, 8 bits per channel
    Rgba32 = 1,
    /// 16-bit RGBA 5/5/5/1
    Rgba16 = 2,
    /// 4-bit palette index (CI4)
    Palette4 = 3,
    /// 8-bit palette index (CI8)
    Palette8 = 4,
    /// 4-bit intensity (I4)
    Gray4 = 5,
    /// 8-bit intensity (I8)
    Gray8 = 6,
    /// 3-bit intensity + 1-bit alpha (IA4)
    GrayAlpha4 = 7,
    /// 4-bit intensity + 4-bit alpha (IA8)
    GrayAlpha8 = 8,
    /// 8-bit intensity + 8-bit alpha (IA16)
    GrayAlpha16 = 9,
}

impl TextureFormat {
    /// Every encodable format, in numeric code order
    pub const ALL: [TextureFormat; 9] = [
        Self::Rgba32,
        Self::Rgba16,
        Self::Palette4,
        Self::Palette8,
        Self::Gray4,
        Self::Gray8,
        Self::GrayAlpha4,
        Self::GrayAlpha8,
        Self::GrayAlpha16,
    ];

    /// Bytes per pixel (fractional for 4-bit formats)
    #[must_use]
    pub fn pixel_multiplier(self) -> f32 {
        match self {
            Self::Invalid => 0.0,
            Self::Rgba32 => 4.0,
            Self::Rgba16 | Self::GrayAlpha16 => 2.0,
            Self::Palette8 | Self::Gray8 | Self::GrayAlpha8 => 1.0,
            Self::Palette4 | Self::Gray4 | Self::GrayAlpha4 => 0.5,
        }
    }

    /// Exact encoded size in bytes for a `width` x `height` image
    #[must_use]
    pub fn buffer_size(self, width: u32, height: u32) -> usize {
        let pixels = width as usize * height as usize;
        match self {
            Self::Invalid => 0,
            Self::Rgba32 => pixels * 4,
            Self::Rgba16 | Self::GrayAlpha16 => pixels * 2,
            Self::Palette8 | Self::Gray8 | Self::GrayAlpha8 => pixels,
            Self::Palette4 | Self::Gray4 | Self::GrayAlpha4 => pixels.div_ceil(2),
        }
    }

    /// Numeric code used in resource payloads
    #[must_use]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Map a numeric code (1-9) to a format
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            1 => Ok(Self::Rgba32),
            2 => Ok(Self::Rgba16),
            3 => Ok(Self::Palette4),
            4 => Ok(Self::Palette8),
            5 => Ok(Self::Gray4),
            6 => Ok(Self::Gray8),
            7 => Ok(Self::GrayAlpha4),
            8 => Ok(Self::GrayAlpha8),
            9 => Ok(Self::GrayAlpha16),
            _ => Err(Error::UnknownTextureType(code)),
        }
    }

    /// Canonical string code (`"CI4"`, `"IA16"`, ...)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Rgba32 => "RGBA32",
            Self::Rgba16 => "RGBA16",
            Self::Palette4 => "CI4",
            Self::Palette8 => "CI8",
            Self::Gray4 => "I4",
            Self::Gray8 => "I8",
            Self::GrayAlpha4 => "IA4",
            Self::GrayAlpha8 => "IA8",
            Self::GrayAlpha16 => "IA16",
        }
    }

    #[must_use]
    pub fn is_palette(self) -> bool {
        matches!(self, Self::Palette4 | Self::Palette8)
    }

    /// Whether decoded pixels carry meaningful alpha
    #[must_use]
    pub fn has_alpha(self) -> bool {
        !matches!(self, Self::Invalid | Self::Gray4 | Self::Gray8)
    }
}

impl FromStr for TextureFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RGBA32" => Ok(Self::Rgba32),
            "RGBA16" | "TLUT" => Ok(Self::Rgba16),
            "CI4" => Ok(Self::Palette4),
            "CI8" => Ok(Self::Palette8),
            "I4" => Ok(Self::Gray4),
            "I8" => Ok(Self::Gray8),
            "IA4" => Ok(Self::GrayAlpha4),
            "IA8" => Ok(Self::GrayAlpha8),
            "IA16" => Ok(Self::GrayAlpha16),
            _ => Err(Error::UnknownTextureTypeName(s.to_string())),
        }
    }
}

impl TryFrom<u32> for TextureFormat {
    type Error = Error;

    fn try_from(code: u32) -> Result<Self> {
        Self::from_code(code)
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

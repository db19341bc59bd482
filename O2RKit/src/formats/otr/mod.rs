//! OTR/O2R binary resources
//!
//! Every resource is a 64-byte [`ResourceHeader`] followed by a
//! type-specific little-endian payload. Only textures have a payload codec;
//! other record kinds stop at [`Error::NotImplemented`].
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

mod header;

use std::fmt;
use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::formats::dynos::ResourceRecord;
use crate::formats::texture::{EncodedTexture, TextureFormat};
use crate::utils::BinaryWriter;

pub use header::{ENDIANNESS_LITTLE, HEADER_SIZE, RESOURCE_MAGIC, ResourceHeader};

/// Resource version written for textures
pub const TEXTURE_VERSION: u32 = 1;

/// Texture flags word; bit 0 marks a loaded replacement texture
pub const TEXTURE_FLAGS: u32 = 1 << 0;

/// Resource type magic numbers (ASCII tags read as big-endian words)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u32)]
pub enum ResourceType {
    /// `OTEX`
    Texture = 0x4F54_4558,
    /// `OBLB`
    Blob = 0x4F42_4C42,
    /// `OVTX`
    Vertex = 0x4F56_5458,
    /// `ODLT`
    DisplayList = 0x4F44_4C54,
    /// `OGEO`
    GeoLayout = 0x4F47_454F,
    /// `OLIT`
    Light = 0x4F4C_4954,
}

impl ResourceType {
    #[must_use]
    pub fn magic(self) -> u32 {
        self as u32
    }

    pub fn from_magic(magic: u32) -> Result<Self> {
        match magic {
            0x4F54_4558 => Ok(Self::Texture),
            0x4F42_4C42 => Ok(Self::Blob),
            0x4F56_5458 => Ok(Self::Vertex),
            0x4F44_4C54 => Ok(Self::DisplayList),
            0x4F47_454F => Ok(Self::GeoLayout),
            0x4F4C_4954 => Ok(Self::Light),
            _ => Err(Error::UnknownResourceType(magic)),
        }
    }

    /// Four-character tag, e.g. `"OTEX"`
    #[must_use]
    pub fn tag(self) -> String {
        String::from_utf8_lossy(&self.magic().to_be_bytes()).into_owned()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// Serialize a texture resource (header + payload) with the default version
#[must_use]
pub fn write_texture(texture: &EncodedTexture) -> Vec<u8> {
    write_texture_with_header(texture, &ResourceHeader::new(ResourceType::Texture, TEXTURE_VERSION))
}

/// Serialize a texture resource under a caller-supplied header
#[must_use]
pub fn write_texture_with_header(texture: &EncodedTexture, header: &ResourceHeader) -> Vec<u8> {
    let mut writer = BinaryWriter::with_capacity(HEADER_SIZE + 0x1C + texture.data.len());
    header.write(&mut writer);

    writer.write_u32(texture.format.code()); // 0x40
    writer.write_u32(texture.width);
    writer.write_u32(texture.height);
    writer.write_u32(TEXTURE_FLAGS);
    writer.write_f32(texture.h_scale); // 0x50
    writer.write_f32(texture.v_scale);
    writer.write_u32(texture.data_size); // 0x58
    writer.write_bytes(&texture.data);

    writer.into_inner()
}

/// Read a texture resource back
///
/// # Errors
/// Fails on a bad header, a non-texture resource type, an unknown texture
/// type code or a payload shorter than its declared data size.
pub fn parse_texture(data: &[u8]) -> Result<EncodedTexture> {
    let header = ResourceHeader::parse(data)?;
    if header.resource_type != ResourceType::Texture {
        return Err(Error::UnexpectedResourceType {
            expected: ResourceType::Texture.magic(),
            found: header.resource_type.magic(),
        });
    }

    let mut cursor = Cursor::new(&data[HEADER_SIZE..]);
    let format = TextureFormat::from_code(cursor.read_u32::<LittleEndian>()?)?;
    let width = cursor.read_u32::<LittleEndian>()?;
    let height = cursor.read_u32::<LittleEndian>()?;
    let _flags = cursor.read_u32::<LittleEndian>()?;
    let h_scale = cursor.read_f32::<LittleEndian>()?;
    let v_scale = cursor.read_f32::<LittleEndian>()?;
    let data_size = cursor.read_u32::<LittleEndian>()? as usize;

    let payload_start = HEADER_SIZE + cursor.position() as usize;
    let mut payload = Vec::new();
    cursor.take(data_size as u64).read_to_end(&mut payload)?;
    if payload.len() < data_size {
        return Err(Error::UnexpectedEof {
            offset: payload_start,
            needed: data_size,
        });
    }

    Ok(EncodedTexture::new(format, width, height, payload)?.with_scale(h_scale, v_scale))
}

/// Serialize any dispatched record
///
/// # Errors
/// Only textures can be written. Lights and geo layouts return
/// [`Error::NotImplemented`]; a rejected record returns
/// [`Error::RejectedRecord`] with its decode error.
pub fn export_record(record: &ResourceRecord) -> Result<Vec<u8>> {
    match record {
        ResourceRecord::Texture(texture) => Ok(write_texture(&texture.texture)),
        ResourceRecord::Light(_) => Err(Error::NotImplemented { resource: "light" }),
        ResourceRecord::GeoLayout(_) => Err(Error::NotImplemented {
            resource: "geo layout",
        }),
        ResourceRecord::Rejected { name, error, .. } => Err(Error::RejectedRecord {
            name: name.clone(),
            reason: error.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::dynos::{DataTag, LightRecord};
    use pretty_assertions::assert_eq;

    fn sample() -> EncodedTexture {
        EncodedTexture::new(TextureFormat::Rgba16, 2, 1, vec![0xF8, 0x01, 0x00, 0x3F])
            .unwrap()
            .with_scale(2.0, 0.5)
    }

    #[test]
    fn test_texture_type_at_offset_four() {
        let bytes = write_texture(&sample());
        assert_eq!(&bytes[0x04..0x08], &[0x58, 0x45, 0x54, 0x4F]);
    }

    #[test]
    fn test_texture_payload_layout() {
        let bytes = write_texture(&sample());
        assert_eq!(bytes.len(), HEADER_SIZE + 0x1C + 4);
        assert_eq!(&bytes[0x40..0x44], &2u32.to_le_bytes());
        assert_eq!(&bytes[0x44..0x48], &2u32.to_le_bytes());
        assert_eq!(&bytes[0x48..0x4C], &1u32.to_le_bytes());
        assert_eq!(&bytes[0x4C..0x50], &1u32.to_le_bytes());
        assert_eq!(&bytes[0x50..0x54], &2.0f32.to_le_bytes());
        assert_eq!(&bytes[0x54..0x58], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[0x58..0x5C], &4u32.to_le_bytes());
        assert_eq!(&bytes[0x5C..], &[0xF8, 0x01, 0x00, 0x3F]);
    }

    #[test]
    fn test_parse_texture_round_trip() {
        let texture = sample();
        assert_eq!(parse_texture(&write_texture(&texture)).unwrap(), texture);
    }

    #[test]
    fn test_parse_texture_truncated() {
        let bytes = write_texture(&sample());
        assert!(matches!(
            parse_texture(&bytes[..bytes.len() - 1]),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_parse_texture_wrong_type() {
        let mut writer = BinaryWriter::new();
        ResourceHeader::new(ResourceType::Blob, 0).write(&mut writer);
        assert!(matches!(
            parse_texture(&writer.to_buffer()),
            Err(Error::UnexpectedResourceType { .. })
        ));
    }

    #[test]
    fn test_resource_tags() {
        assert_eq!(ResourceType::Texture.tag(), "OTEX");
        assert_eq!(ResourceType::GeoLayout.to_string(), "OGEO");
        assert!(matches!(
            ResourceType::from_magic(0x1234),
            Err(Error::UnknownResourceType(0x1234))
        ));
    }

    #[test]
    fn test_export_non_texture_is_not_implemented() {
        let light = ResourceRecord::Light(LightRecord {
            name: "l".to_string(),
            data: [0; 24],
        });
        assert!(matches!(
            export_record(&light),
            Err(Error::NotImplemented { resource: "light" })
        ));
    }

    #[test]
    fn test_export_rejected_carries_decode_error() {
        let rejected = ResourceRecord::Rejected {
            tag: DataTag::Texture,
            name: "broken".to_string(),
            error: "failed to decode PNG: bad signature".to_string(),
        };
        match export_record(&rejected) {
            Err(Error::RejectedRecord { name, reason }) => {
                assert_eq!(name, "broken");
                assert_eq!(reason, "failed to decode PNG: bad signature");
            }
            other => panic!("expected a rejected record error, got {other:?}"),
        }
    }
}

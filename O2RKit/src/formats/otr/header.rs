//! 64-byte resource header

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};
use crate::utils::BinaryWriter;

use super::ResourceType;

/// Header length; the type-specific payload starts here
pub const HEADER_SIZE: usize = 0x40;

/// Constant 64-bit marker at offset 0x0C
pub const RESOURCE_MAGIC: u64 = 0xDEAD_BEEF_DEAD_BEEF;

/// Endianness flag value for little-endian payloads
pub const ENDIANNESS_LITTLE: u32 = 0;

/// Header preceding every emitted resource
///
/// | Offset | Field |
/// |---|---|
/// | 0x00 | endianness (u32) |
/// | 0x04 | resource type (u32) |
/// | 0x08 | version (u32) |
/// | 0x0C | magic (u64) |
/// | 0x14 | game version (u32) |
/// | 0x18 | ROM CRC (u64) |
/// | 0x20 | ROM enum (u32) |
/// | 0x24 | zero padding to 0x40 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceHeader {
    pub endianness: u32,
    pub resource_type: ResourceType,
    pub version: u32,
    pub game_version: u32,
    pub rom_crc: u64,
    pub rom_enum: u32,
}

impl ResourceHeader {
    #[must_use]
    pub fn new(resource_type: ResourceType, version: u32) -> Self {
        Self {
            endianness: ENDIANNESS_LITTLE,
            resource_type,
            version,
            game_version: 0,
            rom_crc: 0,
            rom_enum: 0,
        }
    }

    /// Append the header to `writer`, padding with zeros up to 0x40 bytes
    /// past where it started.
    pub fn write(&self, writer: &mut BinaryWriter) {
        let start = writer.len();
        writer.write_u32(self.endianness);
        writer.write_u32(self.resource_type.magic());
        writer.write_u32(self.version);
        writer.write_u64(RESOURCE_MAGIC);
        writer.write_u32(self.game_version);
        writer.write_u64(self.rom_crc);
        writer.write_u32(self.rom_enum);
        while writer.len() - start < HEADER_SIZE {
            writer.write_u32(0);
        }
    }

    /// Read a header from the start of `data`
    ///
    /// # Errors
    /// Returns [`Error::UnexpectedEof`] if `data` is shorter than 0x40 bytes,
    /// [`Error::InvalidResourceMagic`] if the 64-bit magic does not match and
    /// [`Error::UnknownResourceType`] for an unrecognized type.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::UnexpectedEof {
                offset: 0,
                needed: HEADER_SIZE,
            });
        }

        let mut cursor = Cursor::new(data);
        let endianness = cursor.read_u32::<LittleEndian>()?;
        let type_magic = cursor.read_u32::<LittleEndian>()?;
        let version = cursor.read_u32::<LittleEndian>()?;

        let magic = cursor.read_u64::<LittleEndian>()?;
        if magic != RESOURCE_MAGIC {
            return Err(Error::InvalidResourceMagic { found: magic });
        }

        let resource_type = ResourceType::from_magic(type_magic)?;
        let game_version = cursor.read_u32::<LittleEndian>()?;
        let rom_crc = cursor.read_u64::<LittleEndian>()?;
        let rom_enum = cursor.read_u32::<LittleEndian>()?;

        Ok(Self {
            endianness,
            resource_type,
            version,
            game_version,
            rom_crc,
            rom_enum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layout() {
        let mut writer = BinaryWriter::new();
        ResourceHeader::new(ResourceType::Texture, 1).write(&mut writer);
        let bytes = writer.to_buffer();

        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[0x00..0x04], &[0, 0, 0, 0]);
        assert_eq!(&bytes[0x04..0x08], &0x4F54_4558u32.to_le_bytes());
        assert_eq!(&bytes[0x08..0x0C], &[1, 0, 0, 0]);
        assert_eq!(&bytes[0x0C..0x14], &RESOURCE_MAGIC.to_le_bytes());
        assert!(bytes[0x14..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_writes_into_existing_writer() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0xAA);
        ResourceHeader::new(ResourceType::Blob, 0).write(&mut writer);
        assert_eq!(writer.len(), 1 + HEADER_SIZE);
    }

    #[test]
    fn test_parse_round_trip() {
        let mut header = ResourceHeader::new(ResourceType::GeoLayout, 3);
        header.rom_crc = 0x0123_4567_89AB_CDEF;
        header.rom_enum = 2;
        let mut writer = BinaryWriter::new();
        header.write(&mut writer);

        assert_eq!(ResourceHeader::parse(&writer.to_buffer()).unwrap(), header);
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[4..8].copy_from_slice(&0x4F54_4558u32.to_le_bytes());
        assert!(matches!(
            ResourceHeader::parse(&bytes),
            Err(Error::InvalidResourceMagic { found: 0 })
        ));
        assert!(matches!(
            ResourceHeader::parse(&bytes[..10]),
            Err(Error::UnexpectedEof { .. })
        ));
    }
}

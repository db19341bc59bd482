//! DynOS binary containers
//!
//! A DynOS `.bin` is a stream of tagged records: one tag byte followed by a
//! tag-specific payload. Lights, textures and geo layouts are decoded; the
//! remaining known tags carry no payload we read. Dispatch stops at the first
//! tag it does not handle (including `None`, which is also what reading past
//! the end yields).
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::formats::geo::{self, GeoLayout};
use crate::formats::texture::{EncodedTexture, TextureFormat};
use crate::metadata::{self, MetadataLookup};
use crate::utils::BinaryReader;

/// Size of an SM64 `Lights1` block
pub const LIGHT_DATA_SIZE: usize = 24;

/// Pointer tokens only keep their low 24 bits (segment offset)
pub const POINTER_MASK: u32 = 0x00FF_FFFF;

/// Record tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum DataTag {
    None = 0,
    Light = 1,
    Texture = 2,
    Vertex = 3,
    DisplayList = 4,
    GeoLayout = 5,
    AnimationValue = 6,
    AnimationIndex = 7,
    Animation = 8,
    AnimationTable = 9,
    GfxDynCmd = 10,
    Unused = 11,
}

impl DataTag {
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => Self::None,
            1 => Self::Light,
            2 => Self::Texture,
            3 => Self::Vertex,
            4 => Self::DisplayList,
            5 => Self::GeoLayout,
            6 => Self::AnimationValue,
            7 => Self::AnimationIndex,
            8 => Self::Animation,
            9 => Self::AnimationTable,
            10 => Self::GfxDynCmd,
            11 => Self::Unused,
            _ => return None,
        })
    }
}

/// Raw `Lights1` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightRecord {
    pub name: String,
    pub data: [u8; LIGHT_DATA_SIZE],
}

impl LightRecord {
    /// Ambient color (first 8-byte block)
    #[must_use]
    pub fn ambient(&self) -> [u8; 3] {
        [self.data[0], self.data[1], self.data[2]]
    }

    /// Diffuse color of the directional light
    #[must_use]
    pub fn diffuse(&self) -> [u8; 3] {
        [self.data[8], self.data[9], self.data[10]]
    }

    #[must_use]
    pub fn direction(&self) -> [i8; 3] {
        [
            self.data[16] as i8,
            self.data[17] as i8,
            self.data[18] as i8,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureRecord {
    pub name: String,
    pub texture: EncodedTexture,
}

/// Value/pointer word pair from a geo layout record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GeoToken {
    pub value: u32,
    pub pointer: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoRecord {
    pub name: String,
    pub tokens: Vec<GeoToken>,
    pub layout: GeoLayout,
}

/// One dispatched record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum ResourceRecord {
    Light(LightRecord),
    Texture(TextureRecord),
    GeoLayout(GeoRecord),
    /// Payload was read in full but could not be decoded
    Rejected {
        tag: DataTag,
        name: String,
        error: String,
    },
}

impl ResourceRecord {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Light(r) => &r.name,
            Self::Texture(r) => &r.name,
            Self::GeoLayout(r) => &r.name,
            Self::Rejected { name, .. } => name,
        }
    }

    #[must_use]
    pub fn tag(&self) -> DataTag {
        match self {
            Self::Light(_) => DataTag::Light,
            Self::Texture(_) => DataTag::Texture,
            Self::GeoLayout(_) => DataTag::GeoLayout,
            Self::Rejected { tag, .. } => *tag,
        }
    }
}

/// Caller-owned accumulator for parsed records
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    records: Vec<ResourceRecord>,
}

impl ResourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ResourceRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[ResourceRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.records.iter()
    }

    pub fn textures(&self) -> impl Iterator<Item = &TextureRecord> {
        self.records.iter().filter_map(|r| match r {
            ResourceRecord::Texture(t) => Some(t),
            _ => None,
        })
    }

    pub fn rejected(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r, ResourceRecord::Rejected { .. }))
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ResourceRecord> {
        self.records
    }
}

/// Dispatch every record in `data` into `registry`.
///
/// Returns the number of records added.
///
/// # Errors
/// Returns [`Error::UnexpectedEof`](crate::error::Error::UnexpectedEof) if a
/// record is cut short. Records that are complete but fail to decode are
/// added as [`ResourceRecord::Rejected`] instead.
pub fn parse_container(
    data: &[u8],
    lookup: &dyn MetadataLookup,
    registry: &mut ResourceRegistry,
) -> Result<usize> {
    let mut reader = BinaryReader::new(data);
    let start = registry.len();

    loop {
        let offset = reader.offset();
        let byte = if reader.remaining() == 0 {
            DataTag::None as u8
        } else {
            reader.read_u8()?
        };

        let Some(tag) = DataTag::from_byte(byte) else {
            debug!(tag = byte, offset, "unrecognized tag, stopping");
            break;
        };

        match tag {
            DataTag::Light => registry.push(read_light(&mut reader)?),
            DataTag::Texture => registry.push(read_texture(&mut reader, lookup)?),
            DataTag::GeoLayout => registry.push(read_geo_layout(&mut reader)?),
            DataTag::Vertex
            | DataTag::DisplayList
            | DataTag::Animation
            | DataTag::AnimationTable
            | DataTag::GfxDynCmd => {
                warn!(?tag, offset, "record type not supported, payload not read");
            }
            DataTag::None
            | DataTag::AnimationValue
            | DataTag::AnimationIndex
            | DataTag::Unused => {
                debug!(?tag, offset, "end of container");
                break;
            }
        }
    }

    let added = registry.len() - start;
    debug!(records = added, "parsed DynOS container");
    Ok(added)
}

/// [`parse_container`] into a fresh registry
pub fn read_container(data: &[u8], lookup: &dyn MetadataLookup) -> Result<Vec<ResourceRecord>> {
    let mut registry = ResourceRegistry::new();
    parse_container(data, lookup, &mut registry)?;
    Ok(registry.into_records())
}

fn read_light(reader: &mut BinaryReader<'_>) -> Result<ResourceRecord> {
    let name = reader.read_string_zero_utf8()?;
    let mut data = [0u8; LIGHT_DATA_SIZE];
    data.copy_from_slice(reader.read_bytes(LIGHT_DATA_SIZE)?);
    debug!(name = %name, "light");
    Ok(ResourceRecord::Light(LightRecord { name, data }))
}

fn read_texture(reader: &mut BinaryReader<'_>, lookup: &dyn MetadataLookup) -> Result<ResourceRecord> {
    let name = reader.read_string_zero_utf8()?;
    let size = reader.read_u32()? as usize;
    let png = reader.read_bytes(size)?;

    let converted = EncodedTexture::from_png(png, TextureFormat::Rgba32).and_then(|texture| {
        let (h, v) = metadata::scale_for(
            lookup,
            &name,
            texture.width,
            texture.height,
            TextureFormat::Rgba32,
        )?;
        Ok(texture.with_scale(h, v))
    });

    Ok(match converted {
        Ok(texture) => {
            debug!(name = %name, width = texture.width, height = texture.height, "texture");
            ResourceRecord::Texture(TextureRecord { name, texture })
        }
        Err(e) => reject(DataTag::Texture, name, &e),
    })
}

fn read_geo_layout(reader: &mut BinaryReader<'_>) -> Result<ResourceRecord> {
    let name = reader.read_string_zero_utf8()?;
    let count = reader.read_u32()? as usize;

    let mut tokens = Vec::with_capacity(count.min(reader.remaining() / 8));
    for _ in 0..count {
        let value = reader.read_u32()?;
        let pointer = reader.read_u32()? & POINTER_MASK;
        tokens.push(GeoToken { value, pointer });
    }

    let script: Vec<u8> = tokens.iter().flat_map(|t| t.value.to_be_bytes()).collect();
    Ok(match geo::disassemble(&script) {
        Ok(layout) => {
            debug!(name = %name, commands = layout.len(), "geo layout");
            ResourceRecord::GeoLayout(GeoRecord {
                name,
                tokens,
                layout,
            })
        }
        Err(e) => reject(DataTag::GeoLayout, name, &e),
    })
}

fn reject(tag: DataTag, name: String, error: &crate::error::Error) -> ResourceRecord {
    warn!(?tag, name = %name, error = %error, "record rejected");
    ResourceRecord::Rejected {
        tag,
        name,
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::formats::geo::GeoOpcode;
    use crate::metadata::{MetadataTable, NoMetadata, TextureMetadata};
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Vec::new();
        img.write_with_encoder(image::codecs::png::PngEncoder::new(&mut out))
            .unwrap();
        out
    }

    fn named(tag: DataTag, name: &str) -> Vec<u8> {
        let mut out = vec![tag as u8];
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        out
    }

    #[test]
    fn test_single_light_then_unknown_tag() {
        let mut data = named(DataTag::Light, "abc");
        data.extend(1..=24u8);
        data.push(0xFF);

        let records = read_container(&data, &NoMetadata).unwrap();
        assert_eq!(records.len(), 1);
        let ResourceRecord::Light(light) = &records[0] else {
            panic!("expected a light");
        };
        assert_eq!(light.name, "abc");
        assert_eq!(light.ambient(), [1, 2, 3]);
        assert_eq!(light.diffuse(), [9, 10, 11]);
        assert_eq!(light.direction(), [17, 18, 19]);
    }

    #[test]
    fn test_end_of_buffer_halts() {
        let mut data = named(DataTag::Light, "l");
        data.extend([0u8; 24]);
        assert_eq!(read_container(&data, &NoMetadata).unwrap().len(), 1);
        assert!(read_container(&[], &NoMetadata).unwrap().is_empty());
    }

    #[test]
    fn test_payloadless_tags_are_skipped() {
        let mut data = vec![DataTag::Vertex as u8, DataTag::DisplayList as u8, DataTag::GfxDynCmd as u8];
        data.extend(named(DataTag::Light, "after"));
        data.extend([0u8; 24]);

        let records = read_container(&data, &NoMetadata).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "after");
    }

    #[test]
    fn test_animation_value_halts() {
        let mut data = vec![DataTag::AnimationValue as u8];
        data.extend(named(DataTag::Light, "never"));
        data.extend([0u8; 24]);
        assert!(read_container(&data, &NoMetadata).unwrap().is_empty());
    }

    #[test]
    fn test_texture_record_with_scale() {
        let png = png_bytes(4, 2);
        let mut data = named(DataTag::Texture, "eyes");
        data.extend((png.len() as u32).to_be_bytes());
        data.extend(&png);

        let mut table = MetadataTable::new();
        table.insert(
            "eyes",
            TextureMetadata {
                width: 2,
                height: 1,
                format: "RGBA16".to_string(),
            },
        );

        let records = read_container(&data, &table).unwrap();
        let ResourceRecord::Texture(record) = &records[0] else {
            panic!("expected a texture");
        };
        assert_eq!(record.texture.format, TextureFormat::Rgba32);
        assert_eq!(record.texture.data_size, 4 * 2 * 4);
        assert!((record.texture.h_scale - 4.0).abs() < f32::EPSILON);
        assert!((record.texture.v_scale - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bad_png_is_rejected_and_dispatch_continues() {
        let mut data = named(DataTag::Texture, "broken");
        data.extend(3u32.to_be_bytes());
        data.extend([1, 2, 3]);
        data.extend(named(DataTag::Light, "ok"));
        data.extend([0u8; 24]);

        let mut registry = ResourceRegistry::new();
        assert_eq!(parse_container(&data, &NoMetadata, &mut registry).unwrap(), 2);
        assert_eq!(registry.rejected().count(), 1);
        assert_eq!(registry.records()[0].tag(), DataTag::Texture);
        assert_eq!(registry.records()[1].name(), "ok");
    }

    #[test]
    fn test_geo_layout_record() {
        let mut data = named(DataTag::GeoLayout, "mario_geo");
        data.extend(3u32.to_be_bytes());
        for (value, pointer) in [
            (0x1500_0000u32, 0u32),
            (0x0400_1234, 0x0400_1234),
            (0x0100_0000, 0),
        ] {
            data.extend(value.to_be_bytes());
            data.extend(pointer.to_be_bytes());
        }

        let records = read_container(&data, &NoMetadata).unwrap();
        let ResourceRecord::GeoLayout(record) = &records[0] else {
            panic!("expected a geo layout");
        };
        assert_eq!(record.tokens[1].pointer, 0x0000_1234);
        assert_eq!(record.tokens[0].pointer, 0);
        let opcodes: Vec<GeoOpcode> = record.layout.iter().map(|c| c.opcode).collect();
        assert_eq!(opcodes, vec![GeoOpcode::NodeDisplayList, GeoOpcode::End]);
    }

    #[test]
    fn test_truncated_record_is_fatal() {
        let mut data = named(DataTag::Light, "short");
        data.extend([0u8; 10]);
        assert!(matches!(
            read_container(&data, &NoMetadata),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_registry_accumulates_across_containers() {
        let mut light = named(DataTag::Light, "a");
        light.extend([0u8; 24]);

        let mut registry = ResourceRegistry::new();
        parse_container(&light, &NoMetadata, &mut registry).unwrap();
        parse_container(&light, &NoMetadata, &mut registry).unwrap();
        assert_eq!(registry.len(), 2);
    }
}

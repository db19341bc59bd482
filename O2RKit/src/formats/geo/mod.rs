//! SM64 geo layout scripts
//!
//! A geo layout is a big-endian bytecode stream describing the scene graph of
//! an actor or level area. [`disassemble`] turns it into an ordered list of
//! [`GeoCommand`]s.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

mod disassembler;

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::error::{Error, Result};

pub use disassembler::{Decoded, Flow, decode_command, disassemble, disassemble_at};

/// Geo layout opcodes, numbered by position (0x00-0x20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum GeoOpcode {
    BranchAndLink = 0x00,
    End = 0x01,
    Branch = 0x02,
    Return = 0x03,
    OpenNode = 0x04,
    CloseNode = 0x05,
    AssignAsView = 0x06,
    UpdateNodeFlags = 0x07,
    NodeRoot = 0x08,
    NodeOrthoProjection = 0x09,
    NodePerspective = 0x0A,
    NodeStart = 0x0B,
    NodeMasterList = 0x0C,
    NodeLevelOfDetail = 0x0D,
    NodeSwitchCase = 0x0E,
    NodeCamera = 0x0F,
    NodeTranslationRotation = 0x10,
    NodeTranslation = 0x11,
    NodeRotation = 0x12,
    NodeAnimatedPart = 0x13,
    NodeBillboard = 0x14,
    NodeDisplayList = 0x15,
    NodeShadow = 0x16,
    NodeObjectParent = 0x17,
    NodeAsm = 0x18,
    NodeBackground = 0x19,
    Nop = 0x1A,
    CopyView = 0x1B,
    NodeHeldObject = 0x1C,
    NodeScale = 0x1D,
    Nop2 = 0x1E,
    Nop3 = 0x1F,
    NodeCullingRadius = 0x20,
}

impl GeoOpcode {
    const TABLE: [GeoOpcode; 33] = [
        Self::BranchAndLink,
        Self::End,
        Self::Branch,
        Self::Return,
        Self::OpenNode,
        Self::CloseNode,
        Self::AssignAsView,
        Self::UpdateNodeFlags,
        Self::NodeRoot,
        Self::NodeOrthoProjection,
        Self::NodePerspective,
        Self::NodeStart,
        Self::NodeMasterList,
        Self::NodeLevelOfDetail,
        Self::NodeSwitchCase,
        Self::NodeCamera,
        Self::NodeTranslationRotation,
        Self::NodeTranslation,
        Self::NodeRotation,
        Self::NodeAnimatedPart,
        Self::NodeBillboard,
        Self::NodeDisplayList,
        Self::NodeShadow,
        Self::NodeObjectParent,
        Self::NodeAsm,
        Self::NodeBackground,
        Self::Nop,
        Self::CopyView,
        Self::NodeHeldObject,
        Self::NodeScale,
        Self::Nop2,
        Self::Nop3,
        Self::NodeCullingRadius,
    ];

    /// Map an opcode byte found at `offset`
    ///
    /// # Errors
    /// Returns [`Error::UnknownGeoOpcode`] for bytes above 0x20.
    pub fn from_byte(opcode: u8, offset: usize) -> Result<Self> {
        Self::TABLE
            .get(usize::from(opcode))
            .copied()
            .ok_or(Error::UnknownGeoOpcode { opcode, offset })
    }

    #[must_use]
    pub fn byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for GeoOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a pointer operand refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceKind {
    /// Another geo layout (branch targets)
    #[serde(rename = "SM64:GEO_LAYOUT")]
    GeoLayout,
    /// A display list
    #[serde(rename = "GFX")]
    Gfx,
    /// A runtime callback
    #[serde(rename = "FUNC")]
    Function,
}

impl ReferenceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GeoLayout => "SM64:GEO_LAYOUT",
            Self::Gfx => "GFX",
            Self::Function => "FUNC",
        }
    }
}

/// Pointer operand tagged with the kind of resource it names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GeoRef {
    pub kind: ReferenceKind,
    pub value: u32,
}

/// One decoded operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum GeoArg {
    U8(u8),
    S16(i16),
    U32(u32),
    Vec3s([i16; 3]),
    Reference(GeoRef),
}

impl fmt::Display for GeoArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{v:#04x}"),
            Self::S16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v:#010x}"),
            Self::Vec3s([x, y, z]) => write!(f, "({x}, {y}, {z})"),
            Self::Reference(r) => write!(f, "{}:{:#010x}", r.kind.as_str(), r.value),
        }
    }
}

/// A decoded geo command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoCommand {
    pub opcode: GeoOpcode,
    pub args: Vec<GeoArg>,
    /// Byte offset of the opcode in the stream
    pub offset: usize,
    /// Bytes the command occupies (0 for End/Return)
    pub byte_length: usize,
    /// Set on a CloseNode that had no matching OpenNode
    pub skip: bool,
}

/// Disassembled geo layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoLayout {
    pub commands: Vec<GeoCommand>,
}

impl GeoLayout {
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeoCommand> {
        self.commands.iter()
    }

    /// Every pointer operand, in command order
    pub fn references(&self) -> impl Iterator<Item = GeoRef> + '_ {
        self.commands.iter().flat_map(|cmd| {
            cmd.args.iter().filter_map(|arg| match arg {
                GeoArg::Reference(r) => Some(*r),
                _ => None,
            })
        })
    }

    /// Text listing, one command per line, indented by node depth
    #[must_use]
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;

        for cmd in &self.commands {
            if cmd.opcode == GeoOpcode::CloseNode && !cmd.skip {
                depth = depth.saturating_sub(1);
            }

            let _ = write!(
                out,
                "{:06x}  {:02x}  {}{}",
                cmd.offset,
                cmd.opcode.byte(),
                "  ".repeat(depth),
                cmd.opcode
            );
            if !cmd.args.is_empty() {
                let args: Vec<String> = cmd.args.iter().map(ToString::to_string).collect();
                let _ = write!(out, " {}", args.join(", "));
            }
            if cmd.skip {
                out.push_str("  ; skipped (unmatched)");
            }
            out.push('\n');

            if cmd.opcode == GeoOpcode::OpenNode {
                depth += 1;
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a GeoLayout {
    type Item = &'a GeoCommand;
    type IntoIter = std::slice::Iter<'a, GeoCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_table_order() {
        assert_eq!(GeoOpcode::from_byte(0x00, 0).unwrap(), GeoOpcode::BranchAndLink);
        assert_eq!(GeoOpcode::from_byte(0x15, 0).unwrap(), GeoOpcode::NodeDisplayList);
        assert_eq!(GeoOpcode::from_byte(0x20, 0).unwrap(), GeoOpcode::NodeCullingRadius);
        for (i, op) in GeoOpcode::TABLE.iter().enumerate() {
            assert_eq!(usize::from(op.byte()), i);
        }
        assert!(matches!(
            GeoOpcode::from_byte(0x21, 12),
            Err(Error::UnknownGeoOpcode { opcode: 0x21, offset: 12 })
        ));
    }

    #[test]
    fn test_arg_display() {
        assert_eq!(GeoArg::U8(0x80).to_string(), "0x80");
        assert_eq!(GeoArg::S16(-3).to_string(), "-3");
        assert_eq!(GeoArg::Vec3s([1, -2, 3]).to_string(), "(1, -2, 3)");
        let gfx = GeoArg::Reference(GeoRef {
            kind: ReferenceKind::Gfx,
            value: 0x0400_1234,
        });
        assert_eq!(gfx.to_string(), "GFX:0x04001234");
    }

    #[test]
    fn test_arg_json_shape() {
        let arg = GeoArg::Reference(GeoRef {
            kind: ReferenceKind::GeoLayout,
            value: 5,
        });
        let json = serde_json::to_string(&arg).unwrap();
        assert_eq!(json, r#"{"type":"Reference","value":{"kind":"SM64:GEO_LAYOUT","value":5}}"#);
    }
}

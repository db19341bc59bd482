//! Geo layout disassembler
//!
//! Each opcode is decoded on its own from the command's start offset, using
//! absolute peeks, and reports how many bytes it occupies.

use tracing::{debug, warn};

use crate::error::Result;
use crate::utils::BinaryReader;

use super::{GeoArg, GeoCommand, GeoLayout, GeoOpcode, GeoRef, ReferenceKind};

/// Whether disassembly continues after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Output of decoding a single command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub opcode: GeoOpcode,
    pub args: Vec<GeoArg>,
    pub consumed: usize,
    pub flow: Flow,
    pub skip: bool,
}

/// Disassemble a whole geo layout starting at offset 0
pub fn disassemble(data: &[u8]) -> Result<GeoLayout> {
    disassemble_at(data, 0)
}

/// Disassemble starting at `start`.
///
/// Stops at End, Return, a null BranchAndLink or the end of the buffer.
///
/// # Errors
/// Returns [`Error::UnknownGeoOpcode`](crate::error::Error::UnknownGeoOpcode)
/// for bytes outside the table and
/// [`Error::UnexpectedEof`](crate::error::Error::UnexpectedEof) for
/// truncated operands.
pub fn disassemble_at(data: &[u8], start: usize) -> Result<GeoLayout> {
    let reader = BinaryReader::new(data);
    let mut layout = GeoLayout::default();
    let mut depth = 0usize;
    let mut offset = start;

    while offset < reader.len() {
        let decoded = decode_command(&reader, offset, &mut depth)?;
        let flow = decoded.flow;

        layout.commands.push(GeoCommand {
            opcode: decoded.opcode,
            args: decoded.args,
            offset,
            byte_length: decoded.consumed,
            skip: decoded.skip,
        });

        offset += decoded.consumed;
        if flow == Flow::Stop {
            break;
        }
    }

    debug!(commands = layout.len(), end = offset, "disassembled geo layout");
    Ok(layout)
}

fn reference(kind: ReferenceKind, value: u32) -> GeoArg {
    GeoArg::Reference(GeoRef { kind, value })
}

/// Decode the command at `cmd`, updating the node `depth`.
pub fn decode_command(reader: &BinaryReader<'_>, cmd: usize, depth: &mut usize) -> Result<Decoded> {
    let opcode = GeoOpcode::from_byte(reader.peek_u8(cmd)?, cmd)?;

    let u8_at = |off: usize| reader.peek_u8(cmd + off).map(GeoArg::U8);
    let s16_at = |off: usize| reader.peek_i16(cmd + off).map(GeoArg::S16);
    let u32_at = |off: usize| reader.peek_u32(cmd + off).map(GeoArg::U32);
    let vec_at = |off: usize| reader.peek_vec3s(cmd + off).map(GeoArg::Vec3s);
    let ref_at = |off: usize, kind: ReferenceKind| reader.peek_u32(cmd + off).map(|v| reference(kind, v));

    let mut flow = Flow::Continue;
    let mut skip = false;

    let (args, consumed) = match opcode {
        GeoOpcode::BranchAndLink => {
            let target = reader.peek_u32(cmd + 0x04)?;
            if target == 0 {
                flow = Flow::Stop;
            }
            (vec![reference(ReferenceKind::GeoLayout, target)], 0x08)
        }
        GeoOpcode::End | GeoOpcode::Return => {
            flow = Flow::Stop;
            (Vec::new(), 0)
        }
        GeoOpcode::Branch => (
            vec![u8_at(0x01)?, ref_at(0x04, ReferenceKind::GeoLayout)?],
            0x08,
        ),
        GeoOpcode::OpenNode => {
            *depth += 1;
            (Vec::new(), 0x04)
        }
        GeoOpcode::CloseNode => {
            if *depth == 0 {
                warn!(offset = cmd, "close node without matching open node");
                skip = true;
            } else {
                *depth -= 1;
            }
            (Vec::new(), 0x04)
        }
        GeoOpcode::AssignAsView
        | GeoOpcode::NodeOrthoProjection
        | GeoOpcode::CopyView
        | GeoOpcode::NodeCullingRadius => (vec![s16_at(0x02)?], 0x04),
        GeoOpcode::UpdateNodeFlags => (vec![u8_at(0x01)?, s16_at(0x02)?], 0x04),
        GeoOpcode::NodeRoot => (
            vec![
                s16_at(0x02)?,
                s16_at(0x04)?,
                s16_at(0x06)?,
                s16_at(0x08)?,
                s16_at(0x0A)?,
            ],
            0x0C,
        ),
        GeoOpcode::NodePerspective => {
            let option = reader.peek_u8(cmd + 0x01)?;
            let mut args = vec![GeoArg::U8(option), s16_at(0x02)?, s16_at(0x04)?, s16_at(0x06)?];
            let mut size = 0x08;
            if option != 0 {
                args.push(ref_at(0x08, ReferenceKind::Function)?);
                size += 0x04;
            }
            (args, size)
        }
        GeoOpcode::NodeStart | GeoOpcode::NodeObjectParent => (Vec::new(), 0x04),
        GeoOpcode::NodeMasterList => (vec![u8_at(0x01)?], 0x04),
        GeoOpcode::NodeLevelOfDetail => (vec![s16_at(0x04)?, s16_at(0x06)?], 0x08),
        GeoOpcode::NodeSwitchCase | GeoOpcode::NodeAsm | GeoOpcode::NodeBackground => (
            vec![s16_at(0x02)?, ref_at(0x04, ReferenceKind::Function)?],
            0x08,
        ),
        GeoOpcode::NodeCamera => (
            vec![
                s16_at(0x02)?,
                vec_at(0x04)?,
                vec_at(0x0A)?,
                ref_at(0x10, ReferenceKind::Function)?,
            ],
            0x14,
        ),
        GeoOpcode::NodeTranslationRotation => {
            let params = reader.peek_u8(cmd + 0x01)?;
            let mut args = vec![GeoArg::U8(params)];
            let mut size = match (params & 0x70) >> 4 {
                0 => {
                    args.push(vec_at(0x04)?);
                    args.push(vec_at(0x0A)?);
                    0x10
                }
                1 | 2 => {
                    args.push(vec_at(0x02)?);
                    0x08
                }
                3 => {
                    args.push(s16_at(0x02)?);
                    0x04
                }
                field => {
                    // fields 4..=7 set bit 0x40, which no node type defines
                    warn!(offset = cmd, field, "undefined translate/rotate field, decoding as rotate-Y");
                    args.push(s16_at(0x02)?);
                    0x04
                }
            };
            if params & 0x80 != 0 {
                args.push(ref_at(size, ReferenceKind::Gfx)?);
                size += 0x04;
            }
            (args, size)
        }
        GeoOpcode::NodeTranslation | GeoOpcode::NodeRotation | GeoOpcode::NodeBillboard => {
            let params = reader.peek_u8(cmd + 0x01)?;
            let mut args = vec![GeoArg::U8(params), vec_at(0x02)?];
            let mut size = 0x08;
            if params & 0x80 != 0 {
                args.push(ref_at(0x08, ReferenceKind::Gfx)?);
                size += 0x04;
            }
            (args, size)
        }
        GeoOpcode::NodeAnimatedPart => (
            vec![u8_at(0x01)?, vec_at(0x02)?, ref_at(0x08, ReferenceKind::Gfx)?],
            0x0C,
        ),
        GeoOpcode::NodeDisplayList => (
            vec![u8_at(0x01)?, ref_at(0x04, ReferenceKind::Gfx)?],
            0x08,
        ),
        GeoOpcode::NodeShadow => (
            vec![s16_at(0x02)?, s16_at(0x04)?, s16_at(0x06)?],
            0x08,
        ),
        GeoOpcode::Nop | GeoOpcode::Nop2 => (Vec::new(), 0x08),
        GeoOpcode::Nop3 => (Vec::new(), 0x10),
        GeoOpcode::NodeHeldObject => (
            vec![
                ref_at(0x08, ReferenceKind::Function)?,
                u8_at(0x01)?,
                vec_at(0x02)?,
            ],
            0x0C,
        ),
        GeoOpcode::NodeScale => {
            let params = reader.peek_u8(cmd + 0x01)?;
            let mut args = vec![GeoArg::U8(params), u32_at(0x04)?];
            let mut size = 0x08;
            if params & 0x80 != 0 {
                args.push(ref_at(0x08, ReferenceKind::Gfx)?);
                size += 0x04;
            }
            (args, size)
        }
    };

    Ok(Decoded {
        opcode,
        args,
        consumed,
        flow,
        skip,
    })
}

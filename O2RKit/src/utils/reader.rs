//! Sequential big-endian reader over a byte slice
//!
//! Input streams (geo layouts, DynOS containers) come from a big-endian
//! source architecture, so every multi-byte read here is big-endian.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Cursor over a borrowed buffer with a monotonically increasing offset.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a reader positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read offset
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total buffer length
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the offset and the end of the buffer
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Borrow `len` bytes starting at `at` without moving the offset.
    fn slice_at(&self, at: usize, len: usize) -> Result<&'a [u8]> {
        at.checked_add(len)
            .and_then(|end| self.data.get(at..end))
            .ok_or(Error::UnexpectedEof {
                offset: at,
                needed: len,
            })
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.slice_at(self.offset, len)?;
        self.offset += len;
        Ok(bytes)
    }

    // ------------------------------------------------------------------
    // Absolute peeks (offset untouched)
    // ------------------------------------------------------------------

    pub fn peek_u8(&self, at: usize) -> Result<u8> {
        Ok(self.slice_at(at, 1)?[0])
    }

    pub fn peek_i16(&self, at: usize) -> Result<i16> {
        Ok(BigEndian::read_i16(self.slice_at(at, 2)?))
    }

    pub fn peek_u32(&self, at: usize) -> Result<u32> {
        Ok(BigEndian::read_u32(self.slice_at(at, 4)?))
    }

    /// Three big-endian `i16` values at `at` (6 bytes)
    pub fn peek_vec3s(&self, at: usize) -> Result<[i16; 3]> {
        let bytes = self.slice_at(at, 6)?;
        Ok([
            BigEndian::read_i16(&bytes[0..2]),
            BigEndian::read_i16(&bytes[2..4]),
            BigEndian::read_i16(&bytes[4..6]),
        ])
    }

    // ------------------------------------------------------------------
    // Sequential numeric reads
    // ------------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    /// Read a signed 16-bit triple, advancing exactly 6 bytes
    pub fn read_vec3s(&mut self) -> Result<[i16; 3]> {
        let vec = self.peek_vec3s(self.offset)?;
        self.offset += 6;
        Ok(vec)
    }

    /// Borrow the next `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// Fixed-length UTF-8 string (invalid sequences are replaced)
    pub fn read_string_utf8(&mut self, len: usize) -> Result<String> {
        let bytes = self.take(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Fixed-length UTF-16LE string.
    ///
    /// Only `len` rounded down to an even count is decoded, but the offset
    /// advances by the full `len`. Existing streams rely on that padding.
    pub fn read_string_utf16(&mut self, len: usize) -> Result<String> {
        let even = len - (len % 2);
        let bytes = self.slice_at(self.offset, even)?;
        if len > even {
            // the odd trailing byte must still exist
            self.slice_at(self.offset, len)?;
        }
        self.offset += len;
        Ok(decode_utf16le(bytes))
    }

    /// Zero-terminated UTF-8 string.
    ///
    /// Without a terminator the rest of the buffer is consumed.
    pub fn read_string_zero_utf8(&mut self) -> Result<String> {
        let rest = self.data.get(self.offset..).unwrap_or_default();
        let (length, terminator) = match rest.iter().position(|&b| b == 0) {
            Some(pos) => (pos, 1),
            None => (rest.len(), 0),
        };
        let value = self.read_string_utf8(length)?;
        self.offset += terminator;
        Ok(value)
    }

    /// Zero-terminated UTF-16LE string (terminator is a zero code unit).
    ///
    /// An odd trailing byte with no terminator found counts as a one-byte
    /// terminator, so the whole buffer is consumed.
    pub fn read_string_zero_utf16(&mut self) -> Result<String> {
        let rest = self.data.get(self.offset..).unwrap_or_default();
        let mut terminator = rest.len() & 1;
        let mut length = 0;
        let mut i = 0;
        while i + 1 < rest.len() {
            if rest[i] == 0 && rest[i + 1] == 0 {
                terminator = 2;
                break;
            }
            length += 2;
            i += 2;
        }
        let value = self.read_string_utf16(length)?;
        self.offset += terminator;
        Ok(value)
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

//! Append-only little-endian writer
//!
//! Output resources are consumed by a little-endian runtime, so every
//! multi-byte write here is little-endian regardless of host byte order.
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use byteorder::{ByteOrder, LittleEndian};

/// Allocation granularity the writer grows by
pub const ALLOCATION_GRANULARITY: usize = 4096;

/// Smallest growth step
const MIN_CHUNK: usize = 1024;

/// Growable output buffer with an explicit written length.
///
/// `buffer.len()` is the capacity; only `buffer[..length]` holds data.
#[derive(Debug, Clone)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
    length: usize,
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryWriter {
    /// Create a writer with the default initial capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a writer with `size` bytes of initial capacity.
    /// Zero selects the default capacity.
    #[must_use]
    pub fn with_capacity(size: usize) -> Self {
        let size = if size == 0 { ALLOCATION_GRANULARITY } else { size };
        Self {
            buffer: vec![0u8; size],
            length: 0,
        }
    }

    /// Number of bytes written
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Current internal capacity
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Forget everything written; capacity is kept.
    pub fn reset(&mut self) {
        self.length = 0;
    }

    /// Exact-length copy of the written bytes
    #[must_use]
    pub fn to_buffer(&self) -> Vec<u8> {
        self.buffer[..self.length].to_vec()
    }

    /// Consume the writer, returning the written bytes
    #[must_use]
    pub fn into_inner(mut self) -> Vec<u8> {
        self.buffer.truncate(self.length);
        self.buffer
    }

    /// Grow to the smallest chunk multiple that fits `size` more bytes.
    fn ensure(&mut self, size: usize) {
        let needed = self.length + size;
        if self.buffer.len() >= needed {
            return;
        }

        let chunk = ALLOCATION_GRANULARITY.max(MIN_CHUNK);
        let capacity = needed.div_ceil(chunk) * chunk;

        let mut grown = vec![0u8; capacity];
        grown[..self.length].copy_from_slice(&self.buffer[..self.length]);
        self.buffer = grown;
    }

    /// Reserve `size` bytes and return the slot to fill
    fn slot(&mut self, size: usize) -> &mut [u8] {
        self.ensure(size);
        let start = self.length;
        self.length += size;
        &mut self.buffer[start..start + size]
    }

    // ------------------------------------------------------------------
    // Numeric writes
    // ------------------------------------------------------------------

    pub fn write_u8(&mut self, value: u8) {
        self.slot(1)[0] = value;
    }

    pub fn write_i8(&mut self, value: i8) {
        self.slot(1)[0] = value as u8;
    }

    pub fn write_u16(&mut self, value: u16) {
        LittleEndian::write_u16(self.slot(2), value);
    }

    pub fn write_i16(&mut self, value: i16) {
        LittleEndian::write_i16(self.slot(2), value);
    }

    pub fn write_u32(&mut self, value: u32) {
        LittleEndian::write_u32(self.slot(4), value);
    }

    pub fn write_i32(&mut self, value: i32) {
        LittleEndian::write_i32(self.slot(4), value);
    }

    pub fn write_u64(&mut self, value: u64) {
        LittleEndian::write_u64(self.slot(8), value);
    }

    pub fn write_i64(&mut self, value: i64) {
        LittleEndian::write_i64(self.slot(8), value);
    }

    pub fn write_f32(&mut self, value: f32) {
        LittleEndian::write_f32(self.slot(4), value);
    }

    pub fn write_f64(&mut self, value: f64) {
        LittleEndian::write_f64(self.slot(8), value);
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.slot(data.len()).copy_from_slice(data);
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    pub fn write_string_utf8(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// UTF-16LE code units, no terminator
    pub fn write_string_utf16(&mut self, value: &str) {
        for unit in value.encode_utf16() {
            self.write_u16(unit);
        }
    }

    pub fn write_string_zero_utf8(&mut self, value: &str) {
        self.write_string_utf8(value);
        self.write_u8(0);
    }

    pub fn write_string_zero_utf16(&mut self, value: &str) {
        self.write_string_utf16(value);
        self.write_u16(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let mut writer = BinaryWriter::new();
        writer.write_u16(0x1234);
        writer.write_u32(0xDEADBEEF);
        writer.write_i8(-1);
        assert_eq!(writer.to_buffer(), vec![0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE, 0xFF]);
    }

    #[test]
    fn test_u64_emits_eight_bytes() {
        let mut writer = BinaryWriter::new();
        writer.write_u64(0xDEADBEEFDEADBEEF);
        assert_eq!(
            writer.to_buffer(),
            vec![0xEF, 0xBE, 0xAD, 0xDE, 0xEF, 0xBE, 0xAD, 0xDE]
        );
    }

    #[test]
    fn test_growth_keeps_written_bytes() {
        let mut writer = BinaryWriter::with_capacity(8);
        let payload: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        writer.write_u32(7);
        writer.write_bytes(&payload);

        assert_eq!(writer.len(), 5004);
        // 5004 rounded up to the 4096-byte chunk
        assert_eq!(writer.capacity(), 8192);

        let buffer = writer.to_buffer();
        assert_eq!(buffer.len(), 5004);
        assert_eq!(&buffer[..4], &[7, 0, 0, 0]);
        assert_eq!(&buffer[4..], payload.as_slice());
    }

    #[test]
    fn test_default_capacity_and_reset() {
        let mut writer = BinaryWriter::with_capacity(0);
        assert_eq!(writer.capacity(), ALLOCATION_GRANULARITY);
        writer.write_f32(1.0);
        writer.reset();
        assert!(writer.is_empty());
        assert!(writer.to_buffer().is_empty());
    }

    #[test]
    fn test_strings() {
        let mut writer = BinaryWriter::new();
        writer.write_string_zero_utf8("ab");
        writer.write_string_zero_utf16("c");
        assert_eq!(writer.into_inner(), vec![b'a', b'b', 0, b'c', 0, 0, 0]);
    }
}

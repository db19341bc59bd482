//! Error types for `o2rkit`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `o2rkit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A read ran past the end of the input buffer.
    #[error("unexpected end of data at offset {offset:#x} (needed {needed} bytes)")]
    UnexpectedEof {
        /// Offset the read started at.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
    },

    // ==================== Texture Errors ====================
    /// The `Invalid` sentinel format reached the pixel codec.
    #[error("invalid texture format: cannot encode or decode the Invalid sentinel")]
    InvalidTextureFormat,

    /// Unknown numeric texture type code.
    #[error("unknown texture type number: {0}")]
    UnknownTextureType(u32),

    /// Unknown texture type string code.
    #[error("unknown texture type string: {0}")]
    UnknownTextureTypeName(String),

    /// Encoded texture data is smaller than its format and dimensions require.
    #[error("texture data too short: expected {expected} bytes, found {actual}")]
    TextureDataTooShort {
        /// Bytes required by `format`, `width` and `height`.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// Failed to decode a PNG image.
    #[error("failed to decode PNG: {message}")]
    PngDecodeFailed {
        /// The decoder error message.
        message: String,
    },

    /// Failed to encode a PNG image.
    #[error("failed to encode PNG: {message}")]
    PngEncodeFailed {
        /// The encoding error message.
        message: String,
    },

    // ==================== Geo Layout Errors ====================
    /// The disassembler met a byte outside the geo opcode table.
    #[error("unknown geo command {opcode:#04x} at offset {offset:#x}")]
    UnknownGeoOpcode {
        /// The offending opcode byte.
        opcode: u8,
        /// Byte offset of the command.
        offset: usize,
    },

    // ==================== Resource (OTR/O2R) Errors ====================
    /// The 64-bit header magic did not match `0xDEADBEEFDEADBEEF`.
    #[error("invalid resource magic: {found:#018x}")]
    InvalidResourceMagic {
        /// The magic value found in the header.
        found: u64,
    },

    /// The header declares a different resource type than the caller expected.
    #[error("unexpected resource type: expected {expected:#010x}, found {found:#010x}")]
    UnexpectedResourceType {
        /// Expected type magic.
        expected: u32,
        /// Type magic found in the header.
        found: u32,
    },

    /// The header declares a resource type this crate does not know.
    #[error("unknown resource type: {0:#010x}")]
    UnknownResourceType(u32),

    /// The resource type has no write path yet.
    #[error("export not implemented for {resource} resources")]
    NotImplemented {
        /// Resource kind that was requested.
        resource: &'static str,
    },

    /// The record was read but failed to decode, so there is nothing to export.
    #[error("record {name} was rejected: {reason}")]
    RejectedRecord {
        /// Record name from the container.
        name: String,
        /// The decode error recorded when the record was rejected.
        reason: String,
    },

    // ==================== Archive / Parsing Errors ====================
    /// Zip archive error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Input file does not exist.
    #[error("file not found: {}", .path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `o2rkit` operations.
pub type Result<T> = std::result::Result<T, Error>;

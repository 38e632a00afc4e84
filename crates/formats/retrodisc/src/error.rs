use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid magic at offset {offset:#x}: expected {expected:#010X}, found {found:#010X}")]
    InvalidMagic {
        offset: u64,
        expected: u32,
        found: u32,
    },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("unsupported {what} version {found:#x} (expected {expected:#x})")]
    UnsupportedVersion {
        what: &'static str,
        found: u32,
        expected: u32,
    },

    #[error("string at offset {offset:#x} is not valid UTF-8: {source}")]
    InvalidString {
        offset: usize,
        source: std::string::FromUtf8Error,
    },

    #[error("string at offset {offset:#x} is not valid UTF-16: {source}")]
    InvalidUtf16 {
        offset: usize,
        source: std::string::FromUtf16Error,
    },

    #[error("file {path:?} not found on disc")]
    FileNotFound { path: String },

    #[error("unknown asset ID {id:#010X}")]
    UnknownAssetId { id: u32 },

    #[error("asset {id:#010X} has type {found:?}, expected {expected:?}")]
    WrongAssetType {
        id: u32,
        expected: [u8; 4],
        found: [u8; 4],
    },

    #[error("failed to inflate asset {id:#010X}: {source}")]
    Decompress { id: u32, source: std::io::Error },

    #[error("asset {id:#010X} inflated to {actual} bytes, header says {expected}")]
    DecompressedSize {
        id: u32,
        expected: usize,
        actual: usize,
    },

    #[error("{context}: {message}")]
    Parse {
        context: &'static str,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

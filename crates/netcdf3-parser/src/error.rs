//! Error types for classic NetCDF parsing.

use thiserror::Error;

pub type NetCdf3Result<T> = Result<T, NetCdf3Error>;

#[derive(Debug, Error)]
pub enum NetCdf3Error {
    #[error("not a classic NetCDF file (bad magic)")]
    BadMagic,

    #[error("unsupported NetCDF version byte: {0} (only CDF-1 and CDF-2 are supported)")]
    UnsupportedVersion(u8),

    #[error("unexpected end of file at offset {0}")]
    UnexpectedEof(usize),

    #[error("invalid list tag {tag:#010x} at offset {offset}")]
    InvalidTag { tag: u32, offset: usize },

    #[error("unknown external type code: {0}")]
    UnknownType(u32),

    #[error("variable references invalid dimension id {0}")]
    InvalidDimId(usize),

    #[error("name is not valid UTF-8")]
    InvalidName,

    #[error("variable data out of bounds: {0}")]
    DataOutOfBounds(String),
}

use thiserror::Error;

/// Errors raised while decoding or encoding a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("buffer too short: needed {needed} bytes, {available} available")]
    BufferTooShort { needed: usize, available: usize },

    #[error("buffer overflow: {needed} bytes do not fit in {capacity}")]
    BufferOverflow { needed: usize, capacity: usize },

    #[error("invalid option flag {0}, expected 0 or 1")]
    InvalidOptionFlag(u8),

    #[error("invalid bool byte {0}, expected 0 or 1")]
    InvalidBool(u8),

    #[error("invalid enum variant {index}, layout declares {count}")]
    InvalidVariant { index: u8, count: u8 },

    #[error("length {0} does not fit a u32 prefix")]
    LengthOverflow(usize),
}

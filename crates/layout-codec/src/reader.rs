//! Cursor over an input byte slice.

use crate::error::LayoutError;

/// Sequential reader over a borrowed byte slice.
///
/// Every read checks the remaining length first and fails with
/// [`LayoutError::BufferTooShort`] instead of panicking. Trailing bytes are
/// never an error: on-chain accounts are allocated for their largest
/// encoding, so a `None` option leaves zero padding at the end.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], LayoutError> {
        if len > self.remaining() {
            return Err(LayoutError::BufferTooShort {
                needed: self.offset + len,
                available: self.data.len(),
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.data[start..self.offset])
    }

    /// Read a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], LayoutError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, LayoutError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read an enum tag and check it against the declared variant count.
    pub fn read_variant(&mut self, count: u8) -> Result<u8, LayoutError> {
        let index = self.read_u8()?;
        if index >= count {
            return Err(LayoutError::InvalidVariant { index, count });
        }
        Ok(index)
    }
}

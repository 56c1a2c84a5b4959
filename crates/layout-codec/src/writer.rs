//! Cursor over a caller-supplied output buffer.

use crate::error::LayoutError;

/// Sequential writer into a fixed, caller-owned buffer.
///
/// The buffer never grows. Writing past its end fails with
/// [`LayoutError::BufferOverflow`] and leaves the cursor untouched.
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    offset: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset == 0
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), LayoutError> {
        let end = self.offset + bytes.len();
        if end > self.buf.len() {
            return Err(LayoutError::BufferOverflow {
                needed: end,
                capacity: self.buf.len(),
            });
        }
        self.buf[self.offset..end].copy_from_slice(bytes);
        self.offset = end;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), LayoutError> {
        self.write_bytes(&[value])
    }
}

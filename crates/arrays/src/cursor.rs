//! Byte cursor over a fully resident buffer
//!
//! All primitive values are little-endian, matching the platform that
//! produced the tables.

// crate modules
use crate::error::{Error, Result};
use crate::header::ElementHeader;

/// Forward-only cursor over an immutable byte buffer
///
/// The buffer may be anything that can be viewed as a byte slice, so a
/// `Vec<u8>` loaded up front, a borrowed `&[u8]`, or a memory map all work.
///
/// The offset only ever moves forward and is always within
/// `0..=buffer.len()`. Reading past the end is an [Error::UnexpectedEof],
/// and a failed read never moves the offset.
///
/// ```rust
/// # use tablekit_arrays::ByteCursor;
/// let mut cursor = ByteCursor::new(vec![0xff, 7, 0, 0, 0]);
/// assert_eq!(cursor.read_i8().unwrap(), -1);
/// assert_eq!(cursor.read_i32().unwrap(), 7);
/// assert!(cursor.at_end());
/// assert!(cursor.read_i8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<B> {
    buffer: B,
    offset: usize,
}

impl<B: AsRef<[u8]>> ByteCursor<B> {
    /// Create a cursor at the start of `buffer`
    pub fn new(buffer: B) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Current byte offset from the start of the buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.buffer.as_ref().len()
    }

    /// True if the underlying buffer has no bytes at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of bytes left to read
    pub fn remaining_bytes(&self) -> usize {
        self.len() - self.offset
    }

    /// True if no bytes remain
    ///
    /// Never consumes anything, so this is safe to call between any two
    /// reads.
    pub fn at_end(&self) -> bool {
        self.remaining_bytes() == 0
    }

    /// Give back the underlying buffer
    pub fn into_inner(self) -> B {
        self.buffer
    }

    /// Read a single signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    /// Read a 4-byte signed integer
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Read a 4-byte IEEE-754 float
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read an 8-byte IEEE-754 double
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Read the tag and length in front of an element
    pub fn read_header(&mut self) -> Result<ElementHeader> {
        let bytes = self.take(ElementHeader::SIZE)?;
        ElementHeader::from_bytes(bytes)
    }

    /// Consume exactly `n` bytes
    ///
    /// Nothing is consumed if fewer than `n` bytes remain.
    pub(crate) fn take(&mut self, n: usize) -> Result<&[u8]> {
        let available = self.remaining_bytes();
        if n > available {
            return Err(Error::UnexpectedEof {
                offset: self.offset,
                needed: n,
                available,
            });
        }

        let start = self.offset;
        self.offset += n;
        Ok(&self.buffer.as_ref()[start..self.offset])
    }

    /// Consume a fixed-size array of bytes
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take(N)?);
        Ok(bytes)
    }
}

impl<'a> From<&'a [u8]> for ByteCursor<&'a [u8]> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteCursor::new(bytes)
    }
}

impl From<Vec<u8>> for ByteCursor<Vec<u8>> {
    fn from(bytes: Vec<u8>) -> Self {
        ByteCursor::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_at_end() {
        let cursor = ByteCursor::new(Vec::new());
        assert!(cursor.at_end());
        assert!(cursor.is_empty());
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn primitive_reads() {
        let mut bytes = vec![];
        bytes.extend_from_slice(&(-3i32).to_le_bytes());
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-2.25f64).to_le_bytes());

        let mut cursor = ByteCursor::new(bytes.as_slice());
        assert_eq!(cursor.read_i32().unwrap(), -3);
        assert_eq!(cursor.read_f32().unwrap(), 1.5);
        assert_eq!(cursor.read_f64().unwrap(), -2.25);
        assert_eq!(cursor.offset(), 16);
        assert!(cursor.at_end());
    }

    #[test]
    fn truncated_read_does_not_advance() {
        let mut cursor = ByteCursor::new(vec![1, 2, 3]);
        assert_eq!(cursor.read_i8().unwrap(), 1);

        let error = cursor.read_i32().unwrap_err();
        assert!(matches!(
            error,
            Error::UnexpectedEof {
                offset: 1,
                needed: 4,
                available: 2
            }
        ));
        assert_eq!(cursor.offset(), 1);
        assert!(!cursor.at_end());
    }

    #[test]
    fn at_end_has_no_side_effects() {
        let mut cursor = ByteCursor::new(vec![9]);
        assert!(!cursor.at_end());
        assert!(!cursor.at_end());
        assert_eq!(cursor.read_i8().unwrap(), 9);
        assert!(cursor.at_end());
    }
}

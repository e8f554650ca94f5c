//! Incremental decoding of a single element
//!
//! An [ArrayHandle] is the streaming view of one element. Leaf kinds are
//! drained with one typed sequence read, containers by opening each child in
//! turn. Nothing is materialised beyond the values asked for, so very large
//! tables can be walked without building the whole tree.

// crate modules
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::header::ElementKind;

// external crates
use log::trace;

/// Live decoding handle bound to one element of the stream
///
/// Created by reading a tag and length header with [ArrayHandle::open], the
/// handle gates access to the element body by its declared kind:
///
/// | Kind      | Drained by                                   |
/// | --------- | -------------------------------------------- |
/// | `Array`   | [open_child()](ArrayHandle::open_child) × N |
/// | `Ints`    | [read_int_sequence()](ArrayHandle::read_int_sequence) |
/// | `Floats`  | [read_float_sequence()](ArrayHandle::read_float_sequence) |
/// | `Doubles` | [read_double_sequence()](ArrayHandle::read_double_sequence) |
///
/// The handle borrows the cursor for its lifetime, and a child handle
/// borrows its parent, so siblings can only be opened one after the other.
///
/// ## Draining order
///
/// Leaf bodies carry no marker beyond their fixed-width values, and there is
/// no way to skip an element without reading it. Every child must be fully
/// drained before the next is opened. If a handle is abandoned part way
/// through, the position of the underlying cursor is undefined for anything
/// read afterwards.
///
/// ```rust
/// # use tablekit_arrays::{ArrayHandle, ByteCursor, Element};
/// let bytes = Element::Array(vec![
///     Element::Doubles(vec![1.0, 2.0, 3.0]),
///     Element::Ints(vec![7, 8]),
/// ])
/// .to_bytes()
/// .unwrap();
///
/// let mut cursor = ByteCursor::new(bytes);
/// let mut root = ArrayHandle::open(&mut cursor).unwrap();
/// assert_eq!(root.remaining_count(), 2);
///
/// let values = root.open_child().unwrap().read_double_sequence().unwrap();
/// assert_eq!(values, vec![1.0, 2.0, 3.0]);
///
/// let values = root.open_child().unwrap().read_int_sequence().unwrap();
/// assert_eq!(values, vec![7, 8]);
///
/// assert_eq!(root.remaining_count(), 0);
/// assert!(cursor.at_end());
/// ```
#[derive(Debug)]
pub struct ArrayHandle<'c, B> {
    cursor: &'c mut ByteCursor<B>,
    kind: ElementKind,
    declared_length: usize,
    remaining: usize,
    offset: usize,
}

impl<'c, B: AsRef<[u8]>> ArrayHandle<'c, B> {
    /// Read the next element header from `cursor`
    ///
    /// Fails with [Error::UnexpectedEof] if the header is truncated,
    /// [Error::MalformedTag] for an unknown type tag, and
    /// [Error::NegativeLength] for a length below zero.
    pub fn open(cursor: &'c mut ByteCursor<B>) -> Result<Self> {
        let offset = cursor.offset();
        let (kind, declared_length) = cursor.read_header()?.validate(offset)?;
        trace!("Opened {kind} of length {declared_length} at byte {offset}");

        Ok(Self {
            cursor,
            kind,
            declared_length,
            remaining: declared_length,
            offset,
        })
    }

    /// Kind of element declared by the header
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of values or children declared by the header
    pub fn declared_length(&self) -> usize {
        self.declared_length
    }

    /// Number of values or children not yet consumed
    ///
    /// For leaves this is either the declared length or zero. For containers
    /// it counts down by one for every child opened.
    pub fn remaining_count(&self) -> usize {
        self.remaining
    }

    /// Byte offset of the element header in the stream
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// True once nothing remains to be consumed
    pub fn is_drained(&self) -> bool {
        self.remaining == 0
    }

    /// Read the full body of an `IntArray`
    pub fn read_int_sequence(&mut self) -> Result<Vec<i32>> {
        self.drain_leaf(ElementKind::Ints, i32::from_le_bytes)
    }

    /// Read the full body of a `FloatArray`
    pub fn read_float_sequence(&mut self) -> Result<Vec<f32>> {
        self.drain_leaf(ElementKind::Floats, f32::from_le_bytes)
    }

    /// Read the full body of a `DoubleArray`
    pub fn read_double_sequence(&mut self) -> Result<Vec<f64>> {
        self.drain_leaf(ElementKind::Doubles, f64::from_le_bytes)
    }

    /// Open the next child of an `Array`
    ///
    /// The returned handle shares the same cursor, and must be fully drained
    /// before this handle is used again.
    pub fn open_child(&mut self) -> Result<ArrayHandle<'_, B>> {
        self.expect_kind(ElementKind::Array)?;
        if self.remaining == 0 {
            return Err(Error::AlreadyDrained {
                offset: self.offset,
                kind: self.kind,
            });
        }

        let child = ArrayHandle::open(&mut *self.cursor)?;
        self.remaining -= 1;
        Ok(child)
    }

    /// Hand over the cursor, positioned at the next child of this `Array`
    ///
    /// Every remaining child is counted as consumed, so the caller takes over
    /// reading them straight from the cursor.
    pub(crate) fn release_children(&mut self) -> &mut ByteCursor<B> {
        self.remaining = 0;
        &mut *self.cursor
    }

    /// Check the declared kind before anything is consumed
    fn expect_kind(&self, expected: ElementKind) -> Result<()> {
        if self.kind != expected {
            return Err(Error::TypeMismatch {
                offset: self.offset,
                expected,
                found: self.kind,
            });
        }
        Ok(())
    }

    /// Shared body read for all of the fixed-width leaf kinds
    fn drain_leaf<T, const N: usize>(
        &mut self,
        expected: ElementKind,
        from_le_bytes: fn([u8; N]) -> T,
    ) -> Result<Vec<T>> {
        self.expect_kind(expected)?;
        if self.remaining == 0 && self.declared_length > 0 {
            return Err(Error::AlreadyDrained {
                offset: self.offset,
                kind: self.kind,
            });
        }

        // a corrupt length fails here rather than on allocation
        let byte_length = self.declared_length.saturating_mul(N);
        let values = self
            .cursor
            .take(byte_length)?
            .chunks_exact(N)
            .map(|chunk| {
                let mut bytes = [0u8; N];
                bytes.copy_from_slice(chunk);
                from_le_bytes(bytes)
            })
            .collect::<Vec<T>>();

        self.remaining = 0;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;

    fn encode(element: Element) -> Vec<u8> {
        element.to_bytes().unwrap()
    }

    #[test]
    fn leaf_drains_once() {
        let mut cursor = ByteCursor::new(encode(Element::Floats(vec![0.5, -0.5])));
        let mut handle = ArrayHandle::open(&mut cursor).unwrap();
        assert_eq!(handle.kind(), ElementKind::Floats);
        assert_eq!(handle.declared_length(), 2);
        assert_eq!(handle.remaining_count(), 2);

        assert_eq!(handle.read_float_sequence().unwrap(), vec![0.5, -0.5]);
        assert_eq!(handle.remaining_count(), 0);
        assert!(handle.is_drained());

        assert!(matches!(
            handle.read_float_sequence(),
            Err(Error::AlreadyDrained {
                offset: 0,
                kind: ElementKind::Floats
            })
        ));
    }

    #[test]
    fn empty_leaf_reads_nothing() {
        let bytes = encode(Element::Doubles(vec![]));
        assert_eq!(bytes.len(), 5);

        let mut cursor = ByteCursor::new(bytes);
        let mut handle = ArrayHandle::open(&mut cursor).unwrap();
        assert!(handle.read_double_sequence().unwrap().is_empty());
        assert_eq!(handle.remaining_count(), 0);
        assert!(handle.read_double_sequence().unwrap().is_empty());
        assert!(cursor.at_end());
    }

    #[test]
    fn mismatch_does_not_advance() {
        let mut cursor = ByteCursor::new(encode(Element::Ints(vec![1, 2, 3])));
        let mut handle = ArrayHandle::open(&mut cursor).unwrap();

        let error = handle.read_double_sequence().unwrap_err();
        assert!(matches!(
            error,
            Error::TypeMismatch {
                offset: 0,
                expected: ElementKind::Doubles,
                found: ElementKind::Ints
            }
        ));
        assert!(matches!(
            handle.open_child(),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(handle.remaining_count(), 3);

        // the correct reading order still works
        assert_eq!(handle.read_int_sequence().unwrap(), vec![1, 2, 3]);
        assert!(cursor.at_end());
    }

    #[test]
    fn container_counts_down() {
        let element = Element::Array(vec![
            Element::Array(vec![Element::Doubles(vec![4.0])]),
            Element::Ints(vec![]),
        ]);
        let mut cursor = ByteCursor::new(encode(element));
        let mut root = ArrayHandle::open(&mut cursor).unwrap();
        assert_eq!(root.remaining_count(), 2);

        let mut inner = root.open_child().unwrap();
        assert_eq!(inner.kind(), ElementKind::Array);
        let mut leaf = inner.open_child().unwrap();
        assert_eq!(leaf.read_double_sequence().unwrap(), vec![4.0]);
        assert_eq!(inner.remaining_count(), 0);
        assert_eq!(root.remaining_count(), 1);

        assert!(root.open_child().unwrap().read_int_sequence().unwrap().is_empty());
        assert_eq!(root.remaining_count(), 0);
        assert!(matches!(
            root.open_child(),
            Err(Error::AlreadyDrained { .. })
        ));
    }

    #[test]
    fn unknown_tag() {
        let mut cursor = ByteCursor::new(vec![4, 0, 0, 0, 0]);
        assert!(matches!(
            ArrayHandle::open(&mut cursor),
            Err(Error::MalformedTag { offset: 0, tag: 4 })
        ));
    }

    #[test]
    fn huge_length_fails_without_allocating() {
        let mut bytes = vec![3];
        bytes.extend_from_slice(&i32::MAX.to_le_bytes());
        bytes.extend_from_slice(&1.0f64.to_le_bytes());

        let mut cursor = ByteCursor::new(bytes);
        let mut handle = ArrayHandle::open(&mut cursor).unwrap();
        assert!(matches!(
            handle.read_double_sequence(),
            Err(Error::UnexpectedEof {
                offset: 5,
                available: 8,
                ..
            })
        ));
    }
}

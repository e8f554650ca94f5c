// standard library
use std::io::Write;

// crate modules
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::handle::ArrayHandle;
use crate::header::{ElementHeader, ElementKind};
use crate::writer::Writer;

// external crates
use serde::{Deserialize, Serialize};
use tablekit_format::{f, preview};

/// Fully materialised element tree
///
/// A container holds any number of self-tagged children, and each leaf is a
/// flat run of homogeneous values. Nesting may be arbitrarily deep, so for
/// example an array of arrays of doubles is simply
///
/// ```rust
/// # use tablekit_arrays::Element;
/// let table = Element::Array(vec![
///     Element::Array(vec![Element::Doubles(vec![0.1, 0.2])]),
///     Element::Array(vec![Element::Doubles(vec![0.3])]),
/// ]);
/// assert_eq!(table.len(), 2);
/// ```
///
/// Use [Element::decode] to drain a streaming [ArrayHandle] into a tree, and
/// [Element::encode] or [Element::to_bytes] to write one back out.
///
/// Decoding, encoding, [Element::bit_eq], `Display` and dropping walk the
/// tree with a heap stack, so their depth is not limited by the call stack.
/// The derived `Clone`, `PartialEq`, `Debug` and serde impls still recurse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    /// Container of nested elements (tag 0)
    Array(Vec<Element>),
    /// 4-byte signed integers (tag 1)
    Ints(Vec<i32>),
    /// 4-byte floats (tag 2)
    Floats(Vec<f32>),
    /// 8-byte doubles (tag 3)
    Doubles(Vec<f64>),
}

/// Container part way through decoding
struct Frame {
    children: Vec<Element>,
    remaining: usize,
}

impl Frame {
    /// Every child takes at least a header, so the capacity never exceeds
    /// what the rest of the stream could actually hold
    fn new(remaining: usize, available_bytes: usize) -> Self {
        let capacity = remaining.min(available_bytes / ElementHeader::SIZE);
        Self {
            children: Vec::with_capacity(capacity),
            remaining,
        }
    }
}

impl Element {
    /// Drain `handle` into a tree
    ///
    /// On success the handle is always left fully drained. Containers are
    /// decoded child by child straight from the shared cursor.
    pub fn decode<B: AsRef<[u8]>>(handle: &mut ArrayHandle<'_, B>) -> Result<Self> {
        Ok(match handle.kind() {
            ElementKind::Ints => Self::Ints(handle.read_int_sequence()?),
            ElementKind::Floats => Self::Floats(handle.read_float_sequence()?),
            ElementKind::Doubles => Self::Doubles(handle.read_double_sequence()?),
            ElementKind::Array => {
                let remaining = handle.remaining_count();
                return Self::decode_children(handle.release_children(), remaining);
            }
        })
    }

    /// Read `remaining` children from `cursor` into a container
    fn decode_children<B: AsRef<[u8]>>(
        cursor: &mut ByteCursor<B>,
        remaining: usize,
    ) -> Result<Self> {
        let mut current = Frame::new(remaining, cursor.remaining_bytes());
        let mut parents = Vec::new();

        loop {
            if current.remaining == 0 {
                let element = Self::Array(std::mem::take(&mut current.children));
                match parents.pop() {
                    Some(parent) => {
                        current = parent;
                        current.children.push(element);
                        continue;
                    }
                    None => return Ok(element),
                }
            }

            current.remaining -= 1;
            let mut child = ArrayHandle::open(&mut *cursor)?;
            if child.kind() == ElementKind::Array {
                let length = child.declared_length();
                let frame = Frame::new(length, cursor.remaining_bytes());
                parents.push(std::mem::replace(&mut current, frame));
            } else {
                let element = Self::decode(&mut child)?;
                current.children.push(element);
            }
        }
    }

    /// Write the element and everything nested inside it
    pub fn encode<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_element(self)
    }

    /// Encode to a standalone byte buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        self.encode(&mut writer)?;
        writer.finish()
    }

    /// Kind of element, matching the tag it is written with
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Array(_) => ElementKind::Array,
            Self::Ints(_) => ElementKind::Ints,
            Self::Floats(_) => ElementKind::Floats,
            Self::Doubles(_) => ElementKind::Doubles,
        }
    }

    /// Number of children or values, as written in the header
    pub fn len(&self) -> usize {
        match self {
            Self::Array(children) => children.len(),
            Self::Ints(values) => values.len(),
            Self::Floats(values) => values.len(),
            Self::Doubles(values) => values.len(),
        }
    }

    /// True if there are no children or values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children of a container, `None` for leaves
    pub fn children(&self) -> Option<&[Element]> {
        match self {
            Self::Array(children) => Some(children),
            _ => None,
        }
    }

    /// Child at `index` of a container
    pub fn child(&self, index: usize) -> Option<&Element> {
        self.children()?.get(index)
    }

    /// Values of an `IntArray`, `None` for any other kind
    pub fn as_ints(&self) -> Option<&[i32]> {
        match self {
            Self::Ints(values) => Some(values),
            _ => None,
        }
    }

    /// Values of a `FloatArray`, `None` for any other kind
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::Floats(values) => Some(values),
            _ => None,
        }
    }

    /// Values of a `DoubleArray`, `None` for any other kind
    pub fn as_doubles(&self) -> Option<&[f64]> {
        match self {
            Self::Doubles(values) => Some(values),
            _ => None,
        }
    }

    /// Exact equality, comparing floating point values by bit pattern
    ///
    /// Unlike `==`, a NaN is equal to an identical NaN and `0.0` differs
    /// from `-0.0`.
    ///
    /// ```rust
    /// # use tablekit_arrays::Element;
    /// let a = Element::Doubles(vec![f64::NAN]);
    /// assert!(a.bit_eq(&a.clone()));
    /// assert_ne!(a, a.clone());
    /// ```
    pub fn bit_eq(&self, other: &Element) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            let equal = match pair {
                (Self::Array(a), Self::Array(b)) => {
                    pending.extend(a.iter().zip(b.iter()));
                    a.len() == b.len()
                }
                (Self::Ints(a), Self::Ints(b)) => a == b,
                (Self::Floats(a), Self::Floats(b)) => {
                    a.iter().map(|v| v.to_bits()).eq(b.iter().map(|v| v.to_bits()))
                }
                (Self::Doubles(a), Self::Doubles(b)) => {
                    a.iter().map(|v| v.to_bits()).eq(b.iter().map(|v| v.to_bits()))
                }
                _ => false,
            };
            if !equal {
                return false;
            }
        }
        true
    }

    /// Indented one-line-per-node summary
    fn summary(&self) -> String {
        let mut lines = Vec::new();
        let mut pending = vec![(0, self)];
        while let Some((depth, element)) = pending.pop() {
            let indent = "  ".repeat(depth);
            let kind = element.kind();
            let line = match element {
                Self::Array(children) => {
                    // reversed so the first child is listed first
                    pending.extend(children.iter().rev().map(|child| (depth + 1, child)));
                    f!("{indent}{kind}({})", children.len())
                }
                Self::Ints(v) => f!("{indent}{kind}({}) {}", v.len(), preview(v, 3)),
                Self::Floats(v) => f!("{indent}{kind}({}) {}", v.len(), preview(v, 3)),
                Self::Doubles(v) => f!("{indent}{kind}({}) {}", v.len(), preview(v, 3)),
            };
            lines.push(line);
        }
        lines.join("\n")
    }
}

impl Drop for Element {
    /// Flatten nested containers onto a heap stack before they are freed
    fn drop(&mut self) {
        let mut pending = match self {
            Self::Array(children) => std::mem::take(children),
            _ => return,
        };
        while let Some(mut child) = pending.pop() {
            if let Self::Array(grandchildren) = &mut child {
                pending.append(grandchildren);
            }
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}

impl From<Vec<Element>> for Element {
    fn from(children: Vec<Element>) -> Self {
        Self::Array(children)
    }
}

impl From<Vec<i32>> for Element {
    fn from(values: Vec<i32>) -> Self {
        Self::Ints(values)
    }
}

impl From<Vec<f32>> for Element {
    fn from(values: Vec<f32>) -> Self {
        Self::Floats(values)
    }
}

impl From<Vec<f64>> for Element {
    fn from(values: Vec<f64>) -> Self {
        Self::Doubles(values)
    }
}

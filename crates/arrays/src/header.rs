//! Element kinds and the fixed-width header in front of every element

// crate modules
use crate::error::{Error, Result};

// external crates
use serde::{Deserialize, Serialize};

/// Kind of element, as given by the one-byte type tag
///
/// | tag | kind      | body                                  |
/// | --- | --------- | ------------------------------------- |
/// | 0   | `Array`   | `length` nested elements, each tagged |
/// | 1   | `Ints`    | `length` × 4-byte signed integers     |
/// | 2   | `Floats`  | `length` × 4-byte IEEE-754 floats     |
/// | 3   | `Doubles` | `length` × 8-byte IEEE-754 doubles    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Container of fully tagged child elements
    Array,
    /// Leaf of 4-byte signed integers
    Ints,
    /// Leaf of 4-byte floats
    Floats,
    /// Leaf of 8-byte doubles
    Doubles,
}

impl ElementKind {
    /// The type tag written in front of this kind of element
    pub fn tag(&self) -> i8 {
        match self {
            Self::Array => 0,
            Self::Ints => 1,
            Self::Floats => 2,
            Self::Doubles => 3,
        }
    }

    /// Byte width of a single leaf value, zero for containers
    pub fn value_width(&self) -> usize {
        match self {
            Self::Array => 0,
            Self::Ints => std::mem::size_of::<i32>(),
            Self::Floats => std::mem::size_of::<f32>(),
            Self::Doubles => std::mem::size_of::<f64>(),
        }
    }

    /// True for the flat homogeneous kinds
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Array)
    }
}

impl TryFrom<i8> for ElementKind {
    type Error = i8;

    /// Fails with the offending tag for anything outside of 0..=3
    fn try_from(tag: i8) -> core::result::Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Array),
            1 => Ok(Self::Ints),
            2 => Ok(Self::Floats),
            3 => Ok(Self::Doubles),
            _ => Err(tag),
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Array => "Array",
            Self::Ints => "IntArray",
            Self::Floats => "FloatArray",
            Self::Doubles => "DoubleArray",
        };
        write!(f, "{name}")
    }
}

/// The tag and length in front of every element
///
/// The byte layout is a signed byte followed by a little-endian signed
/// 32-bit length, with no padding.
///
/// ```text
/// <tag i8> <length i32>
/// ```
///
/// This is exactly the fixed-width little-endian layout bincode uses by
/// default, so the header is (de)serialised directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHeader {
    /// Raw type tag
    pub tag: i8,
    /// Raw declared length
    pub length: i32,
}

impl ElementHeader {
    /// Number of bytes a header occupies in the stream
    pub const SIZE: usize = std::mem::size_of::<i8>() + std::mem::size_of::<i32>();

    /// Build a header for `length` values or children of `kind`
    pub fn new(kind: ElementKind, length: usize) -> Result<Self> {
        let length = i32::try_from(length).map_err(|_| Error::LengthOverflow { length })?;
        Ok(Self {
            tag: kind.tag(),
            length,
        })
    }

    /// Decode a header from exactly [ElementHeader::SIZE] bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Encode the header to its [ElementHeader::SIZE] byte form
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Validate the raw fields, given the offset the header was read from
    pub fn validate(&self, offset: usize) -> Result<(ElementKind, usize)> {
        let kind =
            ElementKind::try_from(self.tag).map_err(|tag| Error::MalformedTag { offset, tag })?;
        let length = usize::try_from(self.length).map_err(|_| Error::NegativeLength {
            offset,
            length: self.length,
        })?;
        Ok((kind, length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let header = ElementHeader::new(ElementKind::Doubles, 3).unwrap();
        assert_eq!(header.to_bytes().unwrap(), vec![3, 3, 0, 0, 0]);

        let header = ElementHeader::from_bytes(&[0, 0xff, 0xff, 0xff, 0x7f]).unwrap();
        assert_eq!(header.tag, 0);
        assert_eq!(header.length, i32::MAX);
    }

    #[test]
    fn tag_conversion() {
        for kind in [
            ElementKind::Array,
            ElementKind::Ints,
            ElementKind::Floats,
            ElementKind::Doubles,
        ] {
            assert_eq!(ElementKind::try_from(kind.tag()), Ok(kind));
        }
        assert_eq!(ElementKind::try_from(4), Err(4));
        assert_eq!(ElementKind::try_from(-1), Err(-1));
    }

    #[test]
    fn validate_rejects_bad_fields() {
        let bad_tag = ElementHeader { tag: 7, length: 1 };
        assert!(matches!(
            bad_tag.validate(12),
            Err(Error::MalformedTag { offset: 12, tag: 7 })
        ));

        let negative = ElementHeader { tag: 1, length: -2 };
        assert!(matches!(
            negative.validate(0),
            Err(Error::NegativeLength { offset: 0, length: -2 })
        ));
    }

    #[test]
    fn oversized_length() {
        let length = i32::MAX as usize + 1;
        assert!(matches!(
            ElementHeader::new(ElementKind::Ints, length),
            Err(Error::LengthOverflow { .. })
        ));
    }
}

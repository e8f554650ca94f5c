//! The (X, Y) pair convention
//!
//! Most tables written by the simulations are curves or histograms stored as
//! a container of exactly two double arrays:
//!
//! ```text
//! Array(2)
//!   DoubleArray(n)   domain values or bin edges
//!   DoubleArray(m)   dependent values or counts
//! ```
//!
//! This is purely a usage convention. The decoder knows nothing about it, and
//! a pair is read like any other element. [Curve] is a convenience for files
//! that are known to follow it.

// crate modules
use crate::element::Element;
use crate::error::{Error, Result};
use crate::handle::ArrayHandle;
use crate::header::ElementKind;

// external crates
use serde::{Deserialize, Serialize};
use tablekit_format::f;

/// Pair of double sequences, e.g. an (X, Y) curve or (bin edges, counts)
///
/// The two sequences are allowed to differ in length, since histogram edges
/// have one more value than the counts between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Domain values or bin edges
    pub x: Vec<f64>,
    /// Dependent values or counts
    pub y: Vec<f64>,
}

impl Curve {
    /// Create a new curve from its two sequences
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    /// Drain a pair from a handle opened on it
    ///
    /// Fails with [Error::UnexpectedShape] if the handle is not a two-child
    /// container, or with [Error::TypeMismatch] if either child is not a
    /// `DoubleArray`.
    ///
    /// ```rust
    /// # use tablekit_arrays::{Curve, Reader};
    /// let curve = Curve::new(vec![0.0, 1.0], vec![5.0, 6.0]);
    /// let bytes = curve.to_element().to_bytes().unwrap();
    ///
    /// let mut reader = Reader::new(bytes);
    /// let mut handle = reader.next_array().unwrap().unwrap();
    /// assert_eq!(Curve::read(&mut handle).unwrap(), curve);
    /// ```
    pub fn read<B: AsRef<[u8]>>(handle: &mut ArrayHandle<'_, B>) -> Result<Self> {
        let untouched_pair = handle.declared_length() == 2 && handle.remaining_count() == 2;
        if handle.kind() != ElementKind::Array || !untouched_pair {
            return Err(Error::UnexpectedShape {
                expected: "Array(2) of DoubleArray".to_string(),
                found: f!("{}({})", handle.kind(), handle.remaining_count()),
            });
        }

        let x = handle.open_child()?.read_double_sequence()?;
        let y = handle.open_child()?.read_double_sequence()?;
        Ok(Self { x, y })
    }

    /// Convert to the `Array[DoubleArray, DoubleArray]` form
    pub fn to_element(&self) -> Element {
        Element::Array(vec![
            Element::Doubles(self.x.clone()),
            Element::Doubles(self.y.clone()),
        ])
    }

    /// Iterate over (x, y) points, up to the shorter of the two sequences
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// True if both sequences have the same length
    pub fn is_paired(&self) -> bool {
        self.x.len() == self.y.len()
    }
}

impl TryFrom<&Element> for Curve {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self> {
        let shape_error = || Error::UnexpectedShape {
            expected: "Array(2) of DoubleArray".to_string(),
            found: f!("{}({})", element.kind(), element.len()),
        };

        match element.children() {
            Some([x, y]) => match (x.as_doubles(), y.as_doubles()) {
                (Some(x), Some(y)) => Ok(Self::new(x.to_vec(), y.to_vec())),
                _ => Err(shape_error()),
            },
            _ => Err(shape_error()),
        }
    }
}

impl From<Curve> for Element {
    fn from(curve: Curve) -> Self {
        Element::Array(vec![Element::Doubles(curve.x), Element::Doubles(curve.y)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteCursor, Writer};

    #[test]
    fn histogram_edges_and_counts() {
        let curve = Curve::new(vec![0.0, 1.0, 2.0], vec![10.0, 20.0]);
        assert!(!curve.is_paired());
        assert_eq!(curve.points().collect::<Vec<_>>(), vec![(0.0, 10.0), (1.0, 20.0)]);

        let element = Element::from(curve.clone());
        assert_eq!(Curve::try_from(&element).unwrap(), curve);
    }

    #[test]
    fn wrong_shapes() {
        let three = Element::Array(vec![
            Element::Doubles(vec![]),
            Element::Doubles(vec![]),
            Element::Doubles(vec![]),
        ]);
        assert!(matches!(
            Curve::try_from(&three),
            Err(Error::UnexpectedShape { .. })
        ));

        let ints = Element::Array(vec![Element::Doubles(vec![]), Element::Ints(vec![])]);
        assert!(matches!(
            Curve::try_from(&ints),
            Err(Error::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn partly_read_triple_is_not_a_pair() {
        let element = Element::Array(vec![
            Element::Doubles(vec![1.0]),
            Element::Doubles(vec![2.0]),
            Element::Doubles(vec![3.0]),
        ]);
        let mut cursor = ByteCursor::new(element.to_bytes().unwrap());
        let mut handle = ArrayHandle::open(&mut cursor).unwrap();
        handle.open_child().unwrap().read_double_sequence().unwrap();
        assert_eq!(handle.remaining_count(), 2);

        assert!(matches!(
            Curve::read(&mut handle),
            Err(Error::UnexpectedShape { .. })
        ));
        assert_eq!(handle.remaining_count(), 2);
    }

    #[test]
    fn streaming_read_rejects_wrong_child_kind() {
        let mut writer = Writer::new(Vec::new());
        writer.begin_array(2).unwrap();
        writer.write_doubles(&[1.0]).unwrap();
        writer.write_floats(&[1.0]).unwrap();
        let bytes = writer.finish().unwrap();

        let mut cursor = ByteCursor::new(bytes);
        let mut handle = ArrayHandle::open(&mut cursor).unwrap();
        assert!(matches!(
            Curve::read(&mut handle),
            Err(Error::TypeMismatch {
                offset: 18,
                expected: ElementKind::Doubles,
                found: ElementKind::Floats
            })
        ));
    }
}

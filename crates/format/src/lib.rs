//! Common formatting for text summaries of numeric tables
//!
//! These are left public for convenience.
//!
//! Table dumps and `Display` implementations all want the same consistent
//! scientific notation and a short form for very long sequences.
#![doc = include_str!("../readme.md")]

// standard library
use std::fmt::{Display, LowerExp};

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Extends primitives with more specific formatting options
pub trait NumFormat {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// Works for anything that can be represented as scientific using the
    /// `LowerExp` trait, which is every numeric type stored in a table.
    ///
    /// ```rust
    /// # use tablekit_format::NumFormat;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.0).sci(5, 2), "1.00000e+00".to_string());
    /// assert_eq!((0.0025f32).sci(2, 3), "2.50e-003".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: LowerExp> NumFormat for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // `LowerExp` output always contains an 'e'
        let split = num.find('e').unwrap_or(num.len());
        let exp = num.split_off(split);
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', exp.get(1..).unwrap_or("0")),
        };
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }
}

/// Short form of a sequence for one-line summaries
///
/// Sequences with at most `2 * n` values are listed in full. Anything longer
/// keeps the first and last `n` values either side of an ellipsis.
///
/// ```rust
/// # use tablekit_format::preview;
/// assert_eq!(preview(&[1, 2, 3], 2), "[1, 2, 3]");
/// assert_eq!(preview(&[1, 2, 3, 4, 5, 6], 2), "[1, 2, ..., 5, 6]");
/// assert_eq!(preview::<f64>(&[], 2), "[]");
/// ```
pub fn preview<T: Display>(values: &[T], n: usize) -> String {
    let join = |values: &[T]| {
        values
            .iter()
            .map(|v| f!("{v}"))
            .collect::<Vec<String>>()
            .join(", ")
    };

    if values.len() <= 2 * n {
        f!("[{}]", join(values))
    } else if n == 0 {
        "[...]".to_string()
    } else {
        let head = join(&values[..n]);
        let tail = join(&values[values.len() - n..]);
        f!("[{head}, ..., {tail}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sci_pads_exponent() {
        assert_eq!(1.5e10.sci(3, 3), "1.500e+010");
        assert_eq!(1.5e-10.sci(1, 2), "1.5e-10");
        assert_eq!(0.0.sci(2, 2), "0.00e+00");
    }

    #[test]
    fn preview_of_long_sequence() {
        let values = (0..100).collect::<Vec<i32>>();
        assert_eq!(preview(&values, 1), "[0, ..., 99]");
        assert_eq!(preview(&values, 0), "[...]");
        assert_eq!(preview(&values[..2], 1), "[0, 1]");
    }
}

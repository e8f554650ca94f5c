//! Text exports of decoded elements for inspection

// standard library
use std::io::Write;
use std::path::Path;

// crate modules
use crate::element::Element;
use crate::error::{Error, Result};
use crate::writer::init_writer;

// external crates
use tablekit_format::{f, NumFormat};

/// Write elements to a JSON file
///
/// Any elements read from a binary file may be written to JSON for
/// inspection or for use with other tools.
///
/// This is a direct serialization of the element tree, with every leaf
/// written as a tagged list of values. JSON has no representation for NaN or
/// infinities, so any non-finite float or double fails with
/// [Error::NonFiniteValue] before the file is created.
///
/// The serialization recurses once per nesting level, so this is meant for
/// tables of ordinary depth.
///
/// ```rust, no_run
/// # use tablekit_arrays::{read_file, write_json};
/// let elements = read_file("./tables/moller").unwrap();
/// write_json(&elements, "./moller.json").unwrap();
/// ```
pub fn write_json<P: AsRef<Path>>(elements: &[Element], path: P) -> Result<()> {
    check_finite(elements)?;
    let writer = init_writer(path)?;
    serde_json::to_writer_pretty(writer, elements)?;
    Ok(())
}

/// Find the first leaf holding a NaN or infinite value
fn check_finite(elements: &[Element]) -> Result<()> {
    let mut pending = elements.iter().collect::<Vec<&Element>>();
    while let Some(element) = pending.pop() {
        let finite = match element {
            Element::Array(children) => {
                pending.extend(children.iter());
                true
            }
            Element::Ints(_) => true,
            Element::Floats(values) => values.iter().all(|v| v.is_finite()),
            Element::Doubles(values) => values.iter().all(|v| v.is_finite()),
        };
        if !finite {
            return Err(Error::NonFiniteValue {
                kind: element.kind(),
            });
        }
    }
    Ok(())
}

/// Write elements to a human readable text file
///
/// Every element is listed with its kind and length, indented by depth, and
/// followed by its values in scientific notation wrapped to 80 columns.
///
/// ```rust, no_run
/// # use tablekit_arrays::{read_file, write_ascii_pretty};
/// let elements = read_file("./tables/moller").unwrap();
/// write_ascii_pretty(&elements, "./moller.txt").unwrap();
/// ```
pub fn write_ascii_pretty<P: AsRef<Path>>(elements: &[Element], path: P) -> Result<()> {
    let mut writer = init_writer(path)?;
    writeln!(writer, "Top-level elements: {}", elements.len())?;

    for (i, element) in elements.iter().enumerate() {
        writeln!(writer, "\nElement[{i}]:")?;
        writer.write_all(pretty(element, 0).as_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

/// Indented listing of an element and its values
fn pretty(element: &Element, depth: usize) -> String {
    let mut s = String::new();
    let mut pending = vec![(depth, element)];

    while let Some((depth, element)) = pending.pop() {
        let indent = "    ".repeat(depth);
        s += &f!("{indent}{} ({} values)\n", element.kind(), element.len());

        let values = match element {
            Element::Array(children) => {
                // reversed so the first child is listed first
                pending.extend(children.iter().rev().map(|child| (depth + 1, child)));
                continue;
            }
            Element::Ints(values) => values.iter().map(|v| f!("{v}")).collect::<Vec<String>>(),
            Element::Floats(values) => values.iter().map(|v| v.sci(5, 2)).collect(),
            Element::Doubles(values) => values.iter().map(|v| v.sci(5, 2)).collect(),
        };

        if !values.is_empty() {
            let options = textwrap::Options::new(80)
                .initial_indent(&indent)
                .subsequent_indent(&indent);
            s += &textwrap::fill(&values.join(" "), options);
            s += "\n";
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    #[test]
    fn pretty_listing() {
        let element = Element::Array(vec![
            Element::Ints(vec![1, 2]),
            Element::Doubles(vec![1.0, -0.5]),
            Element::Floats(vec![]),
        ]);

        assert_eq!(
            pretty(&element, 0),
            "Array (3 values)\n\
             \x20   IntArray (2 values)\n\
             \x20   1 2\n\
             \x20   DoubleArray (2 values)\n\
             \x20   1.00000e+00 -5.00000e-01\n\
             \x20   FloatArray (0 values)\n"
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let nested = Element::Array(vec![
            Element::Doubles(vec![1.0]),
            Element::Array(vec![Element::Floats(vec![0.5, f32::NAN])]),
        ]);
        assert!(matches!(
            check_finite(&[Element::Ints(vec![1]), nested]),
            Err(Error::NonFiniteValue {
                kind: ElementKind::Floats
            })
        ));
        assert!(check_finite(&[Element::Doubles(vec![f64::MAX, -0.0])]).is_ok());
        assert!(check_finite(&[Element::Doubles(vec![f64::NEG_INFINITY])]).is_err());
    }

    #[test]
    fn long_leaves_wrap() {
        let element = Element::Doubles(vec![1.0; 20]);
        for line in pretty(&element, 1).lines() {
            assert!(line.len() <= 80);
            assert!(line.starts_with("    "));
        }
    }
}

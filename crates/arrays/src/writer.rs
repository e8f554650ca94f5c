//! Sequential encoder for the binary array format
//!
//! Elements are written once, depth-first, in exactly the order a reader will
//! later drain them. There is no header, footer, or index for the file, so
//! any number of top-level elements may simply be written back-to-back.

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::element::Element;
use crate::error::{Error, Result};
use crate::header::{ElementHeader, ElementKind};

// external crates
use log::{info, trace};

/// Streaming writer for tagged elements
///
/// Leaves are written in one call. Containers are opened with
/// [begin_array()](Writer::begin_array), which declares how many children
/// follow, and every element written afterwards counts against the innermost
/// open container until its declared number of children is reached.
///
/// [finish()](Writer::finish) fails if a container is still waiting on
/// children, since the reader would otherwise run off the end of the stream.
///
/// ```rust
/// # use tablekit_arrays::{read_elements, Element, Writer};
/// let mut writer = Writer::new(Vec::new());
///
/// // Array[ DoubleArray[1, 2, 3], IntArray[7, 8] ]
/// writer.begin_array(2).unwrap();
/// writer.write_doubles(&[1.0, 2.0, 3.0]).unwrap();
/// writer.write_ints(&[7, 8]).unwrap();
///
/// let bytes = writer.finish().unwrap();
/// let elements = read_elements(bytes).unwrap();
/// assert_eq!(
///     elements,
///     vec![Element::Array(vec![
///         Element::Doubles(vec![1.0, 2.0, 3.0]),
///         Element::Ints(vec![7, 8]),
///     ])]
/// );
/// ```
#[derive(Debug)]
pub struct Writer<W: Write> {
    inner: W,
    /// Children still expected by each open container, innermost last
    open: Vec<usize>,
    bytes_written: usize,
}

impl<W: Write> Writer<W> {
    /// Create a writer around any byte sink
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            open: Vec::new(),
            bytes_written: 0,
        }
    }

    /// Number of containers still waiting on children
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Total number of bytes written so far
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Start a container that will hold exactly `length` children
    pub fn begin_array(&mut self, length: usize) -> Result<()> {
        self.begin_element(ElementKind::Array, length)?;
        if length > 0 {
            self.open.push(length);
        } else {
            self.close_complete();
        }
        Ok(())
    }

    /// Write a complete `IntArray`
    pub fn write_ints(&mut self, values: &[i32]) -> Result<()> {
        self.begin_element(ElementKind::Ints, values.len())?;
        for value in values {
            self.write_raw(&value.to_le_bytes())?;
        }
        self.close_complete();
        Ok(())
    }

    /// Write a complete `FloatArray`
    pub fn write_floats(&mut self, values: &[f32]) -> Result<()> {
        self.begin_element(ElementKind::Floats, values.len())?;
        for value in values {
            self.write_raw(&value.to_le_bytes())?;
        }
        self.close_complete();
        Ok(())
    }

    /// Write a complete `DoubleArray`
    pub fn write_doubles(&mut self, values: &[f64]) -> Result<()> {
        self.begin_element(ElementKind::Doubles, values.len())?;
        for value in values {
            self.write_raw(&value.to_le_bytes())?;
        }
        self.close_complete();
        Ok(())
    }

    /// Write an element tree depth-first
    ///
    /// Open containers are tracked on a heap stack, so the tree may be nested
    /// deeper than the call stack would allow.
    pub fn write_element(&mut self, element: &Element) -> Result<()> {
        let mut pending = vec![std::slice::from_ref(element).iter()];
        while let Some(siblings) = pending.last_mut() {
            let Some(element) = siblings.next() else {
                pending.pop();
                continue;
            };

            match element {
                Element::Array(children) => {
                    self.begin_array(children.len())?;
                    pending.push(children.iter());
                }
                Element::Ints(values) => self.write_ints(values)?,
                Element::Floats(values) => self.write_floats(values)?,
                Element::Doubles(values) => self.write_doubles(values)?,
            }
        }
        Ok(())
    }

    /// Flush and hand back the underlying sink
    ///
    /// Fails with [Error::UnfinishedArray] if any container still expects
    /// children.
    pub fn finish(mut self) -> Result<W> {
        let remaining = self.open.iter().sum::<usize>();
        if remaining > 0 {
            return Err(Error::UnfinishedArray { remaining });
        }
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Write a header and count it against the innermost open container
    fn begin_element(&mut self, kind: ElementKind, length: usize) -> Result<()> {
        let header = ElementHeader::new(kind, length)?;
        trace!(
            "Writing {kind} of length {length} at byte {}",
            self.bytes_written
        );
        self.write_raw(&header.to_bytes()?)?;

        if let Some(expected) = self.open.last_mut() {
            *expected -= 1;
        }
        Ok(())
    }

    /// Pop every container that has received all of its children
    fn close_complete(&mut self) {
        while self.open.last() == Some(&0) {
            self.open.pop();
        }
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }
}

/// Encode top-level elements back-to-back into `sink`
///
/// Returns the sink once everything has been written and flushed.
pub fn write_elements<W: Write>(elements: &[Element], sink: W) -> Result<W> {
    let mut writer = Writer::new(sink);
    for element in elements {
        writer.write_element(element)?;
    }
    writer.finish()
}

/// Write top-level elements to a binary file at `path`
///
/// The file is created, or truncated if it already exists.
///
/// ```rust, no_run
/// # use tablekit_arrays::{write_file, Element};
/// let energies = Element::Doubles(vec![1.0e3, 1.0e4, 1.0e5]);
/// let counts = Element::Ints(vec![12, 40, 3]);
/// write_file("./spectrum.bin", &[energies, counts]).unwrap();
/// ```
pub fn write_file<P: AsRef<Path>>(path: P, elements: &[Element]) -> Result<()> {
    info!("Writing {} elements to {}", elements.len(), path.as_ref().display());
    let writer = init_writer(path)?;
    write_elements(elements, writer)?;
    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
pub(crate) fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

//! Reading top-level elements back out of a stream
//!
//! A file is zero or more top-level elements written back-to-back with no
//! header, footer, or directory, so the end of the buffer is the only
//! terminator. The reader must know by convention how many elements a file
//! holds and what shape each one has.

// standard library
use std::path::Path;

// crate modules
use crate::cursor::ByteCursor;
use crate::element::Element;
use crate::error::Result;
use crate::handle::ArrayHandle;

// external crates
use log::{debug, info};

/// Sequential reader over the top-level elements of a stream
///
/// Each call to [next_array()](Reader::next_array) opens the next top-level
/// element, which must be fully drained before the following one is opened.
///
/// ```rust
/// # use tablekit_arrays::{write_elements, Element, Reader};
/// let bytes = write_elements(
///     &[Element::Doubles(vec![0.5]), Element::Ints(vec![1, 2])],
///     Vec::new(),
/// )
/// .unwrap();
///
/// let mut reader = Reader::new(bytes);
/// let energies = reader.next_array().unwrap().unwrap().read_double_sequence().unwrap();
/// let counts = reader.next_array().unwrap().unwrap().read_int_sequence().unwrap();
///
/// assert_eq!(energies, vec![0.5]);
/// assert_eq!(counts, vec![1, 2]);
/// assert!(reader.next_array().unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<B> {
    cursor: ByteCursor<B>,
}

impl Reader<Vec<u8>> {
    /// Load the whole file at `path` into memory
    ///
    /// ```rust, no_run
    /// # use tablekit_arrays::Reader;
    /// let mut reader = Reader::from_file("./tables/moller").unwrap();
    /// let mut table = reader.next_array().unwrap().expect("empty file");
    /// let energies = table.open_child().unwrap().read_double_sequence().unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Reading {}", path.as_ref().display());
        let bytes = std::fs::read(path)?;
        debug!("Loaded {} bytes", bytes.len());
        Ok(Self::new(bytes))
    }
}

impl<B: AsRef<[u8]>> Reader<B> {
    /// Create a reader at the start of `buffer`
    pub fn new(buffer: B) -> Self {
        Self {
            cursor: ByteCursor::new(buffer),
        }
    }

    /// Open the next top-level element, or `None` at the end of the stream
    pub fn next_array(&mut self) -> Result<Option<ArrayHandle<'_, B>>> {
        if self.cursor.at_end() {
            return Ok(None);
        }
        ArrayHandle::open(&mut self.cursor).map(Some)
    }

    /// True once every byte of the stream has been consumed
    pub fn at_end(&self) -> bool {
        self.cursor.at_end()
    }

    /// Current byte offset in the stream
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Drain every remaining top-level element into a tree
    pub fn read_remaining(&mut self) -> Result<Vec<Element>> {
        let mut elements = Vec::new();
        while let Some(mut handle) = self.next_array()? {
            elements.push(Element::decode(&mut handle)?);
        }
        debug!("Decoded {} top-level elements", elements.len());
        Ok(elements)
    }

    /// Give back the root cursor
    pub fn into_cursor(self) -> ByteCursor<B> {
        self.cursor
    }
}

/// Decode every top-level element held in `bytes`
///
/// ```rust
/// # use tablekit_arrays::read_elements;
/// assert!(read_elements(Vec::new()).unwrap().is_empty());
/// ```
pub fn read_elements<B: AsRef<[u8]>>(bytes: B) -> Result<Vec<Element>> {
    Reader::new(bytes).read_remaining()
}

/// Decode every top-level element of the binary file at `path`
///
/// ```rust, no_run
/// # use tablekit_arrays::read_file;
/// let elements = read_file("./tables/bethe_info").unwrap();
/// for element in &elements {
///     println!("{element}");
/// }
/// ```
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<Element>> {
    Reader::from_file(path)?.read_remaining()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_stream() {
        let mut reader = Reader::new(Vec::new());
        assert!(reader.at_end());
        assert!(reader.next_array().unwrap().is_none());
        assert!(reader.read_remaining().unwrap().is_empty());
    }

    #[test]
    fn trailing_garbage_is_an_error() {
        let mut bytes = Element::Ints(vec![1]).to_bytes().unwrap();
        bytes.push(9);

        let mut reader = Reader::new(bytes);
        assert_eq!(
            reader.next_array().unwrap().unwrap().read_int_sequence().unwrap(),
            vec![1]
        );
        assert!(!reader.at_end());
        assert!(matches!(
            reader.next_array(),
            Err(Error::UnexpectedEof { offset: 9, .. })
        ));
    }

    #[test]
    fn borrowed_buffer() {
        let bytes = Element::Floats(vec![2.0]).to_bytes().unwrap();
        let elements = read_elements(bytes.as_slice()).unwrap();
        assert_eq!(elements, vec![Element::Floats(vec![2.0])]);
    }
}

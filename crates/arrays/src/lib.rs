//! Module for reading and writing nested binary array tables
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod cursor;
mod element;
mod error;
mod export;
mod handle;
mod header;
mod pair;
mod reader;
mod writer;

// Inline anything important for a nice public API
#[doc(inline)]
pub use cursor::ByteCursor;

#[doc(inline)]
pub use element::Element;

#[doc(inline)]
pub use handle::ArrayHandle;

#[doc(inline)]
pub use header::{ElementHeader, ElementKind};

#[doc(inline)]
pub use pair::Curve;

#[doc(inline)]
pub use reader::{read_elements, read_file, Reader};

#[doc(inline)]
pub use writer::{write_elements, write_file, Writer};

#[doc(inline)]
pub use export::{write_ascii_pretty, write_json};

#[doc(inline)]
pub use error::{Error, Result};

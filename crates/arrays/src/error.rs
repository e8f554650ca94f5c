//! Result and Error types for the arrays module

use crate::header::ElementKind;

/// Type alias for `Result<T, arrays::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `tablekit-arrays`
///
/// Every decoding variant carries the byte offset at which the problem was
/// found, so a reader whose assumed shape diverged from the written sequence
/// can tell which element was involved.
pub enum Error {
    /// A read requested more bytes than remain in the stream
    #[error("unexpected end of stream at byte {offset} (needed {needed}, available {available})")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A type tag outside of the known element kinds
    #[error("malformed type tag {tag} at byte {offset}")]
    MalformedTag { offset: usize, tag: i8 },

    /// The caller asked for a different element kind than was written
    #[error("type mismatch for element at byte {offset} (expected {expected}, found {found})")]
    TypeMismatch {
        offset: usize,
        expected: ElementKind,
        found: ElementKind,
    },

    /// A second read of a handle that has already been fully consumed
    #[error("{kind} at byte {offset} has already been drained")]
    AlreadyDrained { offset: usize, kind: ElementKind },

    /// A header declared a length below zero
    #[error("negative length {length} declared at byte {offset}")]
    NegativeLength { offset: usize, length: i32 },

    /// More values or children than a signed 32-bit length can declare
    #[error("length {length} does not fit in a 32-bit signed header")]
    LengthOverflow { length: usize },

    /// The writer was finished with a container still expecting children
    #[error("writer finished with {remaining} undeclared children outstanding")]
    UnfinishedArray { remaining: usize },

    /// An element does not follow an expected usage convention
    #[error("unexpected element shape (expected {expected}, found {found})")]
    UnexpectedShape { expected: String, found: String },

    /// NaN or infinite value in an export format that cannot represent it
    #[error("{kind} holds a non-finite value that JSON cannot represent")]
    NonFiniteValue { kind: ElementKind },

    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Failure to (de)serialise a fixed element header
    #[error("failed to (de)serialise element header")]
    Header(#[from] Box<bincode::ErrorKind>),
}

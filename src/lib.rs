//! `tablekit` is a small toolkit for the binary array tables written and read
//! by electron transport simulations
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use tablekit_format as format;

#[cfg(feature = "arrays")]
#[cfg_attr(docsrs, doc(cfg(feature = "arrays")))]
#[doc(inline)]
pub use tablekit_arrays as arrays;

// Copyright 2024 Karpeles Lab Inc.
// Based on the Bentley/McIlroy long common strings technique
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! # bmz
//!
//! Delta compression against a shared dictionary, using the long common
//! strings technique of Bentley and McIlroy ("Data Compression Using Long
//! Common Strings", Proceedings of the IEEE Data Compression Conference,
//! 1999) with Rabin/Karp rolling fingerprints.
//!
//! Runs of input bytes that also appear in the dictionary are replaced by
//! `(offset, length)` references into it; everything else passes through
//! as length-prefixed literals. Compressing many similar documents
//! against one well-chosen dictionary (or a document against an earlier
//! revision of itself) collapses the shared material to a few bytes per
//! run.
//!
//! ## Quick Start
//!
//! ```
//! use bmz::{compress, expand};
//!
//! let dict = b"the quick brown fox jumps over the lazy dog".repeat(3);
//! let input = [b"prefix: ".as_slice(), &dict[..], b" suffix".as_slice()].concat();
//!
//! let packed = compress(&input, &dict).unwrap();
//! assert!(packed.len() < input.len());
//!
//! let restored = expand(&packed, &dict).unwrap();
//! assert_eq!(restored, input);
//! ```
//!
//! For streaming input, repeated compression against one dictionary, or
//! persisting the fingerprint index, use [`Compressor`], [`Expander`] and
//! [`Dictionary`] directly.
//!
//! ## Format
//!
//! The output is a plain sequence of records with no framing around it. A
//! literal record is a nonzero varint length followed by that many raw
//! bytes; a reference record is a zero byte followed by varint offset and
//! length into the dictionary. Varints are unsigned LEB128. The stream
//! carries no checksums and no header: the dictionary travels out of
//! band, and both sides must agree on it byte-for-byte.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compress;
mod constants;
mod dict;
mod error;
mod expand;
mod hash;
mod varint;

pub use compress::Compressor;
pub use dict::{deserialize_index, Dictionary};
pub use error::{Error, Result};
pub use expand::Expander;

use std::io::Write as _;

/// Compress `input` against `dict` in one call.
///
/// Builds a throwaway [`Dictionary`] index per call; when compressing
/// several inputs against the same reference bytes, construct one
/// indexed [`Dictionary`] and reuse it through [`Compressor`].
pub fn compress(input: &[u8], dict: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut packed = Vec::new();
    {
        let mut compressor = Compressor::new(&mut packed);
        compressor.set_dictionary(Dictionary::new(dict.to_vec()));
        compressor.write_all(input)?;
        compressor.finish()?;
    }
    Ok(packed)
}

/// Expand a record stream against `dict` in one call.
pub fn expand(packed: &[u8], dict: &[u8]) -> Result<Vec<u8>> {
    Expander::new(packed, dict).expand(Vec::new())
}

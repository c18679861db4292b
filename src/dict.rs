// Copyright 2024 Karpeles Lab Inc.
// Based on the Bentley/McIlroy long common strings technique
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Reference dictionary and its block fingerprint index.

use std::collections::HashMap;

use crate::constants::BLOCK;
use crate::error::{Error, Result};
use crate::hash::RollingHash;

/// Reference bytes to compress against, with or without the fingerprint
/// index that makes them searchable.
///
/// The index maps the fingerprint of each non-overlapping block-sized
/// window (50 bytes) to the offset of that window's first byte; only the
/// first window observed for a given fingerprint is recorded. Offsets are
/// stored as `u32`, so bytes beyond the first 4 GiB of a dictionary are
/// never indexed.
///
/// A compressor indexes a `Raw` dictionary when it is attached. Once
/// `Indexed`, a dictionary is frozen and may be cloned freely to share it
/// between compressors.
///
/// # Example
///
/// ```
/// use bmz::Dictionary;
///
/// let reference = b"the quick brown fox jumps over the lazy dog".repeat(3);
/// let dict = Dictionary::new(reference).into_indexed();
/// assert!(dict.index().is_some());
/// ```
#[derive(Debug, Clone)]
pub enum Dictionary {
    /// Reference bytes with no index yet.
    Raw(Vec<u8>),
    /// Reference bytes plus their fingerprint index.
    Indexed {
        /// The reference bytes.
        bytes: Vec<u8>,
        /// Offset of the first window seen with each fingerprint.
        index: HashMap<u32, u32>,
    },
}

impl Dictionary {
    /// Dictionary from reference bytes, deferring the index build until
    /// the dictionary is attached to a compressor.
    pub fn new(bytes: Vec<u8>) -> Self {
        Dictionary::Raw(bytes)
    }

    /// Dictionary from reference bytes and a previously built index, for
    /// example one restored with [`deserialize_index`](crate::deserialize_index).
    pub fn with_index(bytes: Vec<u8>, index: HashMap<u32, u32>) -> Self {
        Dictionary::Indexed { bytes, index }
    }

    /// The reference bytes.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Dictionary::Raw(bytes) => bytes,
            Dictionary::Indexed { bytes, .. } => bytes,
        }
    }

    /// The fingerprint index, if built.
    pub fn index(&self) -> Option<&HashMap<u32, u32>> {
        match self {
            Dictionary::Raw(_) => None,
            Dictionary::Indexed { index, .. } => Some(index),
        }
    }

    /// Build the fingerprint index unless one is already present.
    pub fn into_indexed(self) -> Dictionary {
        match self {
            Dictionary::Raw(bytes) => {
                let index = build_index(&bytes);
                Dictionary::Indexed { bytes, index }
            }
            indexed @ Dictionary::Indexed { .. } => indexed,
        }
    }

    /// Offset of the indexed window with this fingerprint, if any.
    pub(crate) fn lookup(&self, fingerprint: u32) -> Option<u32> {
        self.index()?.get(&fingerprint).copied()
    }

    /// Serialize the index as little-endian `(fingerprint, offset)` pairs,
    /// eight bytes per entry.
    ///
    /// Entry order is unspecified. An unindexed dictionary serializes to
    /// an empty buffer.
    pub fn serialize_index(&self) -> Vec<u8> {
        let index = match self.index() {
            Some(index) => index,
            None => return Vec::new(),
        };

        let mut out = Vec::with_capacity(index.len() * 8);
        for (&fingerprint, &offset) in index {
            out.extend_from_slice(&fingerprint.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
        }
        out
    }
}

/// Read `(fingerprint, offset)` pairs produced by
/// [`Dictionary::serialize_index`] into `index` until `data` is exhausted.
///
/// Fails with [`Error::Truncated`] if `data` ends partway through a pair.
pub fn deserialize_index(data: &[u8], index: &mut HashMap<u32, u32>) -> Result<()> {
    if data.len() % 8 != 0 {
        return Err(Error::Truncated);
    }

    for pair in data.chunks_exact(8) {
        let fingerprint = u32::from_le_bytes(pair[..4].try_into().unwrap());
        let offset = u32::from_le_bytes(pair[4..].try_into().unwrap());
        index.insert(fingerprint, offset);
    }
    Ok(())
}

/// Fingerprint every window starting at a multiple of [`BLOCK`], keeping
/// the first offset seen for each fingerprint.
fn build_index(bytes: &[u8]) -> HashMap<u32, u32> {
    let mut index = HashMap::new();
    let mut hash = RollingHash::new();

    for (i, &byte) in bytes.iter().enumerate() {
        if i < BLOCK {
            hash.seed(byte);
            continue;
        }

        if i % BLOCK == 0 {
            if let Ok(offset) = u32::try_from(i - BLOCK) {
                index.entry(hash.value()).or_insert(offset);
            }
        }
        hash.roll(bytes[i - BLOCK], byte);
    }
    index
}

// Copyright 2024 Karpeles Lab Inc.
// Based on the Bentley/McIlroy long common strings technique
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Compression: buffer the input, find long common strings against the
//! dictionary, emit literal and reference records.

use std::io::{self, Write};

use crate::constants::BLOCK;
use crate::dict::Dictionary;
use crate::hash::RollingHash;
use crate::varint::write_varint;

/// Compresses a byte stream against a reference dictionary.
///
/// `Compressor` implements [`Write`]; written bytes are buffered until
/// [`finish`](Compressor::finish) runs the matching pass and emits the
/// record stream to the sink. Runs of input that also occur in the
/// dictionary become `(offset, length)` references; everything else is
/// copied through as length-prefixed literals.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use bmz::{Compressor, Dictionary, Expander};
///
/// let dict = b"the quick brown fox jumps over the lazy dog".repeat(3);
///
/// let mut packed = Vec::new();
/// {
///     let mut compressor = Compressor::new(&mut packed);
///     compressor.set_dictionary(Dictionary::new(dict.clone()));
///     compressor.write_all(&dict).unwrap();
///     compressor.finish().unwrap();
/// }
/// assert_eq!(packed.len(), 4);
///
/// let restored = Expander::new(&packed[..], &dict).expand(Vec::new()).unwrap();
/// assert_eq!(restored, dict);
/// ```
pub struct Compressor<W: Write> {
    sink: W,
    buf: Vec<u8>,
    hash: RollingHash,
    dict: Option<Dictionary>,
    in_size: usize,
    out_size: usize,
}

/// A confirmed dictionary match, grown in both directions.
struct Match {
    /// Dictionary offset of the block-aligned hit.
    offset: usize,
    /// Bytes gained extending toward the window start, at most `BLOCK - 1`.
    backward: usize,
    /// Bytes gained extending past the window end.
    forward: usize,
}

impl<W: Write> Compressor<W> {
    /// Create a compressor emitting records to `sink`.
    pub fn new(sink: W) -> Self {
        Compressor {
            sink,
            buf: Vec::new(),
            hash: RollingHash::new(),
            dict: None,
            in_size: 0,
            out_size: 0,
        }
    }

    /// Attach the dictionary that references will point into.
    ///
    /// A [`Dictionary::Raw`] is indexed here; a [`Dictionary::Indexed`] is
    /// used as supplied. Without a dictionary the whole input is emitted
    /// as one literal.
    pub fn set_dictionary(&mut self, dictionary: Dictionary) {
        self.dict = Some(dictionary.into_indexed());
    }

    /// The attached dictionary, if any.
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.dict.as_ref()
    }

    /// Serialize the attached dictionary's index for external storage,
    /// or an empty buffer if no indexed dictionary is attached.
    pub fn serialize_dictionary(&self) -> Vec<u8> {
        match &self.dict {
            Some(dict) => dict.serialize_index(),
            None => Vec::new(),
        }
    }

    /// Run the matching pass over everything written so far and emit the
    /// record stream. The input buffer is drained; the sink is neither
    /// flushed nor closed.
    pub fn finish(&mut self) -> io::Result<()> {
        // `last` is the end of the input already covered by emitted
        // records. Match attempts are suppressed below `skip` so the next
        // window starts one settling byte past the previous reference; the
        // fingerprint itself keeps rolling through the gap.
        let mut last: usize = 0;
        let mut skip: usize = 0;

        for i in 0..self.buf.len() {
            if i < BLOCK {
                self.hash.seed(self.buf[i]);
                continue;
            }

            if i >= skip {
                let hit = match &self.dict {
                    Some(dict) => find_match(dict, &self.buf, self.hash.value(), i, last),
                    None => None,
                };

                if let Some(m) = hit {
                    self.emit_literal(last, i - BLOCK - m.backward)?;
                    self.emit_reference(m.offset - m.backward, BLOCK + m.backward + m.forward)?;
                    last = i + m.forward;
                    skip = i + m.forward + BLOCK + 1;
                }
            }

            self.hash.roll(self.buf[i - BLOCK], self.buf[i]);
        }

        self.emit_literal(last, self.buf.len())?;

        self.buf.clear();
        self.hash.reset();
        Ok(())
    }

    /// Compressed size as a permyriad of the input size
    /// (`10000 * output / input`), or `-1` if nothing was written.
    /// Meaningful after [`finish`](Compressor::finish).
    pub fn ratio(&self) -> i64 {
        if self.in_size > 0 {
            (10_000 * self.out_size as i64) / self.in_size as i64
        } else {
            -1
        }
    }

    /// Total bytes accepted through [`Write::write`].
    pub fn input_size(&self) -> usize {
        self.in_size
    }

    /// Total bytes emitted to the sink.
    pub fn output_size(&self) -> usize {
        self.out_size
    }

    /// Get a reference to the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Get a mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Emit `buf[from..to]` as a literal record. Empty runs are skipped.
    fn emit_literal(&mut self, from: usize, to: usize) -> io::Result<()> {
        if from >= to {
            return Ok(());
        }

        let run = &self.buf[from..to];
        let length = u32::try_from(run.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "literal run exceeds 4 GiB")
        })?;

        self.out_size += write_varint(&mut self.sink, length)?;
        self.sink.write_all(run)?;
        self.out_size += run.len();
        Ok(())
    }

    /// Emit an `(offset, length)` reference record behind its zero marker.
    fn emit_reference(&mut self, offset: usize, length: usize) -> io::Result<()> {
        let offset = offset as u32; // index offsets are u32 by construction
        let length = u32::try_from(length).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "reference length exceeds 4 GiB")
        })?;

        self.sink.write_all(&[0])?;
        self.out_size += 1;
        self.out_size += write_varint(&mut self.sink, offset)?;
        self.out_size += write_varint(&mut self.sink, length)?;
        Ok(())
    }
}

impl<W: Write> Write for Compressor<W> {
    /// Buffer `data` until [`finish`](Compressor::finish). Never fails.
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        self.in_size += data.len();
        Ok(data.len())
    }

    /// Flush the underlying sink. Records are produced only by
    /// [`finish`](Compressor::finish).
    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// Check a fingerprint hit for the window ending at `i` and grow it in
/// both directions. Returns `None` when the index has no entry, the entry
/// does not fit the dictionary, or the candidate fails byte confirmation.
///
/// Fingerprints collide, so a hash hit alone is never acted on.
fn find_match(
    dict: &Dictionary,
    buf: &[u8],
    fingerprint: u32,
    i: usize,
    last: usize,
) -> Option<Match> {
    let offset = dict.lookup(fingerprint)? as usize;
    let bytes = dict.bytes();

    let end = offset.checked_add(BLOCK)?;
    if end > bytes.len() || bytes[offset..end] != buf[i - BLOCK..i] {
        return None;
    }

    // Grow toward the start, at most BLOCK - 1 bytes, stopping at the
    // dictionary start, the input start, and already-emitted input.
    let mut backward = 0;
    while backward + 1 < BLOCK {
        let t = backward + 1;
        if i < last + BLOCK + t || offset < t || i < BLOCK + t {
            break;
        }
        if bytes[offset - t] != buf[i - BLOCK - t] {
            break;
        }
        backward = t;
    }

    // Grow past the window to the end of either buffer.
    let mut forward = 0;
    while i + forward < buf.len()
        && end + forward < bytes.len()
        && bytes[end + forward] == buf[i + forward]
    {
        forward += 1;
    }

    Some(Match {
        offset,
        backward,
        forward,
    })
}

// Copyright 2024 Karpeles Lab Inc.
// Based on the Bentley/McIlroy long common strings technique
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Expansion: read records, copy literals through and materialize
//! references from the dictionary.

use std::io::Read;

use crate::error::{Error, Result};
use crate::varint::{read_varint, read_varint_required};

/// Expands a record stream produced by [`Compressor`](crate::Compressor).
///
/// Construct with the compressed source and the same dictionary bytes the
/// stream was compressed against. References resolve exclusively against
/// the dictionary, never against previously expanded output, so a
/// dictionary can back any number of expanders at once.
///
/// # Example
///
/// ```
/// use bmz::{compress, Expander};
///
/// let dict = b"the quick brown fox jumps over the lazy dog".repeat(3);
/// let packed = compress(&dict, &dict).unwrap();
///
/// let mut expander = Expander::new(&packed[..], &dict);
/// assert_eq!(expander.expand(Vec::new()).unwrap(), dict);
/// ```
pub struct Expander<'d, R: Read> {
    source: R,
    dict: &'d [u8],
}

impl<'d, R: Read> Expander<'d, R> {
    /// Create an expander reading records from `source` and resolving
    /// references against `dict`.
    pub fn new(source: R, dict: &'d [u8]) -> Self {
        Expander { source, dict }
    }

    /// Read records until EOF, appending the reconstructed bytes to `out`
    /// and returning it.
    ///
    /// EOF at a record boundary ends expansion normally. EOF inside a
    /// record, a malformed varint, or a reference outside the dictionary
    /// consumes the buffer and returns an error, so partially expanded
    /// bytes are never handed back.
    pub fn expand(&mut self, mut out: Vec<u8>) -> Result<Vec<u8>> {
        loop {
            let marker = match read_varint(&mut self.source)? {
                Some(u) => u,
                None => return Ok(out),
            };

            if marker == 0 {
                self.copy_reference(&mut out)?;
            } else {
                self.copy_literal(marker as usize, &mut out)?;
            }
        }
    }

    /// A zero marker introduces an `(offset, length)` pair to copy out of
    /// the dictionary.
    fn copy_reference(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let offset = read_varint_required(&mut self.source)? as usize;
        let length = read_varint_required(&mut self.source)? as usize;

        let run = offset
            .checked_add(length)
            .and_then(|end| self.dict.get(offset..end))
            .ok_or(Error::OutOfRange {
                offset,
                length,
                dict_len: self.dict.len(),
            })?;

        out.extend_from_slice(run);
        Ok(())
    }

    /// A nonzero marker is the length of the raw literal run that follows.
    ///
    /// Reads through `take` rather than pre-sizing the buffer, so a
    /// corrupt length claim cannot allocate more than the source holds.
    fn copy_literal(&mut self, length: usize, out: &mut Vec<u8>) -> Result<()> {
        let n = (&mut self.source)
            .take(length as u64)
            .read_to_end(out)
            .map_err(Error::Io)?;

        if n < length {
            return Err(Error::Truncated);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &[u8] = b"a reference corpus the expander can copy slices from";

    #[test]
    fn test_empty_stream_returns_buffer_unchanged() {
        let out = Expander::new(&[][..], DICT).expand(b"seed".to_vec()).unwrap();
        assert_eq!(out, b"seed");
    }

    #[test]
    fn test_literal_only_stream() {
        let stream = [&[5u8][..], b"hello".as_slice()].concat();
        let out = Expander::new(&stream[..], DICT).expand(Vec::new()).unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn test_reference_appends_dictionary_slice() {
        // Reference (offset 2, length 9) then a literal.
        let stream = [&[0u8, 2, 9, 1][..], b"!".as_slice()].concat();
        let out = Expander::new(&stream[..], DICT).expand(Vec::new()).unwrap();
        assert_eq!(out, b"reference!");
    }

    #[test]
    fn test_expand_appends_to_existing_contents() {
        let stream = [&[4u8][..], b"tail".as_slice()].concat();
        let out = Expander::new(&stream[..], DICT)
            .expand(b"head ".to_vec())
            .unwrap();
        assert_eq!(out, b"head tail");
    }

    #[test]
    fn test_truncated_literal_is_an_error() {
        let stream = [&[10u8][..], b"only4".as_slice()].concat();
        let err = Expander::new(&stream[..], DICT)
            .expand(Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::Truncated));
    }

    #[test]
    fn test_truncated_reference_is_an_error() {
        // Marker present, offset present, length missing.
        let stream = [0u8, 2];
        let err = Expander::new(&stream[..], DICT)
            .expand(Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::Truncated));
    }

    #[test]
    fn test_out_of_range_reference_is_an_error() {
        let stream = [0u8, 40, 50];
        let err = Expander::new(&stream[..], DICT)
            .expand(Vec::new())
            .unwrap_err();
        match err {
            Error::OutOfRange {
                offset,
                length,
                dict_len,
            } => {
                assert_eq!((offset, length, dict_len), (40, 50, DICT.len()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_reference_is_an_error() {
        let mut stream = vec![0u8, 0];
        // length = u32::MAX
        stream.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0x0f]);
        let err = Expander::new(&stream[..], DICT)
            .expand(Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
    }
}

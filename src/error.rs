// Copyright 2024 Karpeles Lab Inc.
// Based on the Bentley/McIlroy long common strings technique
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;
use std::io;

/// Result type for expansion and index deserialization
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while expanding a record stream or reading a
/// serialized fingerprint index
#[derive(Debug)]
pub enum Error {
    /// Reading from the underlying source failed
    Io(io::Error),

    /// A varint was malformed (overlong, or wider than 32 bits)
    Corrupt,

    /// The stream ended in the middle of a record
    Truncated,

    /// A reference pointed outside the dictionary
    OutOfRange {
        /// Offset of the first referenced byte
        offset: usize,
        /// Number of bytes referenced
        length: usize,
        /// Length of the dictionary being expanded against
        dict_len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "bmz: read error: {}", err),
            Error::Corrupt => write!(f, "bmz: corrupt varint"),
            Error::Truncated => write!(f, "bmz: stream truncated mid-record"),
            Error::OutOfRange {
                offset,
                length,
                dict_len,
            } => write!(
                f,
                "bmz: reference {}..{} outside dictionary of {} bytes",
                offset,
                offset.saturating_add(*length),
                dict_len
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

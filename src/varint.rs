// Copyright 2024 Karpeles Lab Inc.
// Based on the Bentley/McIlroy long common strings technique
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Base-128 varints in the style of Protocol Buffers.
//!
//! Each byte carries seven bits, least significant group first, with the
//! high bit set on every byte except the last. Zero encodes as a single
//! `0x00` byte, which the record format reserves as the reference marker.

use std::io::{self, Read, Write};

use crate::error::{Error, Result};

/// Longest encoding of a 32-bit value.
pub(crate) const MAX_VARINT_LEN: usize = 5;

/// Encode `value` to `w`. Returns the number of bytes written.
pub(crate) fn write_varint<W: Write>(w: &mut W, mut value: u32) -> io::Result<usize> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut n = 0;

    while value >= 0x80 {
        buf[n] = (value as u8) | 0x80;
        value >>= 7;
        n += 1;
    }
    buf[n] = value as u8;
    n += 1;

    w.write_all(&buf[..n])?;
    Ok(n)
}

/// Decode a varint from `r`, or `None` if `r` is already at EOF.
///
/// EOF after at least one byte has been consumed is [`Error::Truncated`];
/// an encoding that does not fit 32 bits is [`Error::Corrupt`]. Never
/// reads past the final byte of the encoding.
pub(crate) fn read_varint<R: Read>(r: &mut R) -> Result<Option<u32>> {
    let mut value: u32 = 0;
    let mut shift = 0;

    for i in 0..MAX_VARINT_LEN {
        let byte = match read_byte(r)? {
            Some(b) => b,
            None if i == 0 => return Ok(None),
            None => return Err(Error::Truncated),
        };

        if byte < 0x80 {
            if i == MAX_VARINT_LEN - 1 && byte > 0x0f {
                return Err(Error::Corrupt);
            }
            return Ok(Some(value | ((byte as u32) << shift)));
        }

        value |= ((byte & 0x7f) as u32) << shift;
        shift += 7;
    }

    Err(Error::Corrupt)
}

/// Decode a varint that must be present (mid-record position).
pub(crate) fn read_varint_required<R: Read>(r: &mut R) -> Result<u32> {
    read_varint(r)?.ok_or(Error::Truncated)
}

fn read_byte<R: Read>(r: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match r.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
}

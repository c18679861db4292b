// Copyright 2024 Karpeles Lab Inc.
// Based on the Bentley/McIlroy long common strings technique
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Fingerprint window length in bytes.
///
/// The dictionary is indexed at non-overlapping boundaries of this size,
/// and every match starts out as a window of exactly this many bytes.
pub const BLOCK: usize = 50;

/// Polynomial base for the Rabin/Karp fingerprint.
///
/// One greater than the byte alphabet, so a zero byte still contributes
/// to the hash.
pub const RADIX: u32 = (1 << 8) + 1;

/// Size of the fingerprint ring, 2^23.
///
/// A power of two rather than a prime, so reduction is a bitwise AND with
/// [`MASK`]. Sized so that `RADIX * MODULUS` fits in 32 bits.
pub const MODULUS: u32 = 1 << (32 - 8 - 1);

/// Bit-twiddling equivalent of reduction modulo [`MODULUS`].
pub const MASK: u32 = MODULUS - 1;

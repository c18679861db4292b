#![no_main]

use libfuzzer_sys::fuzz_target;
use bmz::{compress, expand};

fuzz_target!(|data: &[u8]| {
    // Skip very large inputs to avoid OOM
    if data.len() > 1_000_000 {
        return;
    }

    // First byte steers the dictionary/input split so the corpus explores
    // self-compression, partial overlap, and disjoint pairs.
    let (steer, rest) = match data.split_first() {
        Some(split) => split,
        None => return,
    };
    let at = (*steer as usize * rest.len()) / 256;
    let (dict, input) = rest.split_at(at);

    let packed = compress(input, dict).expect("compress failed");
    let restored = expand(&packed, dict).expect("expand failed");
    assert_eq!(input, &restored[..], "roundtrip mismatch");

    // Self-compression must hold as well.
    let packed = compress(rest, rest).expect("compress failed");
    let restored = expand(&packed, rest).expect("expand failed");
    assert_eq!(rest, &restored[..], "self roundtrip mismatch");
});

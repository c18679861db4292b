#![no_main]

use libfuzzer_sys::fuzz_target;
use bmz::expand;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000_000 {
        return;
    }

    // Arbitrary bytes as a record stream: success or a typed error, never
    // a panic, against dictionaries of several sizes.
    let dicts: [&[u8]; 3] = [b"", b"0123456789", data];
    for dict in dicts {
        let _ = expand(data, dict);
    }
});

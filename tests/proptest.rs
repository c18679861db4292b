// Copyright 2024 Karpeles Lab Inc.
// Property-based tests using proptest

use std::collections::HashMap;
use std::io::Write as _;

use bmz::{compress, deserialize_index, expand, Compressor, Dictionary};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_roundtrip_arbitrary(input: Vec<u8>, dict: Vec<u8>) {
        prop_assume!(input.len() <= 20_000 && dict.len() <= 20_000);

        let packed = compress(&input, &dict).expect("compress failed");
        let restored = expand(&packed, &dict).expect("expand failed");
        prop_assert_eq!(input, restored);
    }

    #[test]
    fn prop_roundtrip_self_dictionary(data: Vec<u8>) {
        prop_assume!(data.len() <= 20_000);

        let packed = compress(&data, &data).expect("compress failed");
        let restored = expand(&packed, &data).expect("expand failed");
        prop_assert_eq!(data, restored);
    }

    #[test]
    fn prop_roundtrip_edited_dictionary(
        dict in prop::collection::vec(any::<u8>(), 200..4000),
        edits in prop::collection::vec((any::<prop::sample::Index>(), any::<u8>()), 0..20),
    ) {
        // Inputs derived from the dictionary by point edits keep long
        // common strings, the case the match-and-extend scan is for.
        let mut input = dict.clone();
        for (index, byte) in edits {
            let at = index.index(input.len());
            input[at] = byte;
        }

        let packed = compress(&input, &dict).expect("compress failed");
        let restored = expand(&packed, &dict).expect("expand failed");
        prop_assert_eq!(input, restored);
    }

    #[test]
    fn prop_roundtrip_spliced(
        dict in prop::collection::vec(any::<u8>(), 500..4000),
        insert in prop::collection::vec(any::<u8>(), 0..200),
        at in any::<prop::sample::Index>(),
    ) {
        let at = at.index(dict.len());
        let input = [&dict[..at], &insert[..], &dict[at..]].concat();

        let packed = compress(&input, &dict).expect("compress failed");
        let restored = expand(&packed, &dict).expect("expand failed");
        prop_assert_eq!(input, restored);
    }

    #[test]
    fn prop_ratio_matches_formula(input: Vec<u8>, dict: Vec<u8>) {
        prop_assume!(input.len() <= 10_000 && dict.len() <= 10_000);

        let mut packed = Vec::new();
        let mut compressor = Compressor::new(&mut packed);
        compressor.set_dictionary(Dictionary::new(dict));
        compressor.write_all(&input).unwrap();
        compressor.finish().unwrap();

        let ratio = compressor.ratio();
        let out_size = compressor.output_size();
        let in_size = compressor.input_size();
        drop(compressor);

        prop_assert_eq!(out_size, packed.len());
        prop_assert_eq!(in_size, input.len());
        if input.is_empty() {
            prop_assert_eq!(ratio, -1);
        } else {
            prop_assert_eq!(ratio, (10_000 * packed.len() as i64) / input.len() as i64);
        }
    }

    #[test]
    fn prop_chunked_writes_are_equivalent(
        input in prop::collection::vec(any::<u8>(), 0..5000),
        chunk_size in 1usize..500,
    ) {
        let dict = input.clone();
        let whole = compress(&input, &dict).unwrap();

        let mut chunked = Vec::new();
        {
            let mut compressor = Compressor::new(&mut chunked);
            compressor.set_dictionary(Dictionary::new(dict));
            for chunk in input.chunks(chunk_size) {
                compressor.write_all(chunk).unwrap();
            }
            compressor.finish().unwrap();
        }

        prop_assert_eq!(chunked, whole);
    }

    #[test]
    fn prop_index_serialization_roundtrip(entries: HashMap<u32, u32>) {
        let dict = Dictionary::with_index(Vec::new(), entries.clone());
        let serialized = dict.serialize_index();
        prop_assert_eq!(serialized.len(), entries.len() * 8);

        let mut restored = HashMap::new();
        deserialize_index(&serialized, &mut restored).unwrap();
        prop_assert_eq!(restored, entries);
    }

    #[test]
    fn prop_expand_never_panics(stream: Vec<u8>, dict: Vec<u8>) {
        prop_assume!(stream.len() <= 10_000 && dict.len() <= 10_000);

        // Arbitrary bytes must come back as data or a typed error, never
        // a panic.
        let _ = expand(&stream, &dict);
    }
}

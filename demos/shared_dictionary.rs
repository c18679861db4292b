// Copyright 2024 Karpeles Lab Inc.
// Example of one indexed dictionary shared across many documents,
// with its fingerprint index persisted and restored

use std::collections::HashMap;
use std::io::Write;

use bmz::{deserialize_index, Compressor, Dictionary, Expander};

fn main() {
    // A dictionary of boilerplate that every document shares.
    let boilerplate: Vec<u8> = b"Content-Type: application/json\r\n\
        Cache-Control: no-cache\r\n\
        Connection: keep-alive\r\n\
        {\"status\": \"ok\", \"data\": {\"items\": [], \"total\": 0}}\r\n"
        .repeat(4);

    // Index once, serialize the index as you would to hand it to another
    // process or park it in a cache.
    let dict = Dictionary::new(boilerplate.clone()).into_indexed();
    let serialized = dict.serialize_index();
    println!(
        "dictionary: {} bytes, index: {} entries ({} bytes serialized)",
        boilerplate.len(),
        dict.index().map(HashMap::len).unwrap_or(0),
        serialized.len()
    );

    // A consumer restores the index instead of rebuilding it.
    let mut restored_index = HashMap::new();
    deserialize_index(&serialized, &mut restored_index).expect("index deserialization failed");
    let restored_dict = Dictionary::with_index(boilerplate.clone(), restored_index);

    let documents: [&[u8]; 3] = [
        b"GET /a\r\nContent-Type: application/json\r\nCache-Control: no-cache\r\nConnection: keep-alive\r\n{\"status\": \"ok\", \"data\": {\"items\": [], \"total\": 0}}\r\n",
        b"Content-Type: application/json\r\nCache-Control: no-cache\r\nConnection: keep-alive\r\n{\"status\": \"ok\", \"data\": {\"items\": [1, 2, 3], \"total\": 3}}\r\n",
        b"entirely unrelated payload that shares nothing with the dictionary",
    ];

    for (n, document) in documents.iter().enumerate() {
        let mut packed = Vec::new();
        {
            let mut compressor = Compressor::new(&mut packed);
            compressor.set_dictionary(restored_dict.clone());
            compressor.write_all(document).expect("write failed");
            compressor.finish().expect("finish failed");

            println!(
                "document {}: {} -> {} bytes (ratio {})",
                n,
                compressor.input_size(),
                compressor.output_size(),
                compressor.ratio()
            );
        }

        let restored = Expander::new(&packed[..], &boilerplate)
            .expand(Vec::new())
            .expect("expand failed");
        assert_eq!(&restored, document);
    }

    println!("all documents round-tripped against the shared dictionary");
}

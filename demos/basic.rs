// Copyright 2024 Karpeles Lab Inc.
// Example of basic dictionary delta compression

use bmz::{compress, expand};

fn main() {
    // Revision one of a document acts as the dictionary; revision two is
    // mostly the same material and compresses against it.
    let revision_one: Vec<u8> = b"[server]\n\
        host = example.com\n\
        port = 8080\n\
        workers = 4\n\
        [logging]\n\
        level = info\n\
        path = /var/log/app.log\n"
        .repeat(8);

    let mut revision_two = revision_one.clone();
    // Swap the first "port = 8080" line for a new port.
    let patch = b"port = 9090\n";
    revision_two.splice(28..40, patch.iter().copied());
    revision_two.extend_from_slice(b"[cache]\nttl = 300\n");

    println!("dictionary (revision one): {} bytes", revision_one.len());
    println!("input      (revision two): {} bytes", revision_two.len());

    let packed = compress(&revision_two, &revision_one).expect("compress failed");
    println!(
        "compressed: {} bytes ({:.2}% of the input)\n",
        packed.len(),
        (packed.len() as f64 / revision_two.len() as f64) * 100.0
    );

    match expand(&packed, &revision_one) {
        Ok(restored) => {
            println!("expansion successful: {} bytes", restored.len());
            if restored == revision_two {
                println!("restored bytes match revision two");
            } else {
                println!("ERROR: restored bytes differ!");
            }
        }
        Err(e) => println!("expansion failed: {}", e),
    }
}

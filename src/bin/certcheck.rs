//! Verifies the signature of certificate files.
//!
//! Each argument is the path of a certificate file. The certificate is
//! decoded and its signature checked. If that succeeds, the information
//! taken from it is printed.
//!
//! Prefix the paths with `--der` to decode in DER mode.

use std::{env, fs, process};
use bercert::{Mode, Oid, VerifiedInfo, Verifier};

fn print_info(path: &str, info: &VerifiedInfo) {
    println!("{}: signature valid", path);
    match info.serial_number {
        Some(serial) => println!("  serial number: {}", serial),
        None => println!("  serial number: (too large)"),
    }
    println!("  modulus: {} octets", info.public_key.0.len());
    println!("  exponent: {}", hex::encode(&info.public_key.1));
    for (id, value) in &info.extensions {
        println!("  extension {}: {}", Oid(id.clone()), hex::encode(value));
    }
}

fn main() {
    let mut verifier = Verifier::new();
    let mut failed = false;
    for arg in env::args().skip(1) {
        if arg == "--der" {
            verifier = verifier.with_mode(Mode::Der);
            continue
        }
        let data = match fs::read(&arg) {
            Ok(data) => data,
            Err(err) => {
                eprintln!("{}: {}", arg, err);
                failed = true;
                continue
            }
        };
        match verifier.verify(&data) {
            Ok(info) => print_info(&arg, &info),
            Err(err) => {
                eprintln!("{}: {}", arg, err);
                failed = true;
            }
        }
    }
    if failed {
        process::exit(1)
    }
}

//! Generates the octets of an object identifier.
//!
//! Object identifier constants are defined via their encoded octets. Provide
//! a sequence of object identifiers in ‘dot integer’ notation and you will
//! receive the octet array for each of them.

use std::env;
use std::str::FromStr;
use bercert::Oid;

fn process_one(arg: &str) -> Result<(), &'static str> {
    let oid = Oid::from_str(arg)?;
    let octets: Vec<_> = oid.as_slice().iter().map(u8::to_string).collect();
    match oid.name() {
        Some(name) => println!("[{}] // {}", octets.join(", "), name),
        None => println!("[{}]", octets.join(", ")),
    }
    Ok(())
}

fn main() {
    for arg in env::args().skip(1) {
        if let Err(err) = process_one(&arg) {
            println!("{}: {}.", arg, err)
        }
    }
}

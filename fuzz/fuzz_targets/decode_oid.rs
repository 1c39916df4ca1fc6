#![no_main]

use std::str::FromStr;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use bercert::Oid;

fuzz_target!(|data: &[u8]| {
    let oid = match Oid::from_content(Bytes::copy_from_slice(data)) {
        Ok(oid) => oid,
        Err(_) => return,
    };
    let dotted = oid.to_string();
    if !dotted.contains("overflow") {
        if let Ok(parsed) = Oid::from_str(&dotted) {
            assert_eq!(parsed, oid);
        }
    }
});

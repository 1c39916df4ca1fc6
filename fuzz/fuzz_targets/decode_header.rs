#![no_main]

use libfuzzer_sys::fuzz_target;
use bercert::{Header, Mode};

fuzz_target!(|data: &[u8]| {
    for mode in [Mode::Ber, Mode::Der] {
        if let Ok((header, len)) = Header::read(data, 0, data.len(), mode) {
            assert!(len <= data.len());
            if mode == Mode::Der {
                // DER headers are minimal, so we must get them back.
                let mut target: Vec<u8> = Vec::new();
                header.write_encoded(&mut target);
                assert_eq!(target.as_slice(), &data[..len]);
                assert_eq!(header.encoded_len(), len);
            }
        }
    }
});

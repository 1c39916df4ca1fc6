#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use bercert::Mode;
use bercert::cert::Certificate;

fuzz_target!(|data: &[u8]| {
    let _ = bercert::verify(data);

    // Whatever decodes as DER must encode to the very same octets.
    if let Ok(cert) = Certificate::decode(Bytes::copy_from_slice(data), Mode::Der) {
        assert_eq!(cert.encode().unwrap().as_ref(), data);
    }
});

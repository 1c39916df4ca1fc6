#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use bercert::{Integer, Mode, Tag, Value};
use bercert::template::{self, TypeDesc};

static INTEGER: TypeDesc = TypeDesc::Primitive(Tag::INTEGER);

fuzz_target!(|data: &[u8]| {
    let data = Bytes::copy_from_slice(data);
    let value = match template::decode(data.clone(), &INTEGER, Mode::Ber) {
        Ok(value) => value,
        Err(_) => return,
    };
    let int = match value.as_integer() {
        Some(int) => int.clone(),
        None => panic!("INTEGER decoded as {}", value.kind()),
    };
    if let Some(native) = int.to_i64() {
        assert_eq!(Integer::from_i64(native), int);
    }
    let _ = int.to_u64();

    // Re-encoding always produces DER which must decode to the same value.
    let encoded = template::encode(&Value::Integer(int), &INTEGER).unwrap();
    assert_eq!(
        template::decode(encoded, &INTEGER, Mode::Der).unwrap(),
        value
    );
});

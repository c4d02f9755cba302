//! Tests for the type-spray decoder

use hexspray_core::decode::{FieldValue, TypeSpray, TypeTag};
use hexspray_core::error::BackendError;

const VECTOR: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

fn value(spray: &TypeSpray, tag: TypeTag) -> String
{
    match spray.field(tag) {
        FieldValue::Value(text) => text.clone(),
        other => panic!("expected a value for {tag:?}, got {other:?}"),
    }
}

#[test]
fn test_known_vector_unsigned()
{
    let spray = TypeSpray::decode(&VECTOR, &Ok(0));
    assert_eq!(value(&spray, TypeTag::U8), "1");
    assert_eq!(value(&spray, TypeTag::U16), "513");
    assert_eq!(value(&spray, TypeTag::U32), "67305985");
    assert_eq!(value(&spray, TypeTag::U64), "578437695752307201");
}

#[test]
fn test_known_vector_floats()
{
    let spray = TypeSpray::decode(&VECTOR, &Ok(0));
    assert_eq!(value(&spray, TypeTag::F32), f32::from_le_bytes([0x01, 0x02, 0x03, 0x04]).to_string());
    assert_eq!(value(&spray, TypeTag::F64), f64::from_le_bytes(VECTOR).to_string());
}

#[test]
fn test_signed_decode_of_all_ones()
{
    let spray = TypeSpray::decode(&[0xff; 8], &Ok(0));
    assert_eq!(value(&spray, TypeTag::U8), "255");
    assert_eq!(value(&spray, TypeTag::I8), "-1");
    assert_eq!(value(&spray, TypeTag::I16), "-1");
    assert_eq!(value(&spray, TypeTag::I32), "-1");
    assert_eq!(value(&spray, TypeTag::I64), "-1");
}

#[test]
fn test_str_drops_invalid_bytes()
{
    let spray = TypeSpray::decode(b"hi\xff\x01zz\x00\x00", &Ok(0));
    assert_eq!(value(&spray, TypeTag::Str), "hizz");
}

#[test]
fn test_ptr_renders_as_sixteen_digit_address()
{
    let spray = TypeSpray::decode(&VECTOR, &Ok(0x2000));
    assert_eq!(value(&spray, TypeTag::Ptr), "0x0000000000002000");
}

#[test]
fn test_pointer_failure_marks_only_ptr_field()
{
    let spray = TypeSpray::decode(&VECTOR, &Err(BackendError::PointerRead(0x1000)));
    assert_eq!(*spray.field(TypeTag::Ptr), FieldValue::DerefFailed);

    // Every other field still decodes.
    assert_eq!(value(&spray, TypeTag::U64), "578437695752307201");
    assert_eq!(value(&spray, TypeTag::F64), f64::from_le_bytes(VECTOR).to_string());
    assert_eq!(value(&spray, TypeTag::I8), "1");
}

#[test]
fn test_blank_spray_has_no_values()
{
    let spray = TypeSpray::blank();
    for tag in TypeTag::ALL {
        assert_eq!(*spray.field(tag), FieldValue::Blank, "{tag:?} should be blank");
        assert_eq!(spray.field(tag).display(), "");
    }
}

#[test]
fn test_sixteen_byte_buffer_uses_leading_bytes()
{
    let mut data = [0u8; 16];
    data[..8].copy_from_slice(&VECTOR);
    data[8..].copy_from_slice(&[0xaa; 8]);

    let spray = TypeSpray::decode(&data, &Ok(0));
    // Integer and float fields come from the first 8 bytes only.
    assert_eq!(value(&spray, TypeTag::U64), "578437695752307201");
    // The string field covers the full buffer.
    let spray = TypeSpray::decode(b"abcdefghijklmnop", &Ok(0));
    assert_eq!(value(&spray, TypeTag::Str), "abcdefghijklmnop");
}

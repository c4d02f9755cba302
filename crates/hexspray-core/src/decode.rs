//! # Type-Spray Decoder
//!
//! Decodes one byte buffer as every supported primitive type at once.
//!
//! The same pipeline serves two questions. With dereferencing off, the
//! 16-hex-digit address string itself is treated as the buffer ("what does
//! this bit pattern mean"); with dereferencing on, the buffer is 16 bytes
//! read live from process memory at that address ("what is stored here").
//! Only the byte source differs; the decode contract is identical.
//!
//! All integer and float fields read the first N bytes of the buffer in
//! little-endian order. The literal (non-dereferenced) buffer is produced
//! from the address string in string order: the first two hex digits become
//! the first byte, for every field uniformly.

use crate::error::BackendError;

/// The typed interpretations produced for every buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag
{
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Str,
    Ptr,
}

impl TypeTag
{
    /// All tags in the display order of the spray grid.
    pub const ALL: [TypeTag; 12] = [
        TypeTag::U8,
        TypeTag::I8,
        TypeTag::F32,
        TypeTag::U16,
        TypeTag::I16,
        TypeTag::F64,
        TypeTag::U32,
        TypeTag::I32,
        TypeTag::Str,
        TypeTag::U64,
        TypeTag::I64,
        TypeTag::Ptr,
    ];

    /// Display label for the field.
    #[must_use]
    pub const fn label(self) -> &'static str
    {
        match self {
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U64 => "u64",
            TypeTag::I8 => "i8",
            TypeTag::I16 => "i16",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::F32 => "f32",
            TypeTag::F64 => "f64",
            TypeTag::Str => "str",
            TypeTag::Ptr => "ptr",
        }
    }
}

/// One decoded field: a rendered value, a per-field failure marker, or
/// blank (when the whole buffer read failed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue
{
    /// Successfully rendered interpretation.
    Value(String),
    /// The pointer-width dereference for this field failed; other fields
    /// are unaffected.
    DerefFailed,
    /// No decode was attempted for this field.
    Blank,
}

impl FieldValue
{
    /// Text shown in the spray grid.
    #[must_use]
    pub fn display(&self) -> &str
    {
        match self {
            FieldValue::Value(text) => text,
            FieldValue::DerefFailed => "dereference failed",
            FieldValue::Blank => "",
        }
    }
}

/// Every typed interpretation of one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpray
{
    fields: [FieldValue; 12],
}

impl TypeSpray
{
    /// Decode a buffer of at least 8 bytes.
    ///
    /// `pointer` is the engine's answer to dereferencing the examined
    /// address one more pointer width; its failure marks only the `ptr`
    /// field.
    #[must_use]
    pub fn decode(data: &[u8], pointer: &Result<u64, BackendError>) -> Self
    {
        debug_assert!(data.len() >= 8, "type spray needs at least 8 bytes");

        let b1: [u8; 1] = data[..1].try_into().unwrap_or_default();
        let b2: [u8; 2] = data[..2].try_into().unwrap_or_default();
        let b4: [u8; 4] = data[..4].try_into().unwrap_or_default();
        let b8: [u8; 8] = data[..8].try_into().unwrap_or_default();

        let ptr_field = match pointer {
            Ok(value) => FieldValue::Value(format!("0x{value:016x}")),
            Err(_) => FieldValue::DerefFailed,
        };

        let fields = [
            FieldValue::Value(u8::from_le_bytes(b1).to_string()),
            FieldValue::Value(u16::from_le_bytes(b2).to_string()),
            FieldValue::Value(u32::from_le_bytes(b4).to_string()),
            FieldValue::Value(u64::from_le_bytes(b8).to_string()),
            FieldValue::Value(i8::from_le_bytes(b1).to_string()),
            FieldValue::Value(i16::from_le_bytes(b2).to_string()),
            FieldValue::Value(i32::from_le_bytes(b4).to_string()),
            FieldValue::Value(i64::from_le_bytes(b8).to_string()),
            FieldValue::Value(f32::from_le_bytes(b4).to_string()),
            FieldValue::Value(f64::from_le_bytes(b8).to_string()),
            FieldValue::Value(ascii_lossy(data)),
            ptr_field,
        ];

        Self { fields }
    }

    /// The all-blank spray shown when the live memory read itself failed:
    /// no partial decode is attempted.
    #[must_use]
    pub fn blank() -> Self
    {
        Self {
            fields: std::array::from_fn(|_| FieldValue::Blank),
        }
    }

    /// The decoded field for one tag.
    #[must_use]
    pub fn field(&self, tag: TypeTag) -> &FieldValue
    {
        let index = match tag {
            TypeTag::U8 => 0,
            TypeTag::U16 => 1,
            TypeTag::U32 => 2,
            TypeTag::U64 => 3,
            TypeTag::I8 => 4,
            TypeTag::I16 => 5,
            TypeTag::I32 => 6,
            TypeTag::I64 => 7,
            TypeTag::F32 => 8,
            TypeTag::F64 => 9,
            TypeTag::Str => 10,
            TypeTag::Ptr => 11,
        };
        &self.fields[index]
    }
}

/// Best-effort ASCII decode over the full buffer. Bytes outside printable
/// ASCII are dropped rather than failing the field.
fn ascii_lossy(data: &[u8]) -> String
{
    data.iter().filter(|b| b.is_ascii_graphic() || **b == b' ').map(|&b| b as char).collect()
}

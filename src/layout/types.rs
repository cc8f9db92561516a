// Primitive integer types and decoded values for record layouts

use std::fmt;

/// A fixed-width integer field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
}

impl PrimitiveType {
    /// Look up the type for a layout code letter.
    ///
    /// The letter selects the width (`c` 1, `s` 2, `l` 4, `q` 8 bytes) and its
    /// case selects signedness: lower case is signed, upper case unsigned.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'c' => Some(PrimitiveType::Int8),
            's' => Some(PrimitiveType::Int16),
            'l' => Some(PrimitiveType::Int32),
            'q' => Some(PrimitiveType::Int64),
            'C' => Some(PrimitiveType::UInt8),
            'S' => Some(PrimitiveType::UInt16),
            'L' => Some(PrimitiveType::UInt32),
            'Q' => Some(PrimitiveType::UInt64),
            _ => None,
        }
    }

    /// The layout code letter for this type
    pub fn code(&self) -> char {
        match self {
            PrimitiveType::Int8 => 'c',
            PrimitiveType::Int16 => 's',
            PrimitiveType::Int32 => 'l',
            PrimitiveType::Int64 => 'q',
            PrimitiveType::UInt8 => 'C',
            PrimitiveType::UInt16 => 'S',
            PrimitiveType::UInt32 => 'L',
            PrimitiveType::UInt64 => 'Q',
        }
    }

    /// Width in bytes
    pub fn width(&self) -> usize {
        match self {
            PrimitiveType::Int8 | PrimitiveType::UInt8 => 1,
            PrimitiveType::Int16 | PrimitiveType::UInt16 => 2,
            PrimitiveType::Int32 | PrimitiveType::UInt32 => 4,
            PrimitiveType::Int64 | PrimitiveType::UInt64 => 8,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One decoded integer, tagged with the type it was read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
}

impl DecodedValue {
    pub fn is_negative(&self) -> bool {
        match *self {
            DecodedValue::Int8(v) => v < 0,
            DecodedValue::Int16(v) => v < 0,
            DecodedValue::Int32(v) => v < 0,
            DecodedValue::Int64(v) => v < 0,
            _ => false,
        }
    }

    /// Absolute value, wide enough for every variant (including `i64::MIN`)
    pub fn magnitude(&self) -> u64 {
        match *self {
            DecodedValue::Int8(v) => u64::from(v.unsigned_abs()),
            DecodedValue::Int16(v) => u64::from(v.unsigned_abs()),
            DecodedValue::Int32(v) => u64::from(v.unsigned_abs()),
            DecodedValue::Int64(v) => v.unsigned_abs(),
            DecodedValue::UInt8(v) => u64::from(v),
            DecodedValue::UInt16(v) => u64::from(v),
            DecodedValue::UInt32(v) => u64::from(v),
            DecodedValue::UInt64(v) => v,
        }
    }

    /// The value as a character, if it is a valid Unicode scalar value
    pub fn to_char(&self) -> Option<char> {
        if self.is_negative() {
            return None;
        }
        u32::try_from(self.magnitude())
            .ok()
            .and_then(char::from_u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for code in "csqlCSLQ".chars() {
            let ty = PrimitiveType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
        assert_eq!(PrimitiveType::from_code('x'), None);
        assert_eq!(PrimitiveType::from_code('1'), None);
    }

    #[test]
    fn test_widths() {
        assert_eq!(PrimitiveType::Int8.width(), 1);
        assert_eq!(PrimitiveType::UInt16.width(), 2);
        assert_eq!(PrimitiveType::Int32.width(), 4);
        assert_eq!(PrimitiveType::UInt64.width(), 8);
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(DecodedValue::Int8(-128).magnitude(), 128);
        assert_eq!(DecodedValue::Int64(i64::MIN).magnitude(), 1 << 63);
        assert_eq!(DecodedValue::UInt64(u64::MAX).magnitude(), u64::MAX);
        assert!(DecodedValue::Int16(-1).is_negative());
        assert!(!DecodedValue::UInt16(0xFFFF).is_negative());
    }

    #[test]
    fn test_to_char() {
        assert_eq!(DecodedValue::UInt8(b'A').to_char(), Some('A'));
        assert_eq!(DecodedValue::Int8(-1).to_char(), None);
        assert_eq!(DecodedValue::UInt32(0xD800).to_char(), None);
        assert_eq!(DecodedValue::UInt64(u64::MAX).to_char(), None);
    }
}

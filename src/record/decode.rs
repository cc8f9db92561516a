// Field decoding from raw record bytes
// Multi-byte fields are little-endian

use crate::layout::{DecodedValue, FieldLayout, PrimitiveType};
use nom::{
    combinator::map,
    number::complete::{le_i16, le_i32, le_i64, le_i8, le_u16, le_u32, le_u64, le_u8},
    IResult, Parser,
};

/// Parse one field of type `ty`
pub fn parse_field(ty: PrimitiveType, input: &[u8]) -> IResult<&[u8], DecodedValue> {
    match ty {
        PrimitiveType::Int8 => map(le_i8, DecodedValue::Int8).parse(input),
        PrimitiveType::Int16 => map(le_i16, DecodedValue::Int16).parse(input),
        PrimitiveType::Int32 => map(le_i32, DecodedValue::Int32).parse(input),
        PrimitiveType::Int64 => map(le_i64, DecodedValue::Int64).parse(input),
        PrimitiveType::UInt8 => map(le_u8, DecodedValue::UInt8).parse(input),
        PrimitiveType::UInt16 => map(le_u16, DecodedValue::UInt16).parse(input),
        PrimitiveType::UInt32 => map(le_u32, DecodedValue::UInt32).parse(input),
        PrimitiveType::UInt64 => map(le_u64, DecodedValue::UInt64).parse(input),
    }
}

/// Decode as many whole fields of `layout` as `bytes` holds into `values`.
///
/// Returns the number of bytes consumed; anything left over belongs to a
/// field that was only partly available.
pub fn decode_record(layout: &FieldLayout, bytes: &[u8], values: &mut Vec<DecodedValue>) -> usize {
    values.clear();
    let mut input = bytes;
    for &ty in layout.fields() {
        match parse_field(ty, input) {
            Ok((rest, value)) => {
                values.push(value);
                input = rest;
            }
            Err(_) => break,
        }
    }
    bytes.len() - input.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compile;

    #[test]
    fn test_parse_little_endian() {
        let data = [0x34, 0x12, 0xFF, 0xFF];
        let (rest, value) = parse_field(PrimitiveType::UInt16, &data).unwrap();
        assert_eq!(value, DecodedValue::UInt16(0x1234));
        assert_eq!(rest, &[0xFF, 0xFF]);

        let (_, value) = parse_field(PrimitiveType::Int16, rest).unwrap();
        assert_eq!(value, DecodedValue::Int16(-1));

        let data = [0x78, 0x56, 0x34, 0x12];
        let (_, value) = parse_field(PrimitiveType::UInt32, &data).unwrap();
        assert_eq!(value, DecodedValue::UInt32(0x12345678));
    }

    #[test]
    fn test_insufficient_data() {
        let data = [0x12];
        assert!(parse_field(PrimitiveType::UInt16, &data).is_err());
        assert!(parse_field(PrimitiveType::Int64, &[]).is_err());
    }

    #[test]
    fn test_decode_full_record() {
        let layout = compile("sL2c").unwrap();
        let bytes = [
            0xFE, 0xFF, // -2
            0x01, 0x00, 0x00, 0x00, // 1
            0x78, 0x56, 0x34, 0x12, // 0x12345678
            0x80, // -128
        ];
        let mut values = Vec::new();
        assert_eq!(decode_record(&layout, &bytes, &mut values), 11);
        assert_eq!(
            values,
            vec![
                DecodedValue::Int16(-2),
                DecodedValue::UInt32(1),
                DecodedValue::UInt32(0x12345678),
                DecodedValue::Int8(-128),
            ]
        );
    }

    #[test]
    fn test_decode_prefix() {
        let layout = compile("C2S").unwrap();
        let mut values = vec![DecodedValue::UInt8(0xAA)];

        // Two bytes decode the two C fields, the third byte is half an S
        assert_eq!(decode_record(&layout, &[1, 2, 3], &mut values), 2);
        assert_eq!(values, vec![DecodedValue::UInt8(1), DecodedValue::UInt8(2)]);

        assert_eq!(decode_record(&layout, &[], &mut values), 0);
        assert!(values.is_empty());
    }
}

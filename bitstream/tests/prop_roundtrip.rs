use bitstream::{BitReader, BitWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Bool(bool),
    Bits { bits: u32, value: u64 },
    Signed { size: u32, value: i32 },
    Unsigned { size: u32, value: u32 },
    SignedLong { size: u32, value: i64 },
    UnsignedLong { size: u32, value: u64 },
    Char { size: u32, value: u16 },
    Skip(u64),
    Align(u32),
}

fn mask_value(bits: u32, value: u64) -> u64 {
    if bits >= 64 {
        value
    } else {
        value & ((1u64 << bits) - 1)
    }
}

fn signed_strategy() -> impl Strategy<Value = Op> {
    (1u32..=32).prop_flat_map(|size| {
        let min = -(1i64 << (size - 1));
        let max = (1i64 << (size - 1)) - 1;
        (min..=max).prop_map(move |value| Op::Signed {
            size,
            value: value as i32,
        })
    })
}

fn unsigned_strategy() -> impl Strategy<Value = Op> {
    (1u32..=31).prop_flat_map(|size| {
        let max = (1u64 << size) - 1;
        (0..=max).prop_map(move |value| Op::Unsigned {
            size,
            value: value as u32,
        })
    })
}

fn signed_long_strategy() -> impl Strategy<Value = Op> {
    (1u32..=64).prop_flat_map(|size| {
        let min = if size == 64 {
            i64::MIN
        } else {
            -(1i64 << (size - 1))
        };
        let max = if size == 64 {
            i64::MAX
        } else {
            (1i64 << (size - 1)) - 1
        };
        (min..=max).prop_map(move |value| Op::SignedLong { size, value })
    })
}

fn unsigned_long_strategy() -> impl Strategy<Value = Op> {
    (1u32..=63).prop_flat_map(|size| {
        let max = (1u64 << size) - 1;
        (0..=max).prop_map(move |value| Op::UnsignedLong { size, value })
    })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(Op::Bool),
        (1u32..=64, any::<u64>()).prop_map(|(bits, value)| Op::Bits {
            bits,
            value: mask_value(bits, value),
        }),
        signed_strategy(),
        unsigned_strategy(),
        signed_long_strategy(),
        unsigned_long_strategy(),
        (1u32..=16, any::<u16>()).prop_map(|(size, value)| Op::Char {
            size,
            value: (mask_value(size, u64::from(value))) as u16,
        }),
        (1u64..=100).prop_map(Op::Skip),
        (1u32..=4).prop_map(Op::Align),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = BitWriter::in_memory();
        let mut pads = Vec::new();

        for op in &ops {
            match op {
                Op::Bool(b) => writer.write_bool(*b).unwrap(),
                Op::Bits { bits, value } => writer.write_bits(*value, *bits).unwrap(),
                Op::Signed { size, value } => writer.write_signed(*size, *value).unwrap(),
                Op::Unsigned { size, value } => writer.write_unsigned(*size, *value).unwrap(),
                Op::SignedLong { size, value } => {
                    writer.write_signed_long(*size, *value).unwrap();
                }
                Op::UnsignedLong { size, value } => {
                    writer.write_unsigned_long(*size, *value).unwrap();
                }
                Op::Char { size, value } => writer.write_char(*size, *value).unwrap(),
                Op::Skip(bits) => writer.skip(*bits).unwrap(),
                Op::Align(boundary) => pads.push(writer.align(*boundary).unwrap()),
            }
        }

        let total_bits = writer.bits_written();
        let bytes = writer.finish();
        prop_assert_eq!(bytes.len() as u64, total_bits.div_ceil(8));

        let mut reader = BitReader::new(&bytes[..]);
        let mut pad_iter = pads.into_iter();

        for op in &ops {
            match op {
                Op::Bool(b) => prop_assert_eq!(reader.read_bool().unwrap(), *b),
                Op::Bits { bits, value } => {
                    prop_assert_eq!(reader.read_bits(*bits).unwrap(), *value);
                }
                Op::Signed { size, value } => {
                    prop_assert_eq!(reader.read_signed(*size).unwrap(), *value);
                }
                Op::Unsigned { size, value } => {
                    prop_assert_eq!(reader.read_unsigned(*size).unwrap(), *value);
                }
                Op::SignedLong { size, value } => {
                    prop_assert_eq!(reader.read_signed_long(*size).unwrap(), *value);
                }
                Op::UnsignedLong { size, value } => {
                    prop_assert_eq!(reader.read_unsigned_long(*size).unwrap(), *value);
                }
                Op::Char { size, value } => {
                    prop_assert_eq!(reader.read_char(*size).unwrap(), *value);
                }
                Op::Skip(bits) => reader.skip(*bits).unwrap(),
                Op::Align(boundary) => {
                    // The discarded count must equal what the writer padded.
                    let expected = pad_iter.next().unwrap();
                    prop_assert_eq!(reader.align(*boundary).unwrap(), expected);
                }
            }
        }
    }

    #[test]
    fn prop_truncated_input_fails_cleanly(
        bits in 2u32..=64,
        value in any::<u64>(),
    ) {
        let mut writer = BitWriter::in_memory();
        writer.write_bits(mask_value(bits, value), bits).unwrap();
        let mut bytes = writer.finish();
        bytes.pop();

        let mut reader = BitReader::new(&bytes[..]);
        // With the last byte gone the full field can no longer be read.
        prop_assert!(reader.read_bits(bits).is_err());
    }
}

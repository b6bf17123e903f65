//! Introspection and debugging tools for bitgrain streams.
//!
//! Callers describe a stream as a comma-separated field layout; these
//! utilities decode bytes against it (with bit offsets) or encode a JSON
//! value list into packed bytes.
//!
//! # Layout grammar
//!
//! | Token        | Field                                         |
//! |--------------|-----------------------------------------------|
//! | `bool`       | 1-bit boolean                                 |
//! | `u<N>`       | unsigned integer, N bits (1..=31)             |
//! | `s<N>`       | signed integer, N bits (1..=32)               |
//! | `lu<N>`      | unsigned long, N bits (1..=63)                |
//! | `ls<N>`      | signed long, N bits (1..=64)                  |
//! | `c<N>`       | 16-bit character code unit, N bits (1..=16)   |
//! | `f<E>:<S>`   | f32 with E exponent / S significand bits      |
//! | `d<E>:<S>`   | f64 with E exponent / S significand bits      |
//! | `vlq`        | unsigned variable-length quantity             |
//! | `skip<N>`    | N discarded (read) or zero (write) bits       |
//! | `align<N>`   | alignment to an N-byte boundary               |
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not
//!   afterthoughts.
//! - **Human-readable output** - Make it easy to see what the codecs are
//!   doing at the bit level.

use anyhow::{anyhow, bail, Context, Result};
use bitstream::{BitReader, BitWriter};
use codec::{read_vlq_u64, write_vlq_u64, Codec, FloatCodec};
use serde::Serialize;
use serde_json::Value;

/// One field of a stream layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Bool,
    UInt(u32),
    SInt(u32),
    ULong(u32),
    SLong(u32),
    Char(u32),
    Float { exponent: u32, significand: u32 },
    Double { exponent: u32, significand: u32 },
    Vlq,
    Skip(u64),
    Align(u32),
}

/// A decoded field with its position in the stream.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedField {
    /// Bit offset at which the field started.
    pub offset_bits: u64,
    /// Bits the field occupied (padding included for alignments).
    pub width_bits: u64,
    /// Layout token that produced the field.
    pub token: String,
    /// Decoded value; alignments report the discarded bit count.
    pub value: Value,
}

fn parse_width(token: &str, rest: &str, max: u32) -> Result<u32> {
    let width: u32 = rest
        .parse()
        .with_context(|| format!("bad width in layout token {token:?}"))?;
    if width == 0 || width > max {
        bail!("width {width} in token {token:?} is outside 1..={max}");
    }
    Ok(width)
}

fn parse_float_widths(token: &str, rest: &str) -> Result<(u32, u32)> {
    let (exponent, significand) = rest
        .split_once(':')
        .ok_or_else(|| anyhow!("token {token:?} needs the form <exp>:<sig>"))?;
    Ok((
        exponent
            .parse()
            .with_context(|| format!("bad exponent width in {token:?}"))?,
        significand
            .parse()
            .with_context(|| format!("bad significand width in {token:?}"))?,
    ))
}

/// Parses a comma-separated layout string.
pub fn parse_layout(layout: &str) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    for token in layout.split(',') {
        let token = token.trim();
        if token.is_empty() {
            bail!("empty token in layout");
        }
        let field = if token == "bool" {
            Field::Bool
        } else if token == "vlq" {
            Field::Vlq
        } else if let Some(rest) = token.strip_prefix("lu") {
            Field::ULong(parse_width(token, rest, 63)?)
        } else if let Some(rest) = token.strip_prefix("ls") {
            Field::SLong(parse_width(token, rest, 64)?)
        } else if let Some(rest) = token.strip_prefix("skip") {
            Field::Skip(u64::from(parse_width(token, rest, u32::MAX)?))
        } else if let Some(rest) = token.strip_prefix("align") {
            Field::Align(parse_width(token, rest, 4096)?)
        } else if let Some(rest) = token.strip_prefix('u') {
            Field::UInt(parse_width(token, rest, 31)?)
        } else if let Some(rest) = token.strip_prefix('s') {
            Field::SInt(parse_width(token, rest, 32)?)
        } else if let Some(rest) = token.strip_prefix('c') {
            Field::Char(parse_width(token, rest, 16)?)
        } else if let Some(rest) = token.strip_prefix('f') {
            let (exponent, significand) = parse_float_widths(token, rest)?;
            Field::Float {
                exponent,
                significand,
            }
        } else if let Some(rest) = token.strip_prefix('d') {
            let (exponent, significand) = parse_float_widths(token, rest)?;
            Field::Double {
                exponent,
                significand,
            }
        } else {
            bail!("unknown layout token {token:?}");
        };
        fields.push(field);
    }
    Ok(fields)
}

fn token_of(field: &Field) -> String {
    match field {
        Field::Bool => "bool".to_owned(),
        Field::UInt(bits) => format!("u{bits}"),
        Field::SInt(bits) => format!("s{bits}"),
        Field::ULong(bits) => format!("lu{bits}"),
        Field::SLong(bits) => format!("ls{bits}"),
        Field::Char(bits) => format!("c{bits}"),
        Field::Float {
            exponent,
            significand,
        } => format!("f{exponent}:{significand}"),
        Field::Double {
            exponent,
            significand,
        } => format!("d{exponent}:{significand}"),
        Field::Vlq => "vlq".to_owned(),
        Field::Skip(bits) => format!("skip{bits}"),
        Field::Align(boundary) => format!("align{boundary}"),
    }
}

fn float_value(value: f64) -> Value {
    // JSON numbers cannot hold NaN or infinity; fall back to strings so
    // the output stays machine-readable.
    serde_json::Number::from_f64(value).map_or_else(|| Value::String(value.to_string()), Value::Number)
}

/// Decodes `bytes` against `fields`, reporting each value and offset.
pub fn decode_stream(bytes: &[u8], fields: &[Field]) -> Result<Vec<DecodedField>> {
    let mut reader = BitReader::new(bytes);
    let mut decoded = Vec::with_capacity(fields.len());
    for field in fields {
        let offset_bits = reader.bits_read();
        let value = match *field {
            Field::Bool => Value::Bool(reader.read_bool()?),
            Field::UInt(bits) => Value::from(reader.read_unsigned(bits)?),
            Field::SInt(bits) => Value::from(reader.read_signed(bits)?),
            Field::ULong(bits) => Value::from(reader.read_unsigned_long(bits)?),
            Field::SLong(bits) => Value::from(reader.read_signed_long(bits)?),
            Field::Char(bits) => Value::from(reader.read_char(bits)?),
            Field::Float {
                exponent,
                significand,
            } => {
                let codec = FloatCodec::<f32>::new(exponent, significand)?;
                float_value(f64::from(codec.decode(&mut reader)?))
            }
            Field::Double {
                exponent,
                significand,
            } => {
                let codec = FloatCodec::<f64>::new(exponent, significand)?;
                float_value(codec.decode(&mut reader)?)
            }
            Field::Vlq => Value::from(read_vlq_u64(&mut reader)?),
            Field::Skip(bits) => {
                reader.skip(bits)?;
                Value::Null
            }
            Field::Align(boundary) => Value::from(reader.align(boundary)?),
        };
        decoded.push(DecodedField {
            offset_bits,
            width_bits: reader.bits_read() - offset_bits,
            token: token_of(field),
            value,
        });
    }
    Ok(decoded)
}

fn expect_u64(value: &Value, token: &str) -> Result<u64> {
    value
        .as_u64()
        .ok_or_else(|| anyhow!("field {token} needs a non-negative integer, got {value}"))
}

fn expect_i64(value: &Value, token: &str) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| anyhow!("field {token} needs an integer, got {value}"))
}

fn expect_f64(value: &Value, token: &str) -> Result<f64> {
    match value {
        Value::String(text) => text
            .parse()
            .with_context(|| format!("field {token} has unparseable number {text:?}")),
        _ => value
            .as_f64()
            .ok_or_else(|| anyhow!("field {token} needs a number, got {value}")),
    }
}

/// Encodes a JSON array of values against `fields` into packed bytes.
///
/// `skip` and `align` fields consume no input value.
pub fn encode_stream(values: &[Value], fields: &[Field]) -> Result<Vec<u8>> {
    let mut writer = BitWriter::in_memory();
    let mut inputs = values.iter();
    let mut next = |token: &str| {
        inputs
            .next()
            .ok_or_else(|| anyhow!("no value left for field {token}"))
    };

    for field in fields {
        let token = token_of(field);
        match *field {
            Field::Bool => {
                let value = next(&token)?;
                let flag = value
                    .as_bool()
                    .ok_or_else(|| anyhow!("field {token} needs a boolean, got {value}"))?;
                writer.write_bool(flag)?;
            }
            Field::UInt(bits) => {
                let raw = expect_u64(next(&token)?, &token)?;
                writer.write_unsigned(bits, u32::try_from(raw).context("u32 overflow")?)?;
            }
            Field::SInt(bits) => {
                let raw = expect_i64(next(&token)?, &token)?;
                writer.write_signed(bits, i32::try_from(raw).context("i32 overflow")?)?;
            }
            Field::ULong(bits) => {
                writer.write_unsigned_long(bits, expect_u64(next(&token)?, &token)?)?;
            }
            Field::SLong(bits) => {
                writer.write_signed_long(bits, expect_i64(next(&token)?, &token)?)?;
            }
            Field::Char(bits) => {
                let raw = expect_u64(next(&token)?, &token)?;
                writer.write_char(bits, u16::try_from(raw).context("u16 overflow")?)?;
            }
            Field::Float {
                exponent,
                significand,
            } => {
                let codec = FloatCodec::<f32>::new(exponent, significand)?;
                codec.encode(&mut writer, &(expect_f64(next(&token)?, &token)? as f32))?;
            }
            Field::Double {
                exponent,
                significand,
            } => {
                let codec = FloatCodec::<f64>::new(exponent, significand)?;
                codec.encode(&mut writer, &expect_f64(next(&token)?, &token)?)?;
            }
            Field::Vlq => {
                write_vlq_u64(&mut writer, expect_u64(next(&token)?, &token)?)?;
            }
            Field::Skip(bits) => writer.skip(bits)?,
            Field::Align(boundary) => {
                writer.align(boundary)?;
            }
        }
    }

    if inputs.next().is_some() {
        bail!("more values than layout fields");
    }
    Ok(writer.finish())
}

/// Renders decoded fields as an aligned, human-readable table.
#[must_use]
pub fn format_decode_pretty(fields: &[DecodedField]) -> String {
    let mut out = String::new();
    for field in fields {
        out.push_str(&format!(
            "{:>8}  {:>5}  {:<8} {}\n",
            field.offset_bits, field.width_bits, field.token, field.value
        ));
    }
    out
}

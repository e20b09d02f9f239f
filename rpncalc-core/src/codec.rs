//! Conversion between numbers and their text in base 2, 10 or 16.
//!
//! Integers print as plain digit strings without a radix prefix (a leading
//! `-` for negative values). Floats always print in base 10, using the
//! shortest digits that read back to the same double.

use num_bigint::BigInt;

use crate::value::{Number, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Base {
    Binary,
    #[default]
    Decimal,
    Hex,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Binary => 2,
            Base::Decimal => 10,
            Base::Hex => 16,
        }
    }

    pub fn from_radix(radix: u32) -> Option<Self> {
        match radix {
            2 => Some(Base::Binary),
            10 => Some(Base::Decimal),
            16 => Some(Base::Hex),
            _ => None,
        }
    }

    // Radix prefixes accepted on input, never printed.
    fn prefixes(self) -> &'static [&'static str] {
        match self {
            Base::Binary => &["0b", "0B"],
            Base::Decimal => &[],
            Base::Hex => &["0x", "0X"],
        }
    }
}

pub fn format(value: &Number, base: Base) -> String {
    match value {
        Number::Int(i) => i.to_str_radix(base.radix()),
        Number::Float(f) => format_float(*f),
    }
}

pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.into();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.into();
    }

    // LowerExp yields the shortest round-trip digits, e.g. "-1.25e-7"
    let sci = format!("{:e}", value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return sci;
    };
    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if (-4..16).contains(&exponent) {
        if exponent < 0 {
            let zeros = "0".repeat((-exponent - 1) as usize);
            format!("{sign}0.{zeros}{digits}")
        } else {
            let point = exponent as usize + 1;
            if digits.len() <= point {
                let zeros = "0".repeat(point - digits.len());
                format!("{sign}{digits}{zeros}.0")
            } else {
                format!("{sign}{}.{}", &digits[..point], &digits[point..])
            }
        }
    } else {
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() { String::new() } else { format!(".{tail}") };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!("{sign}{head}{fraction}e{exp_sign}{:02}", exponent.unsigned_abs())
    }
}

/// Reads a buffer. Blank input is not an error: it yields `Ok(None)`.
/// A `.` anywhere selects float parsing, which ignores `base`.
pub fn parse(text: &str, base: Base) -> Result<Option<Number>, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if text.contains('.') {
        parse_float(text).map(|f| Some(Number::Float(f)))
    } else {
        parse_int(text, base).map(|i| Some(Number::Int(i)))
    }
}

fn parse_int(text: &str, base: Base) -> Result<BigInt, ParseError> {
    let (negative, unsigned) = split_sign(text);

    let mut body = unsigned;
    for prefix in base.prefixes() {
        if let Some(rest) = unsigned.strip_prefix(*prefix) {
            // a separator may directly follow the prefix: 0x_ff
            body = rest.strip_prefix('_').unwrap_or(rest);
            break;
        }
    }

    let digits = strip_separators(body, base.radix())?;
    if digits.is_empty() {
        return Err(ParseError::NoDigits(text.to_string()));
    }
    if let Some(digit) = digits.chars().find(|c| !c.is_digit(base.radix())) {
        return Err(ParseError::InvalidDigit {
            digit,
            base: base.radix(),
        });
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), base.radix())
        .ok_or_else(|| ParseError::NoDigits(text.to_string()))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn parse_float(text: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidFloat(text.to_string());

    let (negative, unsigned) = split_sign(text);
    let cleaned = strip_separators(unsigned, 10).map_err(|_| invalid())?;
    if !cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return Err(invalid());
    }
    // the sign has already been taken off, a second one is not a number
    if cleaned.starts_with(['+', '-']) {
        return Err(invalid());
    }

    let value: f64 = cleaned.parse().map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

// Underscores are only allowed singly, between two digits.
fn strip_separators(text: &str, radix: u32) -> Result<String, ParseError> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let before = i.checked_sub(1).and_then(|j| chars.get(j));
            let after = chars.get(i + 1);
            let between_digits = matches!((before, after), (Some(b), Some(a))
                if b.is_digit(radix) && a.is_digit(radix));
            if !between_digits {
                return Err(ParseError::Separator(text.to_string()));
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

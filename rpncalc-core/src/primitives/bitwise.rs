// Bitwise primitives. Operands are coerced to integers first (floats
// truncate toward zero); negative values use two's complement semantics.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::value::{Number, OpError};

pub fn and(a: &Number, b: &Number) -> Result<Number, OpError> {
    Ok(Number::Int(a.to_int()? & b.to_int()?))
}

pub fn or(a: &Number, b: &Number) -> Result<Number, OpError> {
    Ok(Number::Int(a.to_int()? | b.to_int()?))
}

pub fn xor(a: &Number, b: &Number) -> Result<Number, OpError> {
    Ok(Number::Int(a.to_int()? ^ b.to_int()?))
}

// ( a -- ~a ), i.e. -a - 1
pub fn not(a: &Number) -> Result<Number, OpError> {
    Ok(Number::Int(!a.to_int()?))
}

pub fn shift_left(a: &Number, b: &Number, max_bits: u64) -> Result<Number, OpError> {
    let value = a.to_int()?;
    let count = shift_count(b)?;
    if value.is_zero() {
        return Ok(Number::Int(value));
    }

    let too_large = || OpError::Overflow(format!("{value} << {} is too large", b));
    let count = count.to_u64().ok_or_else(too_large)?;
    if value.bits().saturating_add(count) > max_bits {
        return Err(too_large());
    }
    let count = usize::try_from(count).map_err(|_| too_large())?;
    Ok(Number::Int(value << count))
}

// Arithmetic shift: rounds toward negative infinity
pub fn shift_right(a: &Number, b: &Number) -> Result<Number, OpError> {
    let value = a.to_int()?;
    let count = shift_count(b)?;

    // everything shifted out: only the sign survives
    match count.to_u64() {
        Some(count) if count < value.bits() => {
            let count = usize::try_from(count).map_err(|_| {
                OpError::Overflow("shift count too large".into())
            })?;
            Ok(Number::Int(value >> count))
        }
        _ if value.is_negative() => Ok(Number::from(-1)),
        _ => Ok(Number::from(0)),
    }
}

fn shift_count(b: &Number) -> Result<BigInt, OpError> {
    let count = b.to_int()?;
    if count.is_negative() {
        return Err(OpError::Domain("negative shift count".into()));
    }
    Ok(count)
}

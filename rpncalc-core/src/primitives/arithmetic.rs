// Arithmetic primitives: ( a b -- result ) unless noted

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::primitives::numeric_promotion::{Promoted, promote_pair};
use crate::value::{Number, OpError};

pub fn add(a: &Number, b: &Number) -> Result<Number, OpError> {
    Ok(match promote_pair(a, b)? {
        Promoted::Ints(x, y) => Number::Int(x + y),
        Promoted::Floats(x, y) => Number::Float(x + y),
    })
}

pub fn sub(a: &Number, b: &Number) -> Result<Number, OpError> {
    Ok(match promote_pair(a, b)? {
        Promoted::Ints(x, y) => Number::Int(x - y),
        Promoted::Floats(x, y) => Number::Float(x - y),
    })
}

pub fn mul(a: &Number, b: &Number) -> Result<Number, OpError> {
    Ok(match promote_pair(a, b)? {
        Promoted::Ints(x, y) => Number::Int(x * y),
        Promoted::Floats(x, y) => Number::Float(x * y),
    })
}

// True division always produces a float, even for 6 3 div.
pub fn div(a: &Number, b: &Number) -> Result<Number, OpError> {
    let (x, y) = (a.to_f64()?, b.to_f64()?);
    if y == 0.0 {
        return Err(OpError::DivisionByZero);
    }
    Ok(Number::Float(x / y))
}

// Floor division: rounds toward negative infinity like Python's //
pub fn int_div(a: &Number, b: &Number) -> Result<Number, OpError> {
    if b.is_zero() {
        return Err(OpError::DivisionByZero);
    }
    Ok(match promote_pair(a, b)? {
        Promoted::Ints(x, y) => Number::Int(x.div_floor(y)),
        Promoted::Floats(x, y) => Number::Float(float_divmod(x, y).0),
    })
}

// Floor modulo: the result takes the sign of the divisor
pub fn modulo(a: &Number, b: &Number) -> Result<Number, OpError> {
    if b.is_zero() {
        return Err(OpError::ModuloByZero);
    }
    Ok(match promote_pair(a, b)? {
        Promoted::Ints(x, y) => Number::Int(x.mod_floor(y)),
        Promoted::Floats(x, y) => Number::Float(float_divmod(x, y).1),
    })
}

/// Exponentiation. Integer results larger than `max_bits` are refused
/// rather than computed; negative integer exponents produce a float.
pub fn pow(a: &Number, b: &Number, max_bits: u64) -> Result<Number, OpError> {
    match promote_pair(a, b)? {
        Promoted::Ints(x, y) if y.is_negative() => {
            if x.is_zero() {
                return Err(OpError::DivisionByZero);
            }
            float_pow(a.to_f64()?, b.to_f64()?).map(Number::Float)
        }
        Promoted::Ints(x, y) => int_pow(x, y, max_bits).map(Number::Int),
        Promoted::Floats(x, y) => float_pow(x, y).map(Number::Float),
    }
}

// ( a -- -a )
pub fn neg(a: &Number) -> Number {
    match a {
        Number::Int(x) => Number::Int(-x),
        Number::Float(x) => Number::Float(-x),
    }
}

fn int_pow(base: &BigInt, exponent: &BigInt, max_bits: u64) -> Result<BigInt, OpError> {
    // 0, 1 and -1 never grow, whatever the exponent
    if base.abs().is_one() || base.is_zero() {
        return Ok(if exponent.is_zero() {
            BigInt::one()
        } else if base.is_negative() && exponent.is_odd() {
            -BigInt::one()
        } else {
            base.abs()
        });
    }

    let too_large = || OpError::Overflow(format!("result of {base} ** {exponent} is too large"));
    let exponent = exponent.to_u32().ok_or_else(too_large)?;

    // |base| ** exp needs between (bits - 1) * exp + 1 and bits * exp bits;
    // only the band in between has to be computed to know
    let bits = base.bits();
    let exp = u64::from(exponent);
    if (bits - 1).saturating_mul(exp).saturating_add(1) > max_bits {
        return Err(too_large());
    }
    let result = base.pow(exponent);
    if bits.saturating_mul(exp) > max_bits && result.bits() > max_bits {
        return Err(too_large());
    }
    Ok(result)
}

pub(crate) fn float_pow(x: f64, y: f64) -> Result<f64, OpError> {
    if x == 0.0 && y < 0.0 {
        return Err(OpError::DivisionByZero);
    }
    if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
        return Err(OpError::Domain(
            "negative base with a fractional exponent".into(),
        ));
    }
    let result = x.powf(y);
    if result.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(OpError::Overflow("float power out of range".into()));
    }
    Ok(result)
}

// RUST CONCEPT: Python-compatible float divmod
// fmod keeps the dividend's sign; shift the remainder onto the divisor's
// side and correct the quotient to match.
fn float_divmod(x: f64, y: f64) -> (f64, f64) {
    let mut rem = x % y;
    let mut div = (x - rem) / y;
    if rem != 0.0 {
        if (y < 0.0) != (rem < 0.0) {
            rem += y;
            div -= 1.0;
        }
    } else {
        rem = 0.0_f64.copysign(y);
    }

    let floor_div = if div != 0.0 {
        let floored = div.floor();
        if div - floored > 0.5 { floored + 1.0 } else { floored }
    } else {
        0.0_f64.copysign(x / y)
    };
    (floor_div, rem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn int(v: i64) -> Number {
        Number::from(v)
    }

    #[test]
    fn test_int_arithmetic_stays_exact() {
        assert_eq!(add(&int(5), &int(3)).unwrap(), int(8));
        assert_eq!(sub(&int(5), &int(8)).unwrap(), int(-3));
        assert_eq!(mul(&int(-4), &int(6)).unwrap(), int(-24));
    }

    #[test]
    fn test_mixed_arithmetic_is_float() {
        assert_eq!(add(&int(1), &Number::Float(0.5)).unwrap(), Number::Float(1.5));
        assert_eq!(mul(&Number::Float(2.0), &int(3)).unwrap(), Number::Float(6.0));
    }

    #[test]
    fn test_division_always_floats() {
        assert_eq!(div(&int(6), &int(3)).unwrap(), Number::Float(2.0));
        assert_eq!(div(&int(7), &int(2)).unwrap(), Number::Float(3.5));
        assert_eq!(div(&int(1), &int(0)), Err(OpError::DivisionByZero));
        assert_eq!(div(&Number::Float(1.0), &Number::Float(0.0)), Err(OpError::DivisionByZero));
    }

    #[rstest]
    #[case(7, 2, 3, 1)]
    #[case(-7, 2, -4, 1)]
    #[case(7, -2, -4, -1)]
    #[case(-7, -2, 3, -1)]
    fn test_floor_semantics(#[case] a: i64, #[case] b: i64, #[case] quot: i64, #[case] rem: i64) {
        assert_eq!(int_div(&int(a), &int(b)).unwrap(), int(quot));
        assert_eq!(modulo(&int(a), &int(b)).unwrap(), int(rem));
    }

    #[test]
    fn test_float_floor_semantics() {
        assert_eq!(int_div(&Number::Float(7.5), &int(2)).unwrap(), Number::Float(3.0));
        assert_eq!(int_div(&Number::Float(-7.5), &int(2)).unwrap(), Number::Float(-4.0));
        assert_eq!(modulo(&Number::Float(-7.5), &int(2)).unwrap(), Number::Float(0.5));
        assert_eq!(modulo(&Number::Float(7.5), &int(-2)).unwrap(), Number::Float(-0.5));
    }

    #[test]
    fn test_by_zero() {
        assert_eq!(int_div(&int(1), &int(0)), Err(OpError::DivisionByZero));
        assert_eq!(modulo(&int(1), &int(0)), Err(OpError::ModuloByZero));
        assert_eq!(modulo(&Number::Float(1.0), &Number::Float(0.0)), Err(OpError::ModuloByZero));
    }

    #[test]
    fn test_pow() {
        assert_eq!(pow(&int(2), &int(10), 64).unwrap(), int(1024));
        assert_eq!(pow(&int(2), &int(-1), 64).unwrap(), Number::Float(0.5));
        assert_eq!(pow(&Number::Float(4.0), &Number::Float(0.5), 64).unwrap(), Number::Float(2.0));
        assert_eq!(pow(&int(-1), &int(1_000_000_001), 64).unwrap(), int(-1));
        assert_eq!(pow(&int(0), &int(-1), 64), Err(OpError::DivisionByZero));
    }

    #[test]
    fn test_pow_refuses_huge_results() {
        assert!(matches!(pow(&int(2), &int(100), 64), Err(OpError::Overflow(_))));
        assert!(matches!(pow(&Number::Float(10.0), &int(400), 64), Err(OpError::Overflow(_))));
        assert!(matches!(
            pow(&Number::Float(-8.0), &Number::Float(0.5), 64),
            Err(OpError::Domain(_))
        ));
    }

    #[test]
    fn test_pow_limit_is_exact() {
        assert_eq!(pow(&int(2), &int(63), 64).unwrap(), Number::Int(BigInt::one() << 63usize));
        assert!(matches!(pow(&int(2), &int(64), 64), Err(OpError::Overflow(_))));
        assert!(pow(&int(3), &int(40), 64).is_ok());
        assert!(matches!(pow(&int(3), &int(41), 64), Err(OpError::Overflow(_))));

        let result = pow(&int(2), &int(600_000), crate::settings::DEFAULT_MAX_INT_BITS).unwrap();
        assert!(matches!(result, Number::Int(ref i) if i.bits() == 600_001));
    }

    #[test]
    fn test_neg() {
        assert_eq!(neg(&int(5)), int(-5));
        assert_eq!(neg(&Number::Float(-1.5)), Number::Float(1.5));
    }
}

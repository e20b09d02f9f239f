// RUST CONCEPT: Numeric type promotion
// Int op Int stays exact; as soon as either side is a float both sides are
// widened to f64 (Int < Float in the promotion order).

use num_bigint::BigInt;

use crate::value::{Number, OpError};

pub enum Promoted<'a> {
    Ints(&'a BigInt, &'a BigInt),
    Floats(f64, f64),
}

pub fn promote_pair<'a>(a: &'a Number, b: &'a Number) -> Result<Promoted<'a>, OpError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Ok(Promoted::Ints(x, y)),
        _ => Ok(Promoted::Floats(a.to_f64()?, b.to_f64()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ints_stay_exact() {
        let (a, b) = (Number::from(5), Number::from(3));
        assert!(matches!(promote_pair(&a, &b), Ok(Promoted::Ints(_, _))));
    }

    #[test]
    fn test_any_float_widens_both() {
        let (a, b) = (Number::from(5), Number::Float(0.5));
        assert!(matches!(promote_pair(&a, &b), Ok(Promoted::Floats(x, y)) if x == 5.0 && y == 0.5));
    }

    #[test]
    fn test_unrepresentable_int_fails() {
        let (a, b) = (Number::Int(BigInt::from(1) << 4096usize), Number::Float(1.0));
        assert!(matches!(promote_pair(&a, &b), Err(OpError::Overflow(_))));
    }
}

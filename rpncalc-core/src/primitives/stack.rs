// Stack shuffling primitives. They return the values to push back, so a
// pair comes back in push order.

use crate::value::Number;

// ( a b -- b a )
pub fn swap(a: &Number, b: &Number) -> Vec<Number> {
    vec![b.clone(), a.clone()]
}

// ( a -- )
pub fn pop(_a: &Number) -> Vec<Number> {
    Vec::new()
}

// ( a -- a a )
pub fn dup(a: &Number) -> Vec<Number> {
    vec![a.clone(), a.clone()]
}

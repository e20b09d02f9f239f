// Primitive operations - pure functions over numbers, one module per family

// Arithmetic
pub mod arithmetic;

// Bitwise and shifts (operands coerced to integer)
pub mod bitwise;

// Stack shuffling
pub mod stack;

// Numeric type promotion
pub mod numeric_promotion;

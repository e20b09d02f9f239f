//! Restricted function bodies for `apply-function`.
//!
//! A definition reads `params: body`, for example `x, y: (x * y) % 7` or
//! `a, b: (b, a)`. The body is a small numeric expression language parsed
//! here and evaluated with the same primitives the stack operators use, so
//! integer arithmetic stays exact. Nothing outside this grammar can run.
//!
//! Precedence (highest to lowest):
//! - calls and parentheses: `sqrt(x)`, `(x + 1)`
//! - power: `**` (right associative, binds tighter than a unary sign on its left)
//! - unary: `-`, `+`, `~`
//! - `*`, `/`, `//`, `%`
//! - `+`, `-`
//! - `<<`, `>>`
//! - `&`, then `^`, then `|`

use core::cmp::Ordering;
use core::fmt;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed};

use crate::codec::{self, Base};
use crate::primitives::{arithmetic, bitwise};
use crate::settings::Settings;
use crate::value::{LambdaError, Number, OpError};

const MAX_DEPTH: usize = 256;

static END: Token = Token::End;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Pow,
    Mul,
    Div,
    IntDiv,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    And,
    Xor,
    Or,
}

impl BinOp {
    // Pow is handled separately by the parser and never reaches the loop.
    fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::Xor => 2,
            BinOp::And => 3,
            BinOp::Shl | BinOp::Shr => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div | BinOp::IntDiv | BinOp::Mod => 6,
            BinOp::Pow => 7,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinOp::Pow => "**",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::IntDiv => "//",
            BinOp::Mod => "%",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::And => "&",
            BinOp::Xor => "^",
            BinOp::Or => "|",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Abs,
    Min,
    Max,
    Int,
    Float,
    Round,
    Sqrt,
    Exp,
    Log,
    Log2,
    Log10,
    Sin,
    Cos,
    Tan,
    Floor,
    Ceil,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "abs" => Func::Abs,
            "min" => Func::Min,
            "max" => Func::Max,
            "int" => Func::Int,
            "float" => Func::Float,
            "round" => Func::Round,
            "sqrt" => Func::Sqrt,
            "exp" => Func::Exp,
            "log" => Func::Log,
            "log2" => Func::Log2,
            "log10" => Func::Log10,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "floor" => Func::Floor,
            "ceil" => Func::Ceil,
            _ => return None,
        })
    }

    fn accepts(self, count: usize) -> Result<(), &'static str> {
        let ok = match self {
            Func::Min | Func::Max => count >= 2,
            Func::Log => count == 1 || count == 2,
            _ => count == 1,
        };
        if ok {
            Ok(())
        } else {
            Err(match self {
                Func::Min | Func::Max => "at least 2",
                Func::Log => "1 or 2",
                _ => "exactly 1",
            })
        }
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" => Some(core::f64::consts::PI),
        "e" => Some(core::f64::consts::E),
        "tau" => Some(core::f64::consts::TAU),
        "inf" => Some(f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(Number),
    Param(usize),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
    Tuple(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(Number),
    Ident(String),
    Op(BinOp),
    Minus,
    Plus,
    Tilde,
    LParen,
    RParen,
    Comma,
    Colon,
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Op(op) => write!(f, "'{}'", op.symbol()),
            Token::Minus => write!(f, "'-'"),
            Token::Plus => write!(f, "'+'"),
            Token::Tilde => write!(f, "'~'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Comma => write!(f, "','"),
            Token::Colon => write!(f, "':'"),
            Token::End => write!(f, "end of input"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, LambdaError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    let exponent_sign = matches!(c, '+' | '-')
                        && literal.ends_with(['e', 'E'])
                        && !literal.starts_with("0x")
                        && !literal.starts_with("0X");
                    if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Num(parse_literal(&literal)?));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => {
                chars.next();
                let token = match ch {
                    '*' if chars.peek() == Some(&'*') => {
                        chars.next();
                        Token::Op(BinOp::Pow)
                    }
                    '*' => Token::Op(BinOp::Mul),
                    '/' if chars.peek() == Some(&'/') => {
                        chars.next();
                        Token::Op(BinOp::IntDiv)
                    }
                    '/' => Token::Op(BinOp::Div),
                    '%' => Token::Op(BinOp::Mod),
                    '<' if chars.peek() == Some(&'<') => {
                        chars.next();
                        Token::Op(BinOp::Shl)
                    }
                    '>' if chars.peek() == Some(&'>') => {
                        chars.next();
                        Token::Op(BinOp::Shr)
                    }
                    '&' => Token::Op(BinOp::And),
                    '^' => Token::Op(BinOp::Xor),
                    '|' => Token::Op(BinOp::Or),
                    '-' => Token::Minus,
                    '+' => Token::Plus,
                    '~' => Token::Tilde,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    ':' => Token::Colon,
                    other => return Err(LambdaError::UnexpectedChar(other)),
                };
                tokens.push(token);
            }
        }
    }

    tokens.push(Token::End);
    Ok(tokens)
}

fn parse_literal(literal: &str) -> Result<Number, LambdaError> {
    let invalid = || LambdaError::InvalidLiteral(literal.to_string());
    let lower = literal.to_ascii_lowercase();

    let parsed = if lower.starts_with("0x") {
        codec::parse(literal, Base::Hex).ok().flatten()
    } else if lower.starts_with("0b") {
        codec::parse(literal, Base::Binary).ok().flatten()
    } else if lower.contains('e') && !lower.contains('.') {
        lower.parse::<f64>().ok().map(Number::Float)
    } else {
        codec::parse(literal, Base::Decimal).ok().flatten()
    };
    parsed.ok_or_else(invalid)
}

struct Parser<'p> {
    tokens: Vec<Token>,
    pos: usize,
    params: &'p [String],
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&END)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), LambdaError> {
        if *self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(LambdaError::Expected {
                expected,
                found: self.peek().to_string(),
            })
        }
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, LambdaError>,
    ) -> Result<T, LambdaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(LambdaError::TooDeep);
        }
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, LambdaError> {
        self.nested(|p| {
            let mut left = p.parse_unary()?;
            let depth = p.depth;
            let chained = p.parse_chain(&mut left, min_prec);
            p.depth = depth;
            chained.map(|()| left)
        })
    }

    // Every operator in a flat chain such as `x + x + x` adds a level to the
    // left-leaning tree, so each one counts toward the depth limit.
    fn parse_chain(&mut self, left: &mut Expr, min_prec: u8) -> Result<(), LambdaError> {
        loop {
            let op = match self.peek() {
                Token::Op(op) if *op != BinOp::Pow => *op,
                Token::Minus => BinOp::Sub,
                Token::Plus => BinOp::Add,
                _ => return Ok(()),
            };
            let prec = op.precedence();
            if prec < min_prec {
                return Ok(());
            }
            self.depth += 1;
            if self.depth > MAX_DEPTH {
                return Err(LambdaError::TooDeep);
            }
            self.advance();
            let right = self.parse_expr(prec + 1)?;
            let lhs = core::mem::replace(left, Expr::Tuple(Vec::new()));
            *left = Expr::Binary(op, Box::new(lhs), Box::new(right));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, LambdaError> {
        let op = match self.peek() {
            Token::Minus => UnaryOp::Neg,
            Token::Plus => UnaryOp::Pos,
            Token::Tilde => UnaryOp::Invert,
            _ => return self.parse_power(),
        };
        self.advance();
        self.nested(|p| Ok(Expr::Unary(op, Box::new(p.parse_unary()?))))
    }

    fn parse_power(&mut self) -> Result<Expr, LambdaError> {
        let base = self.parse_atom()?;
        if *self.peek() != Token::Op(BinOp::Pow) {
            return Ok(base);
        }
        self.advance();
        let exponent = self.nested(|p| p.parse_unary())?;
        Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)))
    }

    fn parse_atom(&mut self) -> Result<Expr, LambdaError> {
        match self.advance() {
            Token::Num(n) => Ok(Expr::Num(n)),
            Token::Ident(name) if *self.peek() == Token::LParen => {
                self.advance();
                let args = self.parse_list()?;
                let short = name.strip_prefix("math.").unwrap_or(&name);
                let func = Func::lookup(short).ok_or_else(|| LambdaError::UnknownName(name.clone()))?;
                func.accepts(args.len())
                    .map_err(|expected| LambdaError::CallArity {
                        name: name.clone(),
                        expected,
                        got: args.len(),
                    })?;
                Ok(Expr::Call(func, args))
            }
            Token::Ident(name) => {
                if let Some(index) = self.params.iter().position(|p| *p == name) {
                    return Ok(Expr::Param(index));
                }
                let short = name.strip_prefix("math.").unwrap_or(&name);
                constant(short)
                    .map(|c| Expr::Num(Number::Float(c)))
                    .ok_or(LambdaError::UnknownName(name))
            }
            Token::LParen => {
                if *self.peek() == Token::RParen {
                    self.advance();
                    return Ok(Expr::Tuple(Vec::new()));
                }
                let first = self.nested(|p| p.parse_expr(0))?;
                if *self.peek() != Token::Comma {
                    self.expect(Token::RParen, "')'")?;
                    return Ok(first);
                }
                let mut items = vec![first];
                while *self.peek() == Token::Comma {
                    self.advance();
                    if *self.peek() == Token::RParen {
                        break;
                    }
                    items.push(self.nested(|p| p.parse_expr(0))?);
                }
                self.expect(Token::RParen, "')'")?;
                Ok(Expr::Tuple(items))
            }
            other => Err(LambdaError::Expected {
                expected: "a value",
                found: other.to_string(),
            }),
        }
    }

    // Call arguments after the opening parenthesis, through the closing one.
    fn parse_list(&mut self) -> Result<Vec<Expr>, LambdaError> {
        let mut args = Vec::new();
        if *self.peek() == Token::RParen {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.nested(|p| p.parse_expr(0))?);
            match self.advance() {
                Token::Comma => continue,
                Token::RParen => return Ok(args),
                other => {
                    return Err(LambdaError::Expected {
                        expected: "',' or ')'",
                        found: other.to_string(),
                    });
                }
            }
        }
    }
}

/// A parsed `apply-function` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    params: Vec<String>,
    body: Expr,
}

impl Lambda {
    pub fn parse(source: &str) -> Result<Self, LambdaError> {
        let tokens = tokenize(source)?;
        let colon = tokens
            .iter()
            .position(|t| *t == Token::Colon)
            .ok_or(LambdaError::MissingColon)?;

        let mut params: Vec<String> = Vec::new();
        let mut expect_name = true;
        for token in &tokens[..colon] {
            match (token, expect_name) {
                (Token::Ident(name), true) if !name.contains('.') => {
                    if params.contains(name) {
                        return Err(LambdaError::DuplicateParam(name.clone()));
                    }
                    params.push(name.clone());
                    expect_name = false;
                }
                (Token::Comma, false) => expect_name = true,
                (other, true) => {
                    return Err(LambdaError::Expected {
                        expected: "a parameter name",
                        found: other.to_string(),
                    });
                }
                (other, false) => {
                    return Err(LambdaError::Expected {
                        expected: "',' or ':'",
                        found: other.to_string(),
                    });
                }
            }
        }
        if expect_name && !params.is_empty() {
            return Err(LambdaError::Expected {
                expected: "a parameter name",
                found: Token::Colon.to_string(),
            });
        }

        let mut parser = Parser {
            tokens: tokens[colon + 1..].to_vec(),
            pos: 0,
            params: &params,
            depth: 0,
        };
        let body = parser.parse_expr(0)?;
        parser.expect(Token::End, "end of input")?;

        Ok(Self { params, body })
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Evaluate with `args` bound to the parameters in order. A tuple body
    /// yields one result per element, anything else exactly one.
    pub fn call(&self, args: &[Number], settings: &Settings) -> Result<Vec<Number>, OpError> {
        if args.len() != self.arity() {
            return Err(OpError::Arity {
                needed: self.arity(),
                available: args.len(),
            });
        }
        match &self.body {
            Expr::Tuple(items) => items.iter().map(|item| eval(item, args, settings)).collect(),
            expr => Ok(vec![eval(expr, args, settings)?]),
        }
    }
}

fn eval(expr: &Expr, args: &[Number], settings: &Settings) -> Result<Number, OpError> {
    match expr {
        Expr::Num(n) => Ok(n.clone()),
        Expr::Param(index) => args
            .get(*index)
            .cloned()
            .ok_or(OpError::Arity { needed: index + 1, available: args.len() }),
        Expr::Unary(op, operand) => {
            let value = eval(operand, args, settings)?;
            match op {
                UnaryOp::Neg => Ok(arithmetic::neg(&value)),
                UnaryOp::Pos => Ok(value),
                UnaryOp::Invert => bitwise::not(&value),
            }
        }
        Expr::Binary(op, lhs, rhs) => {
            let a = eval(lhs, args, settings)?;
            let b = eval(rhs, args, settings)?;
            match op {
                BinOp::Pow => arithmetic::pow(&a, &b, settings.max_int_bits),
                BinOp::Mul => arithmetic::mul(&a, &b),
                BinOp::Div => arithmetic::div(&a, &b),
                BinOp::IntDiv => arithmetic::int_div(&a, &b),
                BinOp::Mod => arithmetic::modulo(&a, &b),
                BinOp::Add => arithmetic::add(&a, &b),
                BinOp::Sub => arithmetic::sub(&a, &b),
                BinOp::Shl => bitwise::shift_left(&a, &b, settings.max_int_bits),
                BinOp::Shr => bitwise::shift_right(&a, &b),
                BinOp::And => bitwise::and(&a, &b),
                BinOp::Xor => bitwise::xor(&a, &b),
                BinOp::Or => bitwise::or(&a, &b),
            }
        }
        Expr::Call(func, call_args) => {
            let values = call_args
                .iter()
                .map(|arg| eval(arg, args, settings))
                .collect::<Result<Vec<_>, _>>()?;
            call(*func, &values)
        }
        Expr::Tuple(_) => Err(OpError::Domain(
            "a tuple can only be the whole result".into(),
        )),
    }
}

fn call(func: Func, values: &[Number]) -> Result<Number, OpError> {
    let first = values
        .first()
        .ok_or(OpError::Arity { needed: 1, available: 0 })?;

    match func {
        Func::Abs => Ok(match first {
            Number::Int(i) => Number::Int(i.abs()),
            Number::Float(f) => Number::Float(f.abs()),
        }),
        Func::Min => pick(values, Ordering::Less),
        Func::Max => pick(values, Ordering::Greater),
        Func::Int => first.to_int().map(Number::Int),
        Func::Float => first.to_f64().map(Number::Float),
        Func::Round => round_to_int(first, f64::round_ties_even),
        Func::Floor => round_to_int(first, f64::floor),
        Func::Ceil => round_to_int(first, f64::ceil),
        Func::Sqrt => {
            let x = first.to_f64()?;
            if x < 0.0 {
                return Err(OpError::Domain("square root of a negative number".into()));
            }
            Ok(Number::Float(x.sqrt()))
        }
        Func::Exp => {
            let result = first.to_f64()?.exp();
            if result.is_infinite() {
                return Err(OpError::Overflow("exp result out of range".into()));
            }
            Ok(Number::Float(result))
        }
        Func::Log => {
            let x = positive(first)?;
            match values.get(1) {
                None => Ok(Number::Float(x.ln())),
                Some(base) => {
                    let base = positive(base)?;
                    if base == 1.0 {
                        return Err(OpError::DivisionByZero);
                    }
                    Ok(Number::Float(x.ln() / base.ln()))
                }
            }
        }
        Func::Log2 => Ok(Number::Float(positive(first)?.log2())),
        Func::Log10 => Ok(Number::Float(positive(first)?.log10())),
        Func::Sin => finite(first).map(|x| Number::Float(x.sin())),
        Func::Cos => finite(first).map(|x| Number::Float(x.cos())),
        Func::Tan => finite(first).map(|x| Number::Float(x.tan())),
    }
}

// min/max return the winning argument unchanged, keeping its type
fn pick(values: &[Number], want: Ordering) -> Result<Number, OpError> {
    let mut best = &values[0];
    for candidate in &values[1..] {
        if compare(candidate, best)? == want {
            best = candidate;
        }
    }
    Ok(best.clone())
}

fn compare(a: &Number, b: &Number) -> Result<Ordering, OpError> {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Ok(x.cmp(y)),
        _ => Ok(a.to_f64()?.partial_cmp(&b.to_f64()?).unwrap_or(Ordering::Equal)),
    }
}

fn round_to_int(value: &Number, round: fn(f64) -> f64) -> Result<Number, OpError> {
    match value {
        Number::Int(_) => Ok(value.clone()),
        Number::Float(f) if !f.is_finite() => Err(OpError::Overflow(
            "cannot round a non-finite float to an integer".into(),
        )),
        Number::Float(f) => BigInt::from_f64(round(*f))
            .map(Number::Int)
            .ok_or_else(|| OpError::Overflow("float too large to round".into())),
    }
}

fn positive(value: &Number) -> Result<f64, OpError> {
    let x = value.to_f64()?;
    if x > 0.0 {
        Ok(x)
    } else {
        Err(OpError::Domain("logarithm of a non-positive number".into()))
    }
}

fn finite(value: &Number) -> Result<f64, OpError> {
    let x = value.to_f64()?;
    if x.is_finite() {
        Ok(x)
    } else {
        Err(OpError::Domain("trigonometry of a non-finite number".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(source: &str, args: &[Number]) -> Result<Vec<Number>, OpError> {
        Lambda::parse(source)?.call(args, &Settings::default())
    }

    fn int(v: i64) -> Number {
        Number::from(v)
    }

    #[test]
    fn test_arity_comes_from_params() {
        assert_eq!(Lambda::parse("x, y, z: x").unwrap().arity(), 3);
        assert_eq!(Lambda::parse("x: x").unwrap().arity(), 1);
        assert_eq!(Lambda::parse(": 42").unwrap().arity(), 0);
    }

    #[rstest]
    #[case("x, y: x * y + 1", &[3, 4], 13)]
    #[case("x: -x ** 2", &[3], -9)]
    #[case("x: 2 ** x ** 2", &[2], 16)]
    #[case("x, y: x - y - 1", &[10, 3], 6)]
    #[case("x: x << 2 | 1", &[1], 5)]
    #[case("x: x & 0xf ^ 0b1", &[0x3c], 0xd)]
    #[case("x: ~x", &[0], -1)]
    #[case("x, y: x // y", &[-7, 2], -4)]
    #[case("x, y: (x + y) % 5", &[4, 4], 3)]
    #[case("a, b: max(a, b, 1_000)", &[4, 5000], 5000)]
    #[case("x: int(x / 2)", &[7], 3)]
    #[case("x: math.floor(x)", &[7], 7)]
    fn test_integer_bodies(#[case] source: &str, #[case] args: &[i64], #[case] expected: i64) {
        let args: Vec<Number> = args.iter().map(|&a| int(a)).collect();
        assert_eq!(run(source, &args).unwrap(), vec![int(expected)]);
    }

    #[test]
    fn test_power_of_negative_exponent_is_float() {
        assert_eq!(run("x: 2 ** -x", &[int(1)]).unwrap(), vec![Number::Float(0.5)]);
    }

    #[test]
    fn test_float_bodies() {
        assert_eq!(run("x: sqrt(x)", &[int(16)]).unwrap(), vec![Number::Float(4.0)]);
        assert_eq!(run("x: x * 1.5e1", &[int(2)]).unwrap(), vec![Number::Float(30.0)]);
        assert_eq!(run("r: round(r * pi)", &[int(1)]).unwrap(), vec![int(3)]);
        assert_eq!(run("x: log(x, 2)", &[int(8)]).unwrap(), vec![Number::Float(3.0)]);
    }

    #[test]
    fn test_tuple_results() {
        assert_eq!(run("a, b: (b, a)", &[int(1), int(2)]).unwrap(), vec![int(2), int(1)]);
        assert_eq!(run("a: (a, a + 1,)", &[int(1)]).unwrap(), vec![int(1), int(2)]);
        assert!(run("a: ()", &[int(1)]).unwrap().is_empty());
        assert!(matches!(run("a: (a, a) + 1", &[int(1)]), Err(OpError::Domain(_))));
    }

    #[rstest]
    #[case("x x: x")]
    #[case("x, x: x")]
    #[case("x")]
    #[case("x: y")]
    #[case("x: x +")]
    #[case("x: (x")]
    #[case("x: x $ 1")]
    #[case("x: sqrt(x, x)")]
    #[case("x: open(x)")]
    #[case("x: __import__")]
    #[case("x: 1 2")]
    #[case("x: 0xzz")]
    fn test_malformed_definitions(#[case] source: &str) {
        assert!(Lambda::parse(source).is_err(), "{source:?} should be rejected");
    }

    #[test]
    fn test_deep_nesting_is_refused() {
        let source = format!("x: {}x{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(Lambda::parse(&source), Err(LambdaError::TooDeep));
    }

    #[test]
    fn test_long_flat_chain_is_refused() {
        let source = format!("x: x{}", "+x".repeat(10_000));
        assert_eq!(Lambda::parse(&source), Err(LambdaError::TooDeep));

        let source = format!("x: {}", vec!["x"; 10_000].join(" * 1 - "));
        assert_eq!(Lambda::parse(&source), Err(LambdaError::TooDeep));
    }

    #[test]
    fn test_moderate_chain_evaluates() {
        let source = format!("x: x{}", "+x".repeat(99));
        assert_eq!(run(&source, &[int(3)]).unwrap(), vec![int(300)]);
    }

    #[test]
    fn test_runtime_failures() {
        assert_eq!(run("x: 1 / x", &[int(0)]), Err(OpError::DivisionByZero));
        assert!(matches!(run("x: sqrt(x)", &[int(-1)]), Err(OpError::Domain(_))));
        assert!(matches!(run("x: log(x)", &[int(0)]), Err(OpError::Domain(_))));
    }
}

//! Parser for rendered expressions.
//!
//! Grammar (usual precedence, `**`/`^` right associative):
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := atom (('**' | '^') unary)?
//! atom    := number | identifier | '(' sum ')'
//! ```
//!
//! Decimal literals are read exactly (`0.25` is `1/4`). Division and negative
//! exponents need single-term operands.

use std::str::FromStr;
use std::sync::OnceLock;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;
use regex_lite::Regex;

use super::expr::{Expr, ExprError};
use super::symbol::Symbol;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(BigRational),
    Ident(String),
    Op(&'static str),
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?:(?P<num>[0-9]+(?:\.[0-9]+)?)|(?P<ident>[A-Za-z_][A-Za-z0-9_]*)|(?P<op>\*\*|[-+*/^()]))")
            .expect("token pattern is a valid regex")
    })
}

fn parse_error(offset: usize, message: impl Into<String>) -> ExprError {
    ExprError::Parse {
        offset,
        message: message.into(),
    }
}

fn decimal(text: &str, offset: usize) -> Result<BigRational, ExprError> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let digits = format!("{whole}{fraction}");
    let numer = BigInt::from_str(&digits).map_err(|e| parse_error(offset, e.to_string()))?;
    let denom = BigInt::from(10u32).pow(fraction.len() as u32);
    Ok(BigRational::new(numer, denom))
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let pattern = token_pattern();
    let mut tokens = Vec::new();
    let mut offset = 0;
    while offset < input.len() {
        let rest = &input[offset..];
        if rest.trim().is_empty() {
            break;
        }
        let captures = pattern
            .captures(rest)
            .ok_or_else(|| parse_error(offset, format!("unexpected input '{}'", rest.trim_start())))?;
        let whole = captures.get(0).map_or(0, |m| m.end());
        let token = if let Some(m) = captures.name("num") {
            Token::Number(decimal(m.as_str(), offset + m.start())?)
        } else if let Some(m) = captures.name("ident") {
            Token::Ident(m.as_str().to_string())
        } else if let Some(m) = captures.name("op") {
            let op = match m.as_str() {
                "**" | "^" => "**",
                "+" => "+",
                "-" => "-",
                "*" => "*",
                "/" => "/",
                "(" => "(",
                _ => ")",
            };
            Token::Op(op)
        } else {
            return Err(parse_error(offset, "unrecognized token"));
        };
        let start = ["num", "ident", "op"]
            .iter()
            .find_map(|name| captures.name(name))
            .map_or(offset, |m| offset + m.start());
        tokens.push((start, token));
        offset += whole;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    position: usize,
    end: usize,
}

impl Parser {
    fn peek_op(&self) -> Option<&'static str> {
        match self.tokens.get(self.position) {
            Some((_, Token::Op(op))) => Some(*op),
            _ => None,
        }
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.position).map_or(self.end, |(o, _)| *o)
    }

    fn sum(&mut self) -> Result<Expr, ExprError> {
        let mut value = self.product()?;
        while let Some(op @ ("+" | "-")) = self.peek_op() {
            self.position += 1;
            let rhs = self.product()?;
            if op == "+" {
                value += rhs;
            } else {
                value -= rhs;
            }
        }
        Ok(value)
    }

    fn product(&mut self) -> Result<Expr, ExprError> {
        let mut value = self.unary()?;
        while let Some(op @ ("*" | "/")) = self.peek_op() {
            self.position += 1;
            let rhs = self.unary()?;
            value = if op == "*" {
                value.checked_mul(&rhs)?
            } else {
                value.checked_div(&rhs)?
            };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        match self.peek_op() {
            Some("-") => {
                self.position += 1;
                Ok(-self.unary()?)
            }
            Some("+") => {
                self.position += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.atom()?;
        if self.peek_op() != Some("**") {
            return Ok(base);
        }
        self.position += 1;
        let exponent = self.unary()?;
        let integer = exponent
            .as_constant()
            .filter(|c| c.is_integer())
            .and_then(|c| c.to_integer().to_i32())
            .ok_or_else(|| ExprError::NonIntegerExponent(exponent.to_string()))?;
        base.powi(integer)
    }

    fn atom(&mut self) -> Result<Expr, ExprError> {
        let offset = self.offset();
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or_else(|| parse_error(offset, "unexpected end of input"))?;
        self.position += 1;
        match token.1 {
            Token::Number(value) => Ok(Expr::constant(value)),
            Token::Ident(name) => Ok(Expr::symbol(Symbol::new(name))),
            Token::Op("(") => {
                let inner = self.sum()?;
                if self.peek_op() != Some(")") {
                    return Err(parse_error(self.offset(), "expected ')'"));
                }
                self.position += 1;
                Ok(inner)
            }
            Token::Op(op) => Err(parse_error(offset, format!("unexpected '{op}'"))),
        }
    }
}

impl Expr {
    /// Parse an expression from text.
    ///
    /// Accepts everything [`Display`](std::fmt::Display) produces, so
    /// `Expr::parse(&e.to_string()) == Ok(e)`.
    pub fn parse(input: &str) -> Result<Expr, ExprError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens,
            position: 0,
            end: input.len(),
        };
        let value = parser.sum()?;
        if parser.position < parser.tokens.len() {
            return Err(parse_error(parser.offset(), "unexpected trailing input"));
        }
        Ok(value)
    }
}

impl FromStr for Expr {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expr::parse(s)
    }
}

impl serde::Serialize for Expr {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Expr {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Expr::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Parse a rational literal such as `3`, `-2/5` or `0.125`.
pub fn parse_rational(input: &str) -> Result<BigRational, ExprError> {
    let value = Expr::parse(input)?;
    value
        .as_constant()
        .ok_or_else(|| parse_error(0, format!("'{input}' is not a constant")))
}

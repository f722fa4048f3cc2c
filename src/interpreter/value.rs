use std::fmt::Display;

use Value::*;

use crate::{
	codegen::{Operation, float_text},
	error::interpreter::RuntimeError,
	semantic::Type,
};

/// A typed value on the operand stack or in a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Int(i64),
	Float(f64),
	Bool(bool),
	/// `'\0'` stands for the empty char `''`
	Char(char),
	Str(String),
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Int(n) => write!(f, "{n}"),
			Float(n) => write!(f, "{}", float_text(*n)),
			Bool(b) => write!(f, "{b}"),
			Char('\0') => Ok(()),
			Char(c) => write!(f, "{c}"),
			Str(s) => write!(f, "{s}"),
		}
	}
}

impl Value {
	/// The value of a freshly declared variable.
	pub fn default_for(r#type: Type) -> Self {
		match r#type {
			Type::Int => Int(0),
			Type::Float => Float(0.0),
			Type::Char => Char('\0'),
			Type::Boolean => Bool(false),
			Type::Str | Type::Void => Str(String::new()),
		}
	}

	/// Classify a `lit` operand by its spelling: `true`/`false`, digits, a quoted
	/// string or char, anything `f64` accepts, and a bare string otherwise.
	pub fn parse_literal(text: &str) -> Self {
		let quoted = |quote: char| text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote);
		match text {
			"true" => Bool(true),
			"false" => Bool(false),
			_ if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
				text.parse().map_or_else(|_| text.parse().map_or_else(|_| Str(text.to_string()), Float), Int)
			}
			_ if quoted('"') => Str(text[1..text.len() - 1].to_string()),
			_ if quoted('\'') => Char(text[1..text.len() - 1].chars().next().unwrap_or('\0')),
			_ => text.parse().map_or_else(|_| Str(text.to_string()), Float),
		}
	}

	/// Type an input line: integer, then float, then string.
	pub fn parse_input(line: &str) -> Self {
		let line = line.trim();
		line.parse().map(Int).or_else(|_| line.parse().map(Float)).unwrap_or_else(|_| Str(line.to_string()))
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			Int(_) => "integer",
			Float(_) => "float",
			Bool(_) => "boolean",
			Char(_) => "char",
			Str(_) => "string",
		}
	}

	/// `1` for true, `0` for false.
	pub fn from_flag(flag: bool) -> Self { Int(i64::from(flag)) }

	/// The text `jmc` compares, with booleans written as `1` and `0`.
	pub fn flag(&self) -> String {
		match self {
			Bool(b) => u8::from(*b).to_string(),
			other => canonical_flag(&other.to_string()).to_string(),
		}
	}

	pub fn is_truthy(&self) -> bool {
		match self {
			Int(n) => *n != 0,
			Float(n) => *n != 0.0,
			Bool(b) => *b,
			Char(c) => *c != '\0',
			Str(s) => s == "true",
		}
	}

	/// Numeric view used by comparisons.
	pub fn number(&self) -> Result<f64, RuntimeError> {
		match self {
			Int(n) => Ok(*n as f64),
			Float(n) => Ok(*n),
			Bool(b) => Ok(f64::from(u8::from(*b))),
			other => {
				let text = other.to_string();
				text.trim().parse().map_err(|_| RuntimeError::MalformedOperand(text))
			}
		}
	}

	/// `+ - * /` with promotion: strings and chars only concatenate, any float operand
	/// makes a float, two ints stay int.
	pub fn arithmetic(&self, operation: Operation, right: &Self) -> Result<Self, RuntimeError> {
		let invalid = || RuntimeError::InvalidOperation(format!("{} {} {}", self.type_name(), symbol(operation), right.type_name()));
		Ok(match (self, right) {
			(Str(_) | Char(_), _) | (_, Str(_) | Char(_)) => match operation {
				Operation::Add => Str(format!("{self}{right}")),
				_ => return Err(invalid()),
			},
			(Bool(_), _) | (_, Bool(_)) => return Err(invalid()),
			(Int(l), Int(r)) => Int(match operation {
				Operation::Add => l.wrapping_add(*r),
				Operation::Sub => l.wrapping_sub(*r),
				Operation::Mul => l.wrapping_mul(*r),
				Operation::Div if *r == 0 => return Err(RuntimeError::DivisionByZero),
				Operation::Div => l.wrapping_div(*r),
				_ => return Err(invalid()),
			}),
			(l, r) => {
				let (l, r) = (l.number()?, r.number()?);
				Float(match operation {
					Operation::Add => l + r,
					Operation::Sub => l - r,
					Operation::Mul => l * r,
					Operation::Div => l / r,
					_ => return Err(invalid()),
				})
			}
		})
	}
}

fn symbol(operation: Operation) -> &'static str {
	match operation {
		Operation::Add => "+",
		Operation::Sub => "-",
		Operation::Mul => "*",
		Operation::Div => "/",
		_ => "?",
	}
}

/// `true` and `false` written as `1` and `0`, other text unchanged.
pub fn canonical_flag(text: &str) -> &str {
	match text {
		"true" => "1",
		"false" => "0",
		other => other,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn literal_classification() {
		assert_eq!(Value::parse_literal("true"), Bool(true));
		assert_eq!(Value::parse_literal("42"), Int(42));
		assert_eq!(Value::parse_literal("2.5"), Float(2.5));
		assert_eq!(Value::parse_literal("\"a, b\""), Str("a, b".to_string()));
		assert_eq!(Value::parse_literal("'x'"), Char('x'));
		assert_eq!(Value::parse_literal("''"), Char('\0'));
		assert_eq!(Value::parse_literal("\"\""), Str(String::new()));
		assert_eq!(Value::parse_literal("hello"), Str("hello".to_string()));
		assert_eq!(Value::parse_literal("99999999999999999999"), Float(1e20));
	}

	#[test]
	fn display() {
		assert_eq!(Float(3.0).to_string(), "3.0");
		assert_eq!(Float(0.25).to_string(), "0.25");
		assert_eq!(Char('\0').to_string(), "");
		assert_eq!(Bool(false).to_string(), "false");
	}

	#[test]
	fn promotion() {
		assert_eq!(Int(7).arithmetic(Operation::Div, &Int(2)), Ok(Int(3)));
		assert_eq!(Int(7).arithmetic(Operation::Div, &Float(2.0)), Ok(Float(3.5)));
		assert_eq!(Str("n=".to_string()).arithmetic(Operation::Add, &Int(1)), Ok(Str("n=1".to_string())));
		assert_eq!(Char('a').arithmetic(Operation::Add, &Char('b')), Ok(Str("ab".to_string())));
		assert_eq!(Int(1).arithmetic(Operation::Div, &Int(0)), Err(RuntimeError::DivisionByZero));
		assert_eq!(
			Str("a".to_string()).arithmetic(Operation::Sub, &Int(1)),
			Err(RuntimeError::InvalidOperation("string - integer".to_string()))
		);
		assert!(Bool(true).arithmetic(Operation::Add, &Int(1)).is_err());
	}

	#[test]
	fn flags_and_truthiness() {
		assert_eq!(Bool(true).flag(), "1");
		assert_eq!(Int(0).flag(), "0");
		assert_eq!(Str("false".to_string()).flag(), "0");
		assert!(Str("true".to_string()).is_truthy());
		assert!(!Str("yes".to_string()).is_truthy());
		assert!(Float(0.5).is_truthy());
		assert_eq!(canonical_flag("true"), "1");
	}

	#[test]
	fn inputs() {
		assert_eq!(Value::parse_input(" 12 "), Int(12));
		assert_eq!(Value::parse_input("1.5"), Float(1.5));
		assert_eq!(Value::parse_input("bob"), Str("bob".to_string()));
		assert_eq!(Str("2.5".to_string()).number(), Ok(2.5));
		assert!(Str("x".to_string()).number().is_err());
	}
}

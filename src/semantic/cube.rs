//! The type compatibility cube: `(left type, right type, operator) → result type`.
//!
//! Unary `!` is checked as `(t, t, !)`. Assignment is checked as
//! `(target, value, =)` and yields the target type.
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
	Int,
	Float,
	Char,
	Str,
	Boolean,
	Void,
}

impl Type {
	/// The type named by a type keyword.
	pub fn from_keyword(keyword: &str) -> Option<Self> {
		Some(match keyword {
			"int" => Self::Int,
			"float" => Self::Float,
			"char" => Self::Char,
			"string" => Self::Str,
			"boolean" => Self::Boolean,
			"void" => Self::Void,
			_ => return None,
		})
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Int => "int",
			Self::Float => "float",
			Self::Char => "char",
			Self::Str => "string",
			Self::Boolean => "boolean",
			Self::Void => "void",
		}
	}

	/// Initial value of a freshly declared variable, as written in bytecode.
	pub fn default_value(self) -> &'static str {
		match self {
			Self::Int => "0",
			Self::Float => "0.0",
			Self::Char => "''",
			Self::Str => "\"\"",
			Self::Boolean => "false",
			Self::Void => "",
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.as_str()) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
	Add,
	Sub,
	Mul,
	Div,
	And,
	Or,
	Not,
	Greater,
	Less,
	Equal,
	NotEqual,
	Assign,
}

impl Operator {
	pub fn from_symbol(symbol: &str) -> Option<Self> {
		use Operator::*;
		Some(match symbol {
			"+" => Add,
			"-" => Sub,
			"*" => Mul,
			"/" => Div,
			"&&" => And,
			"||" => Or,
			"!" => Not,
			">" => Greater,
			"<" => Less,
			"==" => Equal,
			"!=" => NotEqual,
			"=" => Assign,
			_ => return None,
		})
	}

	pub fn symbol(self) -> &'static str {
		use Operator::*;
		match self {
			Add => "+",
			Sub => "-",
			Mul => "*",
			Div => "/",
			And => "&&",
			Or => "||",
			Not => "!",
			Greater => ">",
			Less => "<",
			Equal => "==",
			NotEqual => "!=",
			Assign => "=",
		}
	}
}

impl Display for Operator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.symbol()) }
}

/// Result type of `left operator right`, `None` if the combination is invalid.
#[rustfmt::skip]
pub fn cube(left: Type, right: Type, operator: Operator) -> Option<Type> {
	use Operator::*;
	use Type::*;
	match (operator, left, right) {
		(Add, Str, Int | Float | Char | Str | Boolean) | (Add, Int | Float | Char | Boolean, Str) => Some(Str),
		(Add | Sub | Mul | Div, Int, Int) => Some(Int),
		(Add | Sub | Mul | Div, Int | Float, Int | Float) => Some(Float),
		(And | Or | Not, Boolean, Boolean) => Some(Boolean),
		(Greater | Less, Int | Float, Int | Float) => Some(Boolean),
		(Equal | NotEqual, left, right) if left == right && left != Void => Some(Boolean),
		(Assign, Float, Int) => Some(Float),
		(Assign, left, right) if left == right && left != Void => Some(left),
		_ => None,
	}
}

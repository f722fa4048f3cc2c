use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
	/// Push a literal
	Lit,
	/// Push a variable's value
	Lod,
	/// Pop into a variable
	Sto,
	/// Unconditional jump
	Jmp,
	/// Pop, jump if the value matches the second parameter
	Jmc,
	/// Operation selected by [`Operation`]
	Opr,
}

impl Opcode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lit => "lit",
			Self::Lod => "lod",
			Self::Sto => "sto",
			Self::Jmp => "jmp",
			Self::Jmc => "jmc",
			Self::Opr => "opr",
		}
	}
}

impl Display for Opcode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.as_str()) }
}

impl FromStr for Opcode {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.to_ascii_lowercase().as_str() {
			"lit" => Self::Lit,
			"lod" => Self::Lod,
			"sto" => Self::Sto,
			"jmp" => Self::Jmp,
			"jmc" => Self::Jmc,
			"opr" => Self::Opr,
			_ => return Err(anyhow!("Unknown opcode '{s}'")),
		})
	}
}

/// Operation codes of `opr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
	Halt = 0,
	Return = 1,
	Add = 2,
	Sub = 3,
	Mul = 4,
	Div = 5,
	Or = 8,
	And = 9,
	Not = 10,
	Greater = 11,
	Less = 12,
	Equal = 15,
	NotEqual = 16,
	Print = 20,
	PrintLine = 21,
	Read = 22,
}

impl Operation {
	pub fn code(self) -> i64 { self as i64 }

	#[rustfmt::skip]
	pub fn from_code(code: i64) -> Option<Self> {
		use Operation::*;
		[Halt, Return, Add, Sub, Mul, Div, Or, And, Not, Greater, Less, Equal, NotEqual, Print, PrintLine, Read]
			.into_iter()
			.find(|operation| operation.code() == code)
	}
}

/// One stack machine instruction, written `opcode param1, param2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
	pub opcode: Opcode,
	pub param1: String,
	pub param2: String,
}

impl Instruction {
	pub fn new(opcode: Opcode, param1: impl Into<String>, param2: impl Into<String>) -> Self {
		Self { opcode, param1: param1.into(), param2: param2.into() }
	}

	pub fn operation(operation: Operation) -> Self { Self::new(Opcode::Opr, operation.code().to_string(), "0") }
}

impl Display for Instruction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}, {}", self.opcode, self.param1, self.param2)
	}
}

/// Parses `opcode param1, param2`. Parameters split at the last comma so string
/// literals may contain commas.
impl FromStr for Instruction {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (opcode, parameters) = s.trim().split_once(' ').ok_or_else(|| anyhow!("Missing parameters"))?;
		let (param1, param2) = parameters.rsplit_once(',').ok_or_else(|| anyhow!("Missing ',' between parameters"))?;
		Ok(Self::new(opcode.parse()?, param1.trim(), param2.trim()))
	}
}

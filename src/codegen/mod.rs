//! Emission of stack machine code.
//!
//! The parser drives the generator one instruction at a time. Jump targets are
//! symbolic labels (`#label1`, `#label2`, ...) placed as markers in the emitted stream.
//! Assembly resolves every marker to the 1-based number of the instruction that
//! follows it, declares the label as an `int` variable holding that number and drops
//! the marker:
//!
//! ``` text
//! i, int, global, 0
//! #label1, int, global, 3
//! #label2, int, global, 8
//! @
//! lit 0, 0
//! sto i, 0
//! lod i, 0          <- 3, #label1
//! lit 3, 0
//! opr 12, 0
//! jmc #label2, 0
//! jmp #label1, 0
//! opr 0, 0          <- 8, #label2
//! ```
mod instruction;

use std::fmt::Display;

use indexmap::IndexMap;
pub use instruction::{Instruction, Opcode, Operation};
use log::debug;

use crate::{
	scanner::{Token, TokenKind},
	semantic::{GLOBAL, Symbol, SymbolTable, Type},
};

/// An emitted instruction or a label marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
	Instruction(Instruction),
	Label(String),
}

#[derive(Debug, Default)]
pub struct CodeGenerator {
	code:   Vec<Emitted>,
	labels: usize,
}

impl CodeGenerator {
	pub fn new() -> Self { Self::default() }

	fn emit(&mut self, instruction: Instruction) {
		debug!("emit {instruction}");
		self.code.push(Emitted::Instruction(instruction));
	}

	pub fn literal(&mut self, value: &str) { self.emit(Instruction::new(Opcode::Lit, value, "0")); }

	pub fn load(&mut self, name: &str) { self.emit(Instruction::new(Opcode::Lod, name, "0")); }

	pub fn store(&mut self, name: &str) { self.emit(Instruction::new(Opcode::Sto, name, "0")); }

	pub fn jump(&mut self, label: &str) { self.emit(Instruction::new(Opcode::Jmp, label, "0")); }

	/// Pop the condition and jump when it is `when`.
	pub fn jump_if(&mut self, label: &str, when: bool) {
		self.emit(Instruction::new(Opcode::Jmc, label, if when { "1" } else { "0" }));
	}

	pub fn operation(&mut self, operation: Operation) { self.emit(Instruction::operation(operation)); }

	/// A fresh label name.
	pub fn generate_label(&mut self) -> String {
		self.labels += 1;
		format!("#label{}", self.labels)
	}

	/// Mark the position of the next emitted instruction as `label`.
	pub fn add_label(&mut self, label: &str) { self.code.push(Emitted::Label(label.to_string())); }

	/// Position usable with [`CodeGenerator::split_off`].
	pub fn mark(&self) -> usize { self.code.len() }

	/// Take back everything emitted since `mark`.
	pub fn split_off(&mut self, mark: usize) -> Vec<Emitted> { self.code.split_off(mark.min(self.code.len())) }

	/// Re-emit code taken with [`CodeGenerator::split_off`].
	pub fn append(&mut self, mut code: Vec<Emitted>) { self.code.append(&mut code); }

	pub fn code(&self) -> &[Emitted] { &self.code }

	/// Build the final program from the emitted code and the declared symbols.
	pub fn assemble(&self, symbols: &SymbolTable) -> Program {
		let labels = resolve_labels(&self.code);
		let mut instructions: Vec<Instruction> = self
			.code
			.iter()
			.filter_map(|emitted| match emitted {
				Emitted::Instruction(instruction) => Some(instruction.clone()),
				Emitted::Label(_) => None,
			})
			.collect();
		instructions.push(Instruction::operation(Operation::Halt));
		Program { declarations: symbols.iter().map(Symbol::declaration).collect(), labels, instructions }
	}
}

/// Map every label to the 1-based number of the instruction it precedes.
pub fn resolve_labels(code: &[Emitted]) -> IndexMap<String, usize> {
	let mut labels = IndexMap::new();
	let mut next = 1;
	for emitted in code {
		match emitted {
			Emitted::Instruction(_) => next += 1,
			Emitted::Label(label) => {
				labels.insert(label.clone(), next);
			}
		}
	}
	labels
}

/// An assembled bytecode program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
	/// `name, type, scope, default` lines
	pub declarations: Vec<String>,
	pub labels:       IndexMap<String, usize>,
	/// Instructions, the last one always halts
	pub instructions: Vec<Instruction>,
}

impl Program {
	/// Labels as symbol table rows.
	pub fn label_symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
		self.labels.iter().map(|(label, target)| {
			let mut symbol = Symbol::new(label, Type::Int, GLOBAL);
			symbol.value = target.to_string();
			symbol
		})
	}
}

impl Display for Program {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for declaration in &self.declarations {
			writeln!(f, "{declaration}")?;
		}
		for (label, target) in &self.labels {
			writeln!(f, "{label}, int, {GLOBAL}, {target}")?;
		}
		writeln!(f, "@")?;
		for instruction in &self.instructions {
			writeln!(f, "{instruction}")?;
		}
		Ok(())
	}
}

/// The text a literal token is loaded with. Hexadecimal, binary and octal literals
/// become decimal integers and floats always carry a fraction, so the virtual machine
/// can classify them by their spelling alone.
pub fn literal_text(token: &Token) -> String {
	let value = token.value.as_str();
	let radix = |digits: &str, radix: u32| {
		i64::from_str_radix(digits, radix).map_or_else(|_| value.to_string(), |n| n.to_string())
	};
	match token.kind {
		TokenKind::Hexadecimal => radix(&value[2..], 16),
		TokenKind::Binary => radix(&value[2..], 2),
		TokenKind::Octal => radix(value, 8),
		TokenKind::Integer if value.contains(['e', 'E']) => {
			let exact = value.parse::<f64>().ok().filter(|n| n.abs() < i64::MAX as f64);
			exact.map_or_else(|| value.to_string(), |n| (n.trunc() as i64).to_string())
		}
		TokenKind::Float => {
			let digits = value.trim_end_matches(['f', 'F']);
			digits.parse::<f64>().map_or_else(|_| value.to_string(), float_text)
		}
		_ => value.to_string(),
	}
}

/// Float text with at least one fractional digit.
pub fn float_text(n: f64) -> String {
	if n.is_finite() && n.fract() == 0.0 { format!("{n:.1}") } else { n.to_string() }
}

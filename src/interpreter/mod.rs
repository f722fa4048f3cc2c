//! The stack machine that runs assembled bytecode.
//!
//! Loading reads the declarations above the `@` separator into the variable table and
//! parses every following line as an [`Instruction`]. Execution then steps a 0-based
//! program counter over the instructions with a typed operand stack.
//!
//! Jump targets are 1-based instruction numbers, written literally or as the name of
//! a label variable holding the number. Jumping to `n` continues at index `n - 1`;
//! `n` one past the last instruction ends the program.
//!
//! Besides the printed output the machine keeps a console log of loading, every
//! executed instruction, input handling and termination.
pub mod value;

use std::collections::VecDeque;

use log::{debug, info, warn};
pub use value::Value;

use crate::{
	codegen::{Instruction, Opcode, Operation},
	environment::Environment,
	error::interpreter::{LoadError, RuntimeError},
	semantic::Type,
};

/// Execution settings.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
	/// Lines returned by successive reads, a read past the end yields `0`
	pub input:      Vec<String>,
	/// Abort after this many executed instructions
	pub step_limit: Option<u64>,
}

/// The outcome of one run.
#[derive(Debug, Clone)]
pub struct Execution {
	/// Everything printed by the program
	pub output:    String,
	pub console:   Vec<String>,
	/// Final variable table
	pub variables: Environment,
	/// The fault that stopped the program, if any
	pub error:     Option<RuntimeError>,
	/// Whether the program stopped on `opr 0`
	pub halted:    bool,
}

impl Execution {
	pub fn output_lines(&self) -> Vec<&str> { self.output.lines().collect() }
}

enum Flow {
	Next,
	Jump(usize),
	Halt,
}

pub struct Interpreter {
	program:    Vec<Instruction>,
	variables:  Environment,
	stack:      Vec<Value>,
	pc:         usize,
	input:      VecDeque<String>,
	output:     String,
	console:    Vec<String>,
	step_limit: Option<u64>,
}

impl Interpreter {
	/// Load bytecode text.
	pub fn load(bytecode: &str, config: &RunConfig) -> Result<Self, LoadError> {
		let mut interpreter = Self {
			program:    Vec::new(),
			variables:  Environment::new(),
			stack:      Vec::new(),
			pc:         0,
			input:      config.input.iter().cloned().collect(),
			output:     String::new(),
			console:    Vec::new(),
			step_limit: config.step_limit,
		};
		interpreter.log("Loading program...");

		let mut lines = bytecode.lines().enumerate().map(|(index, line)| (index + 1, line.trim()));
		let mut separated = false;
		for (line, text) in lines.by_ref() {
			if text == "@" {
				separated = true;
				break;
			}
			if !text.is_empty() {
				interpreter.declare(line, text)?;
			}
		}
		if !separated {
			return Err(LoadError::MissingSeparator);
		}

		interpreter.log("Loading instructions...");
		for (line, text) in lines.filter(|(_, text)| !text.is_empty()) {
			let instruction: Instruction =
				text.parse().map_err(|_| LoadError::MalformedInstruction { line, text: text.to_string() })?;
			interpreter.program.push(instruction);
		}
		interpreter.log("Program loaded successfully.");
		info!("Loaded {} variables and {} instructions", interpreter.variables.len(), interpreter.program.len());
		Ok(interpreter)
	}

	/// `name, type, scope, value`. Labels start with `#` and keep their value, other
	/// variables start from their type's default.
	fn declare(&mut self, line: usize, text: &str) -> Result<(), LoadError> {
		let malformed = || LoadError::MalformedDeclaration { line, text: text.to_string() };
		let fields: Vec<&str> = text.splitn(4, ',').map(str::trim).collect();
		let &[name, r#type, _, value] = fields.as_slice() else { return Err(malformed()) };
		if name.is_empty() {
			return Err(malformed());
		}
		if name.starts_with('#') {
			let target: i64 = value.parse().map_err(|_| malformed())?;
			self.variables.define(name, Type::Int, Value::Int(target));
			self.log(format!("Loading label: {name} -> {target}"));
		} else {
			let r#type = Type::from_keyword(r#type).ok_or_else(malformed)?;
			self.variables.define(name, r#type, Value::default_for(r#type));
			self.log(format!("Loading variable: {name} ({})", r#type));
		}
		Ok(())
	}

	/// Run until `opr 0`, the end of the instructions or a fault.
	pub fn run(mut self) -> Execution {
		self.log("Starting execution...");
		let mut steps = 0;
		let mut halted = false;
		let mut error = None;
		while let Some(instruction) = self.program.get(self.pc).cloned() {
			if self.step_limit.is_some_and(|limit| steps >= limit) {
				error = Some(RuntimeError::StepLimit(steps));
				break;
			}
			steps += 1;
			self.log(format!("Executing: {instruction}"));
			match self.execute(&instruction) {
				Ok(Flow::Next) => self.pc += 1,
				Ok(Flow::Jump(target)) => self.pc = target,
				Ok(Flow::Halt) => {
					halted = true;
					break;
				}
				Err(e) => {
					error = Some(e);
					break;
				}
			}
		}

		match &error {
			Some(e) => {
				warn!("Runtime error: {e}");
				self.console.push(format!("Runtime error: {e}"));
			}
			None if halted => self.log("Program terminated normally."),
			None => self.log("Program reached end of instructions."),
		}
		Execution { output: self.output, console: self.console, variables: self.variables, error, halted }
	}

	fn execute(&mut self, instruction: &Instruction) -> Result<Flow, RuntimeError> {
		let Instruction { opcode, param1, param2 } = instruction;
		match opcode {
			Opcode::Lit => self.stack.push(Value::parse_literal(param1)),
			Opcode::Lod => {
				let value = self.variables.get(param1)?.clone();
				self.stack.push(value);
			}
			Opcode::Sto => {
				let value = self.pop()?;
				self.variables.assign(param1, value)?;
			}
			Opcode::Jmp => return Ok(Flow::Jump(self.target(param1)?)),
			Opcode::Jmc => {
				let value = self.pop()?;
				if value.flag() == value::canonical_flag(param2) {
					return Ok(Flow::Jump(self.target(param1)?));
				}
			}
			Opcode::Opr => return self.operate(param1),
		}
		Ok(Flow::Next)
	}

	#[rustfmt::skip]
	fn operate(&mut self, code: &str) -> Result<Flow, RuntimeError> {
		use Operation::*;
		let code: i64 = code.parse().map_err(|_| RuntimeError::MalformedOperand(code.to_string()))?;
		let operation = Operation::from_code(code).ok_or(RuntimeError::UnknownOperation(code))?;
		match operation {
			Halt => return Ok(Flow::Halt),
			Return => {}
			Add | Sub | Mul | Div => {
				let (left, right) = self.pop_pair()?;
				self.stack.push(left.arithmetic(operation, &right)?);
			}
			Or | And => {
				let (left, right) = self.pop_pair()?;
				let result = if operation == Or { left.is_truthy() || right.is_truthy() } else { left.is_truthy() && right.is_truthy() };
				self.stack.push(Value::from_flag(result));
			}
			Not => {
				let value = self.pop()?;
				self.stack.push(Value::from_flag(!value.is_truthy()));
			}
			Greater | Less => {
				let (left, right) = self.pop_pair()?;
				let (left, right) = (left.number()?, right.number()?);
				self.stack.push(Value::from_flag(if operation == Greater { left > right } else { left < right }));
			}
			Equal | NotEqual => {
				let (left, right) = self.pop_pair()?;
				let equal = match (&left, &right) {
					(Value::Bool(_), _) | (_, Value::Bool(_)) => left.flag() == right.flag(),
					_ => left.to_string() == right.to_string(),
				};
				self.stack.push(Value::from_flag(if operation == Equal { equal } else { !equal }));
			}
			Print | PrintLine => {
				let value = self.pop()?;
				debug!("output {value}");
				self.output.push_str(&value.to_string());
				if operation == PrintLine {
					self.output.push('\n');
				}
			}
			Read => {
				let line = self.input.pop_front().unwrap_or_else(|| "0".to_string());
				let value = Value::parse_input(&line);
				self.log(format!("INPUT processed as {}: {value}", value.type_name()));
				self.stack.push(value);
			}
		}
		Ok(Flow::Next)
	}

	/// Resolve a 1-based jump target to an instruction index.
	fn target(&self, operand: &str) -> Result<usize, RuntimeError> {
		let number = match operand.parse::<i64>() {
			Ok(number) => number,
			Err(_) => match self.variables.get(operand)? {
				Value::Int(number) => *number,
				_ => return Err(RuntimeError::MalformedOperand(operand.to_string())),
			},
		};
		match usize::try_from(number - 1) {
			Ok(index) if index <= self.program.len() => Ok(index),
			_ => Err(RuntimeError::InvalidJump(number)),
		}
	}

	fn pop(&mut self) -> Result<Value, RuntimeError> { self.stack.pop().ok_or(RuntimeError::StackUnderflow(self.pc + 1)) }

	/// Pop the right operand, then the left one.
	fn pop_pair(&mut self) -> Result<(Value, Value), RuntimeError> {
		let right = self.pop()?;
		let left = self.pop()?;
		Ok((left, right))
	}

	fn log(&mut self, line: impl Into<String>) {
		let line = line.into();
		debug!("{line}");
		self.console.push(line);
	}
}

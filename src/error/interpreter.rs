/// Faults that abort execution of the virtual machine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
	#[error("Stack underflow at instruction {0}")]
	StackUnderflow(usize),
	#[error("Variable '{0}' is not defined")]
	UndefinedVariable(String),
	#[error("Malformed operand '{0}'")]
	MalformedOperand(String),
	#[error("Division by zero")]
	DivisionByZero,
	#[error("Invalid operation: {0}")]
	InvalidOperation(String),
	#[error("Unknown operation {0}")]
	UnknownOperation(i64),
	#[error("Jump target {0} is out of range")]
	InvalidJump(i64),
	#[error("Step limit of {0} instructions exceeded")]
	StepLimit(u64),
}

/// Bytecode text that cannot be loaded.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoadError {
	#[error("line {line}: malformed declaration '{text}'")]
	MalformedDeclaration { line: usize, text: String },
	#[error("line {line}: malformed instruction '{text}'")]
	MalformedInstruction { line: usize, text: String },
	#[error("missing '@' separator between declarations and instructions")]
	MissingSeparator,
}

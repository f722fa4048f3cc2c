pub mod interpreter;
pub mod parser;
pub mod semantic;

/// MinicError is the top-level error type for the compiler and virtual machine.
#[derive(thiserror::Error, Debug)]
pub enum MinicError {
	/// Internal compiler error, should never happen
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// The scanner produced unrecognized lexemes, parsing was skipped
	#[error("Generated {0} lexical errors")]
	LexicalErrors(usize),
	/// Bytecode text could not be loaded into the virtual machine
	#[error("Failed load bytecode: {0}")]
	LoadError(#[from] interpreter::LoadError),
	/// Execution stopped on a faulted instruction
	#[error("Runtime error: {0}")]
	RuntimeError(#[from] interpreter::RuntimeError),
}

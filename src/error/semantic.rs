use crate::semantic::{Operator, Type};

/// Semantic diagnostics. They are collected as warnings and never stop code generation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
	#[error("Variable '{name}' is already declared in scope '{scope}' at line {line}")]
	AlreadyDeclared { name: String, scope: String, line: usize },
	#[error("Variable '{name}' is not declared at line {line}")]
	Undeclared { name: String, line: usize },
	#[error("Incompatible types '{left}' and '{right}' for operator '{operator}' at line {line}")]
	IncompatibleTypes { left: Type, right: Type, operator: Operator, line: usize },
	#[error("{context} condition must be boolean, found '{found}' at line {line}")]
	NonBooleanCondition { context: String, found: Type, line: usize },
	#[error("Method '{name}' is already declared at line {line}")]
	MethodAlreadyDeclared { name: String, line: usize },
	#[error("Method '{name}' is not declared at line {line}")]
	MethodUndeclared { name: String, line: usize },
	#[error("Method '{name}' expects {expected} parameters but got {found} at line {line}")]
	ArityMismatch { name: String, expected: usize, found: usize, line: usize },
	#[error("Parameter {index} of method '{name}' expects '{expected}' but got '{found}' at line {line}")]
	ArgumentMismatch { name: String, index: usize, expected: Type, found: Type, line: usize },
	#[error("Void method cannot return a value at line {line}")]
	VoidReturnsValue { line: usize },
	#[error("Method must return a value of type '{expected}' at line {line}")]
	MissingReturnValue { expected: Type, line: usize },
	#[error("Return type mismatch: expected '{expected}' but found '{found}' at line {line}")]
	ReturnMismatch { expected: Type, found: Type, line: usize },
	#[error("Integer literal '{value}' does not fit in 64 bits at line {line}")]
	IntegerOutOfRange { value: String, line: usize },
	#[error("'break' outside of a loop or switch at line {line}")]
	BreakOutsideLoop { line: usize },
}

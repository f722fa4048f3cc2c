use std::{fs::read_to_string, path::Path};

use anyhow::Context;
use log::{info, warn};

use crate::{
	MinicError,
	interpreter::{Execution, Interpreter, RunConfig},
	parser::{Compilation, Parser},
	scanner::{Token, TokenKind, tokenize},
};

/// Everything a compile and run request produces.
#[derive(Debug, Clone)]
pub struct Report {
	pub tokens:      Vec<Token>,
	pub compilation: Compilation,
	/// `None` when syntax errors kept the program from running
	pub execution:   Option<Execution>,
}

/// Minic is the main struct for the compiler and virtual machine. Every request
/// starts from fresh state.
pub struct Minic;

impl Minic {
	pub fn tokenize_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Token>, MinicError> {
		Ok(tokenize(&read_source(path)?))
	}

	pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> Result<(Vec<Token>, Compilation), MinicError> {
		self.compile(&read_source(path)?)
	}

	/// Compile and run a source file.
	pub fn run_file<P: AsRef<Path>>(&self, path: P, config: &RunConfig) -> Result<Report, MinicError> {
		self.run(&read_source(path)?, config)
	}

	/// Run a bytecode file.
	pub fn exec_file<P: AsRef<Path>>(&self, path: P, config: &RunConfig) -> Result<Execution, MinicError> {
		let bytecode = read_to_string(path).context("Failed open bytecode file")?;
		self.execute(&bytecode, config)
	}
}

impl Minic {
	/// Scan and parse `source`. Parsing is skipped when the scanner produced `ERROR`
	/// tokens.
	pub fn compile(&self, source: &str) -> Result<(Vec<Token>, Compilation), MinicError> {
		let tokens = tokenize(source);
		let errors = tokens.iter().filter(|token| token.kind == TokenKind::Error).count();
		if errors > 0 {
			return Err(MinicError::LexicalErrors(errors));
		}
		let compilation = Parser::new(&tokens).parse();
		info!(
			"Compiled with {} syntax errors and {} semantic errors",
			compilation.syntax_errors.len(),
			compilation.semantic_errors.len()
		);
		Ok((tokens, compilation))
	}

	/// Compile `source` and run it unless it has syntax errors. Semantic errors do not
	/// keep the program from running.
	pub fn run(&self, source: &str, config: &RunConfig) -> Result<Report, MinicError> {
		let (tokens, compilation) = self.compile(source)?;
		let execution = if compilation.syntax_errors.is_empty() {
			Some(self.execute(&compilation.bytecode(), config)?)
		} else {
			warn!("Skipped execution after {} syntax errors", compilation.syntax_errors.len());
			None
		};
		Ok(Report { tokens, compilation, execution })
	}

	/// Load and run bytecode text.
	pub fn execute(&self, bytecode: &str, config: &RunConfig) -> Result<Execution, MinicError> {
		Ok(Interpreter::load(bytecode, config)?.run())
	}
}

fn read_source<P: AsRef<Path>>(path: P) -> Result<String, MinicError> {
	Ok(read_to_string(path).context("Failed open source file")?)
}

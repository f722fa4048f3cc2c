use std::{fs::read_to_string, path::PathBuf};

use anyhow::Context;
use log::LevelFilter;
use minic::{Compilation, Execution, Minic, MinicError, RunConfig, cli::*, scanner::Automaton};
use palc::Parser;
use simple_logger::SimpleLogger;

fn main() {
	if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Error).env().init() {
		eprintln!("Failed init logger: {e}");
	}
	if let Err(e) = run(&Minic, Cli::parse().mode) {
		eprintln!("{e}");
		std::process::exit(1);
	}
}

fn run(minic: &Minic, mode: Mode) -> Result<(), MinicError> {
	match mode {
		Mode::Tokens { path } => {
			for token in minic.tokenize_file(&path)? {
				println!("{token}");
			}
		}
		Mode::Parse { path } => {
			let (_, compilation) = minic.compile_file(&path)?;
			for line in &compilation.trace {
				println!("{line}");
			}
			println!();
			for symbol in compilation.symbols.iter() {
				println!("{symbol}");
			}
			print_diagnostics(&compilation);
		}
		Mode::Compile { path } => {
			let (_, compilation) = minic.compile_file(&path)?;
			print_diagnostics(&compilation);
			print!("{}", compilation.bytecode());
		}
		Mode::Run { path, input, step_limit, trace } => {
			let report = minic.run_file(&path, &config(input, step_limit)?)?;
			print_diagnostics(&report.compilation);
			match report.execution {
				Some(execution) => finish(execution, trace)?,
				None => eprintln!("Execution skipped because of syntax errors"),
			}
		}
		Mode::Exec { path, input, step_limit, trace } => {
			finish(minic.exec_file(&path, &config(input, step_limit)?)?, trace)?;
		}
		Mode::Automaton => print!("{}", Automaton::language().to_dot()),
	}
	Ok(())
}

fn config(input: Option<PathBuf>, step_limit: Option<u64>) -> Result<RunConfig, MinicError> {
	let input = match input {
		Some(path) => read_to_string(path).context("Failed open input file")?.lines().map(String::from).collect(),
		None => Vec::new(),
	};
	Ok(RunConfig { input, step_limit })
}

fn print_diagnostics(compilation: &Compilation) {
	for error in &compilation.syntax_errors {
		eprintln!("{error}");
	}
	for error in &compilation.semantic_errors {
		eprintln!("Semantic Error: {error}");
	}
}

fn finish(execution: Execution, trace: bool) -> Result<(), MinicError> {
	if trace {
		for line in &execution.console {
			eprintln!("{line}");
		}
	}
	print!("{}", execution.output);
	match execution.error {
		Some(e) => Err(e.into()),
		None => Ok(()),
	}
}

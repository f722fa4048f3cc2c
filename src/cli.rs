use std::path::PathBuf;

use palc::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "minic", after_long_help = "Compiler and stack machine for a small C-like teaching language.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Print the token table of a source file
	Tokens { path: PathBuf },
	/// Print the parse tree trace, diagnostics and symbol table of a source file
	Parse { path: PathBuf },
	/// Print the bytecode of a source file
	Compile { path: PathBuf },
	/// Compile and run a source file
	Run {
		path:       PathBuf,
		/// File whose lines feed `inputln`
		#[arg(long)]
		input:      Option<PathBuf>,
		/// Abort after this many instructions
		#[arg(long)]
		step_limit: Option<u64>,
		/// Print the machine's console log to stderr
		#[arg(long)]
		trace:      bool,
	},
	/// Run a bytecode file
	Exec {
		path:       PathBuf,
		#[arg(long)]
		input:      Option<PathBuf>,
		#[arg(long)]
		step_limit: Option<u64>,
		#[arg(long)]
		trace:      bool,
	},
	/// Print the scanner's automaton in Graphviz dot format
	Automaton,
}

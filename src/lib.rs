//! # How source text becomes bytecode and runs
//!
//! User's source code: `int total = count + 1;`

//! ## Scanning
//!
//! A hand built deterministic automaton classifies every lexeme. Operators,
//! delimiters and whitespace end a lexeme, except inside string and char literals
//! and in the middle of a number like `3.14` or `1e-3`. Keywords are identifiers
//! found in the reserved word list. Anything the automaton rejects becomes an
//! `ERROR` token instead of stopping the scan.
//!
//! The tokens are `[int, total, =, count, +, 1, ;]`.

//! ## Parsing, analysis and code generation in one pass
//!
//! A predictive recursive descent parser walks the grammar. No syntax tree is
//! built: while a rule recognizes a construct it asks the analyzer to check it
//! and the code generator to emit it. The statement above declares `total`,
//! checks `int + int` against the type cube, checks that the `int` result can be
//! stored into `total` and emits
//!
//! ``` text
//! lod count, 0
//! lit 1, 0
//! opr 2, 0
//! sto total, 0
//! ```
//!
//! A rule that finds an unexpected token reports a numbered syntax error and skips
//! to a token it can resume on, or one its caller can. The parse always completes.
//!
//! Semantic errors are warnings: code generation carries on and the program still
//! runs.

//! ## Labels
//!
//! Control flow jumps to labels. A label is a marker in the emitted code, at
//! assembly it turns into an `int` variable holding the 1-based number of the
//! instruction it marks.

//! ## Virtual machine
//!
//! The bytecode text lists declarations, a `@` separator and the instructions.
//! The machine loads it into a variable table and an instruction list, then runs
//! a typed operand stack until `opr 0`, the end of the instructions or a fault.

pub mod cli;
pub mod codegen;
pub mod environment;
pub mod error;
pub mod interpreter;
mod minic;
pub mod parser;
pub mod scanner;
pub mod semantic;

pub use error::MinicError;
pub use interpreter::{Execution, Interpreter, RunConfig, Value};
pub use minic::{Minic, Report};
pub use parser::{Compilation, Parser};
pub use scanner::{Token, TokenKind, tokenize};

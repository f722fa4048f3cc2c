use crate::scanner::Token;

/// Failures that escape a grammar rule. Recoverable mismatches never do, they are
/// reported as [`SyntaxError`] and parsing carries on. Rules check the lookahead
/// before consuming it, so reading past the last token only happens on a broken
/// rule and ends parsing with [`SyntaxError::Critical`].
#[derive(thiserror::Error, Debug)]
pub enum ParserError {
	#[error("{0}")]
	InternalError(#[from] anyhow::Error),
}

/// A numbered syntax diagnostic.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
	#[error("Syntax Error {code} at line {}, token: {} ({})", .token.line, .token.value, .token.kind)]
	At { code: u16, token: Token },
	#[error("Syntax Error {code} at end of file")]
	EndOfFile { code: u16 },
	/// An internal failure turned into a terminal diagnostic
	#[error("Critical error during parsing: {0}")]
	Critical(String),
}

impl SyntaxError {
	pub fn new(code: u16, token: Option<&Token>) -> Self {
		match token {
			Some(token) => Self::At { code, token: token.clone() },
			None => Self::EndOfFile { code },
		}
	}

	/// The diagnostic number, `None` for critical failures.
	pub fn code(&self) -> Option<u16> {
		match self {
			Self::At { code, .. } | Self::EndOfFile { code } => Some(*code),
			Self::Critical(_) => None,
		}
	}
}

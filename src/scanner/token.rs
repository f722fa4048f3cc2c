use std::{fmt::Display, str::FromStr};

use anyhow::{Context, anyhow};

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// Names of variables, methods and classes, e.g. `counter`, `$tmp`.
	Identifier,
	/// Reserved words, e.g. `while`.
	Keyword,
	/// Decimal integer literal, e.g. `42`, `1e5`.
	Integer,
	/// Floating point literal, e.g. `12.5e-3`, `3f`.
	Float,
	/// Hexadecimal literal, e.g. `0x1F`.
	Hexadecimal,
	/// Binary literal, e.g. `0b101`.
	Binary,
	/// Octal literal, a leading zero, e.g. `017`.
	Octal,
	/// Single quoted character, e.g. `'a'`.
	Char,
	/// Double quoted string, e.g. `"hello"`.
	Str,
	/// Arithmetic, relational, logical or assignment operator.
	Operator,
	/// Punctuation, e.g. `;`, `{`.
	Delimiter,
	/// A lexeme the automaton could not classify.
	Error,
}

impl TokenKind {
	pub fn as_str(self) -> &'static str {
		use TokenKind::*;
		match self {
			Identifier => "IDENTIFIER",
			Keyword => "KEYWORD",
			Integer => "INTEGER",
			Float => "FLOAT",
			Hexadecimal => "HEXADECIMAL",
			Binary => "BINARY",
			Octal => "OCTAL",
			Char => "CHAR",
			Str => "STRING",
			Operator => "OPERATOR",
			Delimiter => "DELIMITER",
			Error => "ERROR",
		}
	}

	/// Kinds that carry a literal value.
	pub fn is_literal(self) -> bool {
		matches!(self, Self::Integer | Self::Float | Self::Hexadecimal | Self::Binary | Self::Octal | Self::Char | Self::Str)
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.as_str()) }
}

impl FromStr for TokenKind {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		use TokenKind::*;
		[Identifier, Keyword, Integer, Float, Hexadecimal, Binary, Octal, Char, Str, Operator, Delimiter, Error]
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| anyhow!("Unknown token kind '{s}'"))
	}
}

/// A token produced by the scanner, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub value: String,
	pub kind:  TokenKind,
	pub line:  usize,
}

impl Token {
	pub fn new(value: impl Into<String>, kind: TokenKind, line: usize) -> Self { Self { value: value.into(), kind, line } }

	/// Whether this is the keyword, operator or delimiter spelled `symbol`.
	pub fn is(&self, symbol: &str) -> bool {
		matches!(self.kind, TokenKind::Keyword | TokenKind::Operator | TokenKind::Delimiter) && self.value == symbol
	}

	/// Literal tokens plus the `true`/`false` keywords.
	pub fn is_literal(&self) -> bool { self.kind.is_literal() || self.is("true") || self.is("false") }

	pub fn is_identifier(&self) -> bool { self.kind == TokenKind::Identifier }
}

/// Rendered as one row of the token table: `value<TAB>KIND<TAB>line`.
impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}\t{}\t{}", self.value, self.kind, self.line)
	}
}

impl FromStr for Token {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut fields = s.rsplitn(3, '\t');
		let line = fields.next().context("Missing line column")?.trim().parse().context("Invalid line number")?;
		let kind = fields.next().context("Missing kind column")?.parse()?;
		let value = fields.next().context("Missing value column")?;
		Ok(Self::new(value, kind, line))
	}
}

/// Lays tokens back out as source text: each token on its original line, separated by
/// single spaces. Scanning the result yields the same token sequence for well formed input.
pub fn format_source(tokens: &[Token]) -> String {
	let mut source = String::new();
	let mut line = 1;
	for token in tokens {
		if token.line > line {
			source.push_str(&"\n".repeat(token.line - line));
			line = token.line;
		} else if !source.is_empty() && !source.ends_with('\n') {
			source.push(' ');
		}
		source.push_str(&token.value);
	}
	source
}

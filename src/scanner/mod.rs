//! The scanner groups characters into tokens, line by line, by driving the
//! [`Automaton`] over every lexeme.
//!
//! Operators, delimiters and whitespace are boundaries: they end the lexeme being
//! built and become tokens of their own. A few automaton states override the
//! boundaries, so that `"a + b"`, `'.'`, `3.14` and `1.5e-3` come out as single
//! lexemes:
//!
//! - inside a string or char literal every character is swallowed,
//! - `.` continues an integer, octal or zero into a float,
//! - `-` continues an exponent.
//!
//! Reaching the closing quote emits the literal immediately. Anything the automaton
//! cannot accept is emitted as an `ERROR` token, the scanner itself never fails.
//!
//! `//` drops the rest of the line, `/* ... */` may span lines.
mod automaton;
mod token;

pub use automaton::{Automaton, State};
use automaton::*;
use log::{debug, info};
pub use token::*;

/// Reserved words, an identifier spelled like one is a `KEYWORD`.
pub const KEYWORDS: [&str; 24] = [
	"int", "end", "if", "else", "while", "do", "for", "break", "continue", "class", "float", "true", "false", "string",
	"char", "void", "boolean", "return", "switch", "case", "default", "print", "println", "inputln",
];

const DOUBLE_OPERATORS: [&str; 13] = ["==", "!=", ">=", "<=", "+=", "-=", "*=", "/=", "%=", "++", "--", "&&", "||"];

/// Scan `source` into tokens.
pub fn tokenize(source: &str) -> Vec<Token> { Scanner::new().scan(source) }

/// A scanner for source text
pub struct Scanner {
	automaton:        Automaton,
	tokens:           Vec<Token>,
	/// Block comments carry over line ends
	in_block_comment: bool,
}

/// The lexeme being built and the automaton state it reached, `None` once it is dead.
struct Lexeme {
	text:  String,
	state: Option<State>,
}

impl Lexeme {
	fn new() -> Self { Self { text: String::new(), state: Some(START) } }

	fn is_empty(&self) -> bool { self.text.is_empty() }

	/// Whether the current state swallows `c` even if it is a boundary.
	fn swallows(&self, c: char) -> bool {
		match self.state {
			Some(STRING_BODY | CHAR_OPEN | CHAR_BODY) => true,
			Some(ZERO | DECIMAL | OCTAL) => c == '.',
			Some(INT_EXPONENT | FLOAT_EXPONENT) => c == '-',
			_ => false,
		}
	}

	fn in_literal(&self) -> bool { matches!(self.state, Some(STRING_BODY | CHAR_OPEN | CHAR_BODY)) }

	fn is_closed_literal(&self) -> bool { matches!(self.state, Some(STRING_END | CHAR_END)) }

	fn push(&mut self, automaton: &Automaton, c: char) {
		self.text.push(c);
		self.state = self.state.and_then(|state| automaton.next_state(state, c));
	}
}

impl Default for Scanner {
	fn default() -> Self { Self::new() }
}

impl Scanner {
	pub fn new() -> Self { Self { automaton: Automaton::language(), tokens: Vec::new(), in_block_comment: false } }

	/// Scan all tokens from the source code
	pub fn scan(mut self, source: &str) -> Vec<Token> {
		for (index, line) in source.lines().enumerate() {
			self.scan_line(line, index + 1);
		}
		let errors = self.tokens.iter().filter(|token| token.kind == TokenKind::Error).count();
		info!("Scanned {} tokens, {errors} unrecognized", self.tokens.len());
		self.tokens
	}

	fn scan_line(&mut self, line: &str, number: usize) {
		let chars: Vec<char> = line.chars().collect();
		let mut lexeme = Lexeme::new();
		let mut index = 0;
		while index < chars.len() {
			let current = chars[index];
			let next = chars.get(index + 1).copied();

			if self.in_block_comment {
				if current == '*' && next == Some('/') {
					self.in_block_comment = false;
					index += 1;
				}
				index += 1;
				continue;
			}
			if current == '/' && next == Some('*') && !lexeme.in_literal() {
				self.flush(&mut lexeme, number);
				self.in_block_comment = true;
				index += 2;
				continue;
			}

			if lexeme.swallows(current) {
				lexeme.push(&self.automaton, current);
				if lexeme.is_closed_literal() {
					self.flush(&mut lexeme, number);
				}
			} else if !is_boundary(current) {
				if matches!(current, '"' | '\'') && !lexeme.is_empty() {
					self.flush(&mut lexeme, number);
				}
				lexeme.push(&self.automaton, current);
			} else {
				self.flush(&mut lexeme, number);
				if is_operator(current) {
					let pair: String = next.map(|next| [current, next].iter().collect()).unwrap_or_default();
					if DOUBLE_OPERATORS.contains(&pair.as_str()) {
						self.emit(pair, TokenKind::Operator, number);
						index += 1;
					} else if pair == "//" {
						return;
					} else {
						self.emit(current.to_string(), TokenKind::Operator, number);
					}
				} else if is_delimiter(current) {
					self.emit(current.to_string(), TokenKind::Delimiter, number);
				}
			}
			index += 1;
		}
		self.flush(&mut lexeme, number);
	}

	/// Classify the pending lexeme, if any, and start a new one.
	fn flush(&mut self, lexeme: &mut Lexeme, line: usize) {
		if lexeme.is_empty() {
			return;
		}
		let finished = std::mem::replace(lexeme, Lexeme::new());
		let kind = match finished.state.and_then(|state| self.automaton.accepted_kind(state)) {
			Some(TokenKind::Identifier) if KEYWORDS.contains(&finished.text.as_str()) => TokenKind::Keyword,
			Some(kind) => kind,
			None => TokenKind::Error,
		};
		self.emit(finished.text, kind, line);
	}

	fn emit(&mut self, value: String, kind: TokenKind, line: usize) {
		debug!("line {line}: {kind} {value}");
		self.tokens.push(Token::new(value, kind, line));
	}
}

fn is_operator(c: char) -> bool { matches!(c, '=' | '+' | '-' | '*' | '/' | '<' | '>' | '!' | '&' | '|' | '%') }

fn is_delimiter(c: char) -> bool { matches!(c, ',' | ';' | '.' | '(' | ')' | '{' | '}' | '[' | ']' | ':') }

fn is_boundary(c: char) -> bool { is_operator(c) || is_delimiter(c) || matches!(c, ' ' | '\t' | '\r' | '\n') }

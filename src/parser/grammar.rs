//! FIRST and FOLLOW sets of the grammar's nonterminals.
//!
//! Entries are spellings of keywords, operators and delimiters, plus three
//! placeholders: [`IDENTIFIER`] for any identifier, [`LITERAL`] for any literal
//! (including `true` and `false`) and [`END`] for the end of input.
use crate::scanner::Token;

pub(crate) const IDENTIFIER: &str = "IDENTIFIER";
pub(crate) const LITERAL: &str = "LITERAL";
pub(crate) const END: &str = "$";

pub(crate) const TYPES: [&str; 6] = ["int", "float", "void", "char", "string", "boolean"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
	Program,
	Methods,
	Params,
	Body,
	Println,
	Inputln,
	Variable,
	Assignment,
	CallMethod,
	ParamValues,
	Return,
	While,
	If,
	DoWhile,
	For,
	Switch,
	StatementBlock,
	/// `||` level
	Expression,
	/// `&&` level
	X,
	/// `!` level
	Y,
	/// relational level
	R,
	/// additive level
	E,
	/// multiplicative level
	A,
	/// unary minus level
	B,
	/// primary
	C,
	Type,
}

impl Rule {
	#[rustfmt::skip]
	pub fn first(self) -> &'static [&'static str] {
		use Rule::*;
		match self {
			Program => &["{", "class", "int", "float", "void", "char", "string", "boolean", IDENTIFIER],
			Methods | Params | Variable | Type => &TYPES,
			Body => &[
				"int", "float", "void", "char", "string", "boolean", IDENTIFIER, "return", "while", "if", "do", "for",
				"switch", "(", "!", "-", LITERAL, "break", "println", "print", "inputln",
			],
			Println => &["println", "print"],
			Inputln => &["inputln"],
			Assignment | CallMethod => &[IDENTIFIER],
			ParamValues | Expression | X | Y => &[IDENTIFIER, "(", "!", "-", LITERAL],
			Return => &["return"],
			While => &["while"],
			If => &["if"],
			DoWhile => &["do"],
			For => &["for"],
			Switch => &["switch"],
			StatementBlock => &[
				"{", "int", "float", "void", "char", "string", "boolean", IDENTIFIER, "return", "while", "if", "do",
				"for", "switch", "(", "!", "-", LITERAL, "break", "println", "print", "inputln",
			],
			R | E | A | B => &[IDENTIFIER, "(", "-", LITERAL],
			C => &[IDENTIFIER, "(", LITERAL],
		}
	}

	#[rustfmt::skip]
	pub fn follow(self) -> &'static [&'static str] {
		use Rule::*;
		match self {
			Program => &[END],
			Methods => &["int", "float", "void", "char", "string", "boolean", "}"],
			Params | ParamValues => &[")"],
			Body | Return => &["}", "break", "case", "default"],
			Println | Inputln => &[";", "}", "break", "case", "default"],
			Variable | Assignment => &[";"],
			CallMethod => &[";", "+", "-", "*", "/", ")", "<", ">", "==", "!=", "&&", "||", ","],
			While | If | DoWhile | For | Switch => &["}", ";", "else", "break", "case", "default"],
			StatementBlock => &["}", ";", "else", "while", "break", "case", "default"],
			Expression | X => &[";", ")", ",", ":"],
			Y => &["||", ";", ")", ",", ":"],
			R => &["&&", "||", ";", ")", ",", ":"],
			E => &["<", ">", "<=", ">=", "==", "!=", "&&", "||", ";", ")", ",", ":"],
			A => &["+", "-", "<", ">", "<=", ">=", "==", "!=", "&&", "||", ";", ")", ",", ":"],
			B | C => &["*", "/", "+", "-", "<", ">", "<=", ">=", "==", "!=", "&&", "||", ";", ")", ",", ":"],
			Type => &[IDENTIFIER],
		}
	}
}

/// Whether `token` (`None` at end of input) belongs to `set`.
pub(crate) fn contains(set: &[&str], token: Option<&Token>) -> bool {
	let Some(token) = token else { return set.contains(&END) };
	set.iter().any(|&entry| match entry {
		IDENTIFIER => token.is_identifier(),
		LITERAL => token.is_literal(),
		END => false,
		symbol => token.is(symbol),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::TokenKind;

	#[test]
	fn placeholders_match_kinds() {
		let number = Token::new("3", TokenKind::Integer, 1);
		let truth = Token::new("true", TokenKind::Keyword, 1);
		let name = Token::new("x", TokenKind::Identifier, 1);
		assert!(contains(Rule::C.first(), Some(&number)));
		assert!(contains(Rule::C.first(), Some(&truth)));
		assert!(contains(Rule::C.first(), Some(&name)));
		assert!(!contains(Rule::Type.first(), Some(&name)));
		assert!(contains(Rule::Type.follow(), Some(&name)));
	}

	#[test]
	fn end_of_input() {
		assert!(contains(Rule::Program.follow(), None));
		assert!(!contains(Rule::Body.follow(), None));
	}

	#[test]
	fn strings_never_match_symbols() {
		let quoted = Token::new("\";\"", TokenKind::Str, 1);
		assert!(!contains(Rule::Variable.follow(), Some(&quoted)));
		let spelled = Token::new("while", TokenKind::Identifier, 1);
		assert!(!contains(Rule::While.first(), Some(&spelled)));
	}
}

//! A deterministic finite automaton used to classify lexemes.
//!
//! The automaton itself is a plain table: a partial transition function from
//! `(state, character)` to the next state, plus a map from accepting states to the
//! token kind they finalize. A missing transition means the lexeme cannot be
//! continued, the scanner then keeps collecting characters in a dead state and
//! reports the lexeme as an error.
//!
//! [`Automaton::language`] builds the table for the language:
//!
//! |Lexeme|Path|Kind
//! --|--|--
//! `0`|s0 → s1|INTEGER
//! `0b101`|s1 → s2 → s3|BINARY
//! `42`|s0 → s4|INTEGER
//! `4e2`, `4e-2`|s4 → s13 → (s14) → s15|INTEGER
//! `name_1$`|s0 → s5|IDENTIFIER
//! `"text"`|s0 → s6 → s7|STRING
//! `0x1F`|s1 → s8 → s9|HEXADECIMAL
//! `017`|s1 → s10|OCTAL
//! `1.5`|s4 → s11 → s12|FLOAT
//! `1.5e-3`|s12 → s16 → (s17) → s18|FLOAT
//! `2f`, `1.5F`|s1, s4, s11, s12, s18 → s19|FLOAT
//! `'c'`|s0 → s20 → s21 → s22|CHAR
use std::{
	collections::{BTreeMap, HashMap},
	fmt::Write,
};

use super::TokenKind;

pub type State = u8;

pub(crate) const START: State = 0;
pub(crate) const ZERO: State = 1;
const BINARY_PREFIX: State = 2;
const BINARY: State = 3;
pub(crate) const DECIMAL: State = 4;
const IDENTIFIER: State = 5;
pub(crate) const STRING_BODY: State = 6;
pub(crate) const STRING_END: State = 7;
const HEX_PREFIX: State = 8;
const HEX: State = 9;
pub(crate) const OCTAL: State = 10;
const FRACTION_DOT: State = 11;
const FRACTION: State = 12;
pub(crate) const INT_EXPONENT: State = 13;
const INT_EXPONENT_SIGN: State = 14;
const INT_EXPONENT_DIGITS: State = 15;
pub(crate) const FLOAT_EXPONENT: State = 16;
const FLOAT_EXPONENT_SIGN: State = 17;
const FLOAT_EXPONENT_DIGITS: State = 18;
const FLOAT_SUFFIX: State = 19;
pub(crate) const CHAR_OPEN: State = 20;
pub(crate) const CHAR_BODY: State = 21;
pub(crate) const CHAR_END: State = 22;

#[derive(Debug, Default, Clone)]
pub struct Automaton {
	transitions: HashMap<(State, char), State>,
	accepting:   HashMap<State, TokenKind>,
}

impl Automaton {
	pub fn new() -> Self { Self::default() }

	pub fn add_transition(&mut self, state: State, symbol: char, next: State) {
		self.transitions.insert((state, symbol), next);
	}

	fn add_transitions(&mut self, state: State, symbols: impl IntoIterator<Item = char>, next: State) {
		for symbol in symbols {
			self.add_transition(state, symbol, next);
		}
	}

	/// `None` when the lexeme has no continuation on `symbol`.
	pub fn next_state(&self, state: State, symbol: char) -> Option<State> {
		self.transitions.get(&(state, symbol)).copied()
	}

	pub fn mark_accept(&mut self, state: State, kind: TokenKind) { self.accepting.insert(state, kind); }

	pub fn is_accept(&self, state: State) -> bool { self.accepting.contains_key(&state) }

	pub fn accepted_kind(&self, state: State) -> Option<TokenKind> { self.accepting.get(&state).copied() }

	/// The automaton of the language's literals and identifiers.
	pub fn language() -> Self {
		use TokenKind::*;

		let letters = || ('a'..='z').chain('A'..='Z');
		let nonzero = || '1'..='9';
		let digits = || '0'..='9';
		let octal = || '0'..='7';
		let printable = |quote: char| (' '..='~').filter(move |&c| c != quote);

		let mut dfa = Self::new();

		dfa.add_transition(START, '0', ZERO);
		dfa.mark_accept(ZERO, Integer);

		dfa.add_transitions(ZERO, ['b', 'B'], BINARY_PREFIX);
		dfa.add_transitions(BINARY_PREFIX, ['0', '1'], BINARY);
		dfa.add_transitions(BINARY, ['0', '1'], BINARY);
		dfa.mark_accept(BINARY, Binary);

		dfa.add_transitions(START, nonzero(), DECIMAL);
		dfa.add_transitions(DECIMAL, digits(), DECIMAL);
		dfa.mark_accept(DECIMAL, Integer);

		dfa.add_transitions(START, letters().chain(['_', '$']), IDENTIFIER);
		dfa.add_transitions(IDENTIFIER, letters().chain(digits()).chain(['_', '$']), IDENTIFIER);
		dfa.mark_accept(IDENTIFIER, Identifier);

		dfa.add_transition(START, '"', STRING_BODY);
		dfa.add_transitions(STRING_BODY, printable('"'), STRING_BODY);
		dfa.add_transition(STRING_BODY, '"', STRING_END);
		dfa.mark_accept(STRING_END, Str);

		let hex = || digits().chain('a'..='f').chain('A'..='F');
		dfa.add_transitions(ZERO, ['x', 'X'], HEX_PREFIX);
		dfa.add_transitions(HEX_PREFIX, hex(), HEX);
		dfa.add_transitions(HEX, hex(), HEX);
		dfa.mark_accept(HEX, Hexadecimal);

		// A leading zero followed by 8 or 9 is read as decimal.
		dfa.add_transitions(ZERO, octal(), OCTAL);
		dfa.add_transitions(OCTAL, octal(), OCTAL);
		dfa.add_transitions(ZERO, ['8', '9'], DECIMAL);
		dfa.add_transitions(OCTAL, ['8', '9'], DECIMAL);
		dfa.mark_accept(OCTAL, Octal);

		for state in [ZERO, DECIMAL, OCTAL] {
			dfa.add_transition(state, '.', FRACTION_DOT);
		}
		dfa.add_transitions(FRACTION_DOT, digits(), FRACTION);
		dfa.add_transitions(FRACTION, digits(), FRACTION);
		dfa.mark_accept(FRACTION_DOT, Float);
		dfa.mark_accept(FRACTION, Float);

		// An integer with an exponent stays an integer.
		dfa.add_transitions(DECIMAL, ['e', 'E'], INT_EXPONENT);
		dfa.add_transition(INT_EXPONENT, '-', INT_EXPONENT_SIGN);
		dfa.add_transitions(INT_EXPONENT, nonzero(), INT_EXPONENT_DIGITS);
		dfa.add_transitions(INT_EXPONENT_SIGN, nonzero(), INT_EXPONENT_DIGITS);
		dfa.add_transitions(INT_EXPONENT_DIGITS, digits(), INT_EXPONENT_DIGITS);
		dfa.mark_accept(INT_EXPONENT_DIGITS, Integer);

		dfa.add_transitions(FRACTION, ['e', 'E'], FLOAT_EXPONENT);
		dfa.add_transition(FLOAT_EXPONENT, '-', FLOAT_EXPONENT_SIGN);
		dfa.add_transitions(FLOAT_EXPONENT, nonzero(), FLOAT_EXPONENT_DIGITS);
		dfa.add_transitions(FLOAT_EXPONENT_SIGN, nonzero(), FLOAT_EXPONENT_DIGITS);
		dfa.add_transitions(FLOAT_EXPONENT_DIGITS, digits(), FLOAT_EXPONENT_DIGITS);
		dfa.mark_accept(FLOAT_EXPONENT_DIGITS, Float);

		for state in [ZERO, DECIMAL, FRACTION_DOT, FRACTION, FLOAT_EXPONENT_DIGITS] {
			dfa.add_transitions(state, ['f', 'F'], FLOAT_SUFFIX);
		}
		dfa.mark_accept(FLOAT_SUFFIX, Float);

		dfa.add_transition(START, '\'', CHAR_OPEN);
		dfa.add_transitions(CHAR_OPEN, printable('\''), CHAR_BODY);
		dfa.add_transition(CHAR_BODY, '\'', CHAR_END);
		dfa.mark_accept(CHAR_END, Char);

		dfa
	}

	/// Renders the automaton as a GraphViz digraph, edges between the same pair of
	/// states are merged into one labelled with every symbol.
	pub fn to_dot(&self) -> String {
		let mut edges: BTreeMap<(State, State), Vec<char>> = BTreeMap::new();
		for (&(from, symbol), &to) in &self.transitions {
			edges.entry((from, to)).or_default().push(symbol);
		}

		let mut dot = String::from("digraph automaton {\n\trankdir=LR;\n");
		let mut accepting: Vec<_> = self.accepting.iter().collect();
		accepting.sort_by_key(|(state, _)| **state);
		for (state, kind) in accepting {
			let _ = writeln!(dot, "\ts{state} [shape=doublecircle, xlabel=\"{kind}\"];");
		}
		for ((from, to), mut symbols) in edges {
			symbols.sort_unstable();
			let label: String = symbols.into_iter().flat_map(|c| c.escape_default()).collect();
			let _ = writeln!(dot, "\ts{from} -> s{to} [label=\"{label}\"];");
		}
		dot.push('}');
		dot
	}
}

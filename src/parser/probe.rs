use super::expression::literal_type;
use crate::{
	scanner::Token,
	semantic::{Analyzer, Operator, Type, cube},
};

/// Predicts the type of the expression starting at a token position, following the
/// same precedence levels as the parser. Nothing is consumed, emitted or reported: any
/// unknown operand, invalid combination or malformed input yields `None`.
pub(super) struct TypeProbe<'a> {
	tokens:   &'a [Token],
	cursor:   usize,
	analyzer: &'a Analyzer,
}

impl<'a> TypeProbe<'a> {
	pub fn new(tokens: &'a [Token], cursor: usize, analyzer: &'a Analyzer) -> Self { Self { tokens, cursor, analyzer } }

	pub fn expression(mut self) -> Option<Type> { self.or() }

	fn peek(&self) -> Option<&'a Token> { self.tokens.get(self.cursor) }

	/// Step over the lookahead if it is one of `symbols`.
	fn eat(&mut self, symbols: &[&'static str]) -> Option<&'static str> {
		let token = self.peek()?;
		let symbol = symbols.iter().copied().find(|symbol| token.is(symbol))?;
		self.cursor += 1;
		Some(symbol)
	}

	fn or(&mut self) -> Option<Type> {
		let mut left = self.and()?;
		while self.eat(&["||"]).is_some() {
			left = cube(left, self.and()?, Operator::Or)?;
		}
		Some(left)
	}

	fn and(&mut self) -> Option<Type> {
		let mut left = self.not()?;
		while self.eat(&["&&"]).is_some() {
			left = cube(left, self.not()?, Operator::And)?;
		}
		Some(left)
	}

	fn not(&mut self) -> Option<Type> {
		if self.eat(&["!"]).is_none() {
			return self.relation();
		}
		let operand = self.not()?;
		cube(operand, operand, Operator::Not)
	}

	fn relation(&mut self) -> Option<Type> {
		let left = self.sum()?;
		let Some(symbol) = self.eat(&[">", "<", ">=", "<=", "==", "!="]) else { return Some(left) };
		let right = self.sum()?;
		let operator = match symbol {
			">" | "<=" => Operator::Greater,
			"<" | ">=" => Operator::Less,
			"==" => Operator::Equal,
			_ => Operator::NotEqual,
		};
		cube(left, right, operator)
	}

	fn sum(&mut self) -> Option<Type> {
		let mut left = self.product()?;
		while let Some(symbol) = self.eat(&["+", "-"]) {
			left = cube(left, self.product()?, Operator::from_symbol(symbol)?)?;
		}
		Some(left)
	}

	fn product(&mut self) -> Option<Type> {
		let mut left = self.negation()?;
		while let Some(symbol) = self.eat(&["*", "/"]) {
			left = cube(left, self.negation()?, Operator::from_symbol(symbol)?)?;
		}
		Some(left)
	}

	fn negation(&mut self) -> Option<Type> {
		if self.eat(&["-"]).is_none() {
			return self.primary();
		}
		cube(Type::Int, self.primary()?, Operator::Sub)
	}

	fn primary(&mut self) -> Option<Type> {
		if self.eat(&["("]).is_some() {
			let inner = self.or()?;
			self.eat(&[")"])?;
			return Some(inner);
		}
		let token = self.peek()?;
		self.cursor += 1;
		if !token.is_identifier() {
			return literal_type(token);
		}
		if self.peek().is_some_and(|next| next.is("(")) {
			self.skip_arguments();
			return self.analyzer.method(&token.value).map(|method| method.return_type);
		}
		self.analyzer.lookup(&token.value)
	}

	/// Step over a balanced parenthesized argument list.
	fn skip_arguments(&mut self) {
		let mut depth = 0usize;
		while let Some(token) = self.peek() {
			self.cursor += 1;
			if token.is("(") {
				depth += 1;
			} else if token.is(")") {
				depth = depth.saturating_sub(1);
				if depth == 0 {
					return;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{scanner::tokenize, semantic::Method};

	fn probe(source: &str, analyzer: &Analyzer) -> Option<Type> {
		let tokens = tokenize(source);
		TypeProbe::new(&tokens, 0, analyzer).expression()
	}

	#[test]
	fn literals_and_operators() {
		let analyzer = Analyzer::new();
		assert_eq!(probe("1 + 2 * 3", &analyzer), Some(Type::Int));
		assert_eq!(probe("1 + 2.0", &analyzer), Some(Type::Float));
		assert_eq!(probe("\"n = \" + 4", &analyzer), Some(Type::Str));
		assert_eq!(probe("1 < 2 && !false", &analyzer), Some(Type::Boolean));
		assert_eq!(probe("-(0x1F)", &analyzer), Some(Type::Int));
		assert_eq!(probe("'a' == 'b'", &analyzer), Some(Type::Boolean));
	}

	#[test]
	fn unknown_parts() {
		let analyzer = Analyzer::new();
		assert_eq!(probe("missing + 1", &analyzer), None);
		assert_eq!(probe("true + 1", &analyzer), None);
		assert_eq!(probe("(1 + 2", &analyzer), None);
		assert_eq!(probe(";", &analyzer), None);
	}

	#[test]
	fn variables_and_calls() {
		let mut analyzer = Analyzer::new();
		analyzer.declare_variable(Type::Float, "rate", 1);
		let method = Method { return_type: Type::Int, name: "count".to_string(), parameters: vec![] };
		analyzer.declare_method(method, 1);
		assert_eq!(probe("rate * 2", &analyzer), Some(Type::Float));
		assert_eq!(probe("count((1 + 2), 3) + 1", &analyzer), Some(Type::Int));
	}

	#[test]
	fn stops_at_expression_end() {
		let analyzer = Analyzer::new();
		assert_eq!(probe("5; \"x\" + 1", &analyzer), Some(Type::Int));
		assert_eq!(probe("2 > 1) {", &analyzer), Some(Type::Boolean));
	}
}

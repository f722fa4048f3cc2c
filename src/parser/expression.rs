//! The expression levels, loosest first. Each level emits postfix code for what it
//! consumed and returns the type it inferred, `None` when some operand is unknown.
use super::{Parser, grammar::Rule};
use crate::{
	codegen::{Operation, literal_text},
	error::{parser::ParserError, semantic::SemanticError},
	scanner::{Token, TokenKind},
	semantic::{Operator, Type},
};

type Level<'t> = fn(&mut Parser<'t>) -> Result<Option<Type>, ParserError>;

const RELATIONAL: [&str; 6] = [">", "<", ">=", "<=", "==", "!="];

/// Type of a literal token.
pub(super) fn literal_type(token: &Token) -> Option<Type> {
	Some(match token.kind {
		TokenKind::Integer | TokenKind::Hexadecimal | TokenKind::Binary | TokenKind::Octal => Type::Int,
		TokenKind::Float => Type::Float,
		TokenKind::Char => Type::Char,
		TokenKind::Str => Type::Str,
		_ if token.is("true") || token.is("false") => Type::Boolean,
		_ => return None,
	})
}

impl<'t> Parser<'t> {
	/// expression → x ( "||" x )*
	pub(super) fn expression(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_EXPRESSION", |p| p.binary(Rule::Expression, 1400, &[("||", Operator::Or, Operation::Or)], Self::x))
	}

	/// x → y ( "&&" y )*
	fn x(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_X", |p| p.binary(Rule::X, 1410, &[("&&", Operator::And, Operation::And)], Self::y))
	}

	/// y → "!" y | r
	fn y(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_Y", |p| {
			if !p.expect(Rule::Y, 1420) {
				return Ok(None);
			}
			if !p.check("!") {
				return p.r();
			}
			let line = p.line();
			p.advance()?;
			p.log("!");
			let operand = p.y()?;
			p.generator.operation(Operation::Not);
			Ok(operand.and_then(|operand| p.analyzer.check_operation(operand, operand, Operator::Not, line)))
		})
	}

	/// r → e ( ( "<" | ">" | "<=" | ">=" | "==" | "!=" ) e )?
	///
	/// `a >= b` is emitted as `!(a < b)` and `a <= b` as `!(a > b)`.
	fn r(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_R", |p| {
			if !p.expect(Rule::R, 1430) {
				return Ok(None);
			}
			let left = p.e()?;
			let Some(symbol) = RELATIONAL.into_iter().find(|symbol| p.check(symbol)) else { return Ok(left) };
			let line = p.line();
			p.advance()?;
			p.log(symbol);
			let right = p.e()?;

			#[rustfmt::skip]
			let (operator, operation, negate) = match symbol {
				">" => (Operator::Greater, Operation::Greater, false),
				"<" => (Operator::Less, Operation::Less, false),
				">=" => (Operator::Less, Operation::Less, true),
				"<=" => (Operator::Greater, Operation::Greater, true),
				"==" => (Operator::Equal, Operation::Equal, false),
				_ => (Operator::NotEqual, Operation::NotEqual, false),
			};
			p.generator.operation(operation);
			if negate {
				p.generator.operation(Operation::Not);
			}
			Ok(p.combine(left, right, operator, line))
		})
	}

	/// e → a ( ( "+" | "-" ) a )*
	fn e(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_E", |p| {
			let operators = [("+", Operator::Add, Operation::Add), ("-", Operator::Sub, Operation::Sub)];
			p.binary(Rule::E, 1440, &operators, Self::a)
		})
	}

	/// a → b ( ( "*" | "/" ) b )*
	fn a(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_A", |p| {
			let operators = [("*", Operator::Mul, Operation::Mul), ("/", Operator::Div, Operation::Div)];
			p.binary(Rule::A, 1450, &operators, Self::b)
		})
	}

	/// b → "-"? c, negation is emitted as `0 - c`.
	fn b(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_B", |p| {
			if !p.expect(Rule::B, 1460) {
				return Ok(None);
			}
			if !p.check("-") {
				return p.c();
			}
			let line = p.line();
			p.advance()?;
			p.log("-");
			p.generator.literal("0");
			let operand = p.c()?;
			p.generator.operation(Operation::Sub);
			Ok(operand.and_then(|operand| p.analyzer.check_operation(Type::Int, operand, Operator::Sub, line)))
		})
	}

	/// c → IDENTIFIER | call | LITERAL | "(" expression ")"
	fn c(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_C", |p| {
			if !p.expect(Rule::C, 1470) {
				return Ok(None);
			}
			if p.accept("(")? {
				let r#type = p.expression()?;
				if !p.accept(")")? {
					p.error(1471);
				}
				return Ok(r#type);
			}
			if p.check_identifier() {
				if p.peek_at(1).is_some_and(|token| token.is("(")) {
					let r#type = p.call_method()?;
					let value = match r#type {
						Some(Type::Void) | None => "0",
						Some(r#type) => r#type.default_value(),
					};
					p.generator.literal(value);
					return Ok(r#type);
				}
				let name = p.advance()?;
				p.log(format!("IDENTIFIER: {}", name.value));
				p.generator.load(&name.value);
				return Ok(p.analyzer.use_variable(&name.value, name.line));
			}

			let literal = p.advance()?;
			p.log(format!("LITERAL: {}", literal.value));
			let text = literal_text(literal);
			let r#type = literal_type(literal);
			if r#type == Some(Type::Int) && text.parse::<i64>().is_err() {
				p.analyzer.report(SemanticError::IntegerOutOfRange { value: literal.value.clone(), line: literal.line });
			}
			p.generator.literal(&text);
			Ok(r#type)
		})
	}

	/// A left associative level: `next ( operator next )*`.
	fn binary(
		&mut self,
		rule: Rule,
		code: u16,
		operators: &[(&str, Operator, Operation)],
		next: Level<'t>,
	) -> Result<Option<Type>, ParserError> {
		if !self.expect(rule, code) {
			return Ok(None);
		}
		let mut left = next(self)?;
		loop {
			let Some(&(symbol, operator, operation)) = operators.iter().find(|(symbol, ..)| self.check(symbol)) else {
				break;
			};
			let line = self.line();
			self.advance()?;
			self.log(symbol);
			let right = next(self)?;
			self.generator.operation(operation);
			left = self.combine(left, right, operator, line);
		}
		Ok(left)
	}

	/// Type of `left operator right`, checked only when both sides are known.
	fn combine(&mut self, left: Option<Type>, right: Option<Type>, operator: Operator, line: usize) -> Option<Type> {
		let (Some(left), Some(right)) = (left, right) else { return None };
		self.analyzer.check_operation(left, right, operator, line)
	}
}

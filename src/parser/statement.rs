use super::{Parser, grammar::Rule};
use crate::{
	codegen::{Operation, literal_text},
	error::{parser::ParserError, semantic::SemanticError},
	scanner::Token,
	semantic::{Operator, Type},
};

const ASSIGNMENTS: [&str; 7] = ["=", "+=", "-=", "*=", "/=", "++", "--"];

/// The arithmetic behind a compound assignment operator.
fn compound(symbol: &str) -> Option<(Operator, Operation)> {
	Some(match symbol {
		"+=" | "++" => (Operator::Add, Operation::Add),
		"-=" | "--" => (Operator::Sub, Operation::Sub),
		"*=" => (Operator::Mul, Operation::Mul),
		"/=" => (Operator::Div, Operation::Div),
		_ => return None,
	})
}

impl<'t> Parser<'t> {
	/// body → statement*
	pub(super) fn body(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_BODY", |p| {
			while p.peek().is_some() && !p.check("}") && !p.check("case") && !p.check("default") {
				let start = p.cursor;
				p.statement()?;
				if p.cursor == start {
					p.cursor += 1;
				}
			}
			Ok(())
		})
	}

	fn statement(&mut self) -> Result<(), ParserError> {
		if self.is_type() {
			self.variable()?;
			return self.terminate(1300);
		}
		if self.check_identifier() {
			let next = self.peek_at(1);
			if next.is_some_and(|token| token.is("(")) {
				self.call_method()?;
				return self.terminate(1302);
			}
			if next.is_some_and(|token| ASSIGNMENTS.iter().any(|symbol| token.is(symbol))) {
				self.assignment()?;
				return self.terminate(1301);
			}
			return self.expression_statement();
		}
		if self.check("println") || self.check("print") {
			self.println()?;
			return self.terminate(1305);
		}
		if self.check("inputln") {
			self.inputln()?;
			return self.terminate(1306);
		}
		if self.check("break") {
			return self.break_statement();
		}
		if self.check("return") {
			return self.return_statement();
		}
		if self.check("while") {
			return self.while_statement();
		}
		if self.check("if") {
			return self.if_statement();
		}
		if self.check("do") {
			return self.do_while();
		}
		if self.check("for") {
			return self.for_statement();
		}
		if self.check("switch") {
			return self.switch();
		}
		if self.check("{") {
			return self.statement_block();
		}
		if self.in_first(Rule::Expression) {
			return self.expression_statement();
		}

		self.error(1303);
		self.skip_while(|p| {
			!p.starts_statement() && !p.in_first(Rule::Expression) && !p.check(";") && !p.in_follow(Rule::Body)
		});
		if self.check(";") {
			self.advance()?;
			self.log("; (recovered)");
		}
		Ok(())
	}

	fn expression_statement(&mut self) -> Result<(), ParserError> {
		self.expression()?;
		self.terminate(1304)
	}

	/// Consume the `;` ending a simple statement, or report `code` and skip to the next
	/// `;` or statement start.
	fn terminate(&mut self, code: u16) -> Result<(), ParserError> {
		if self.accept(";")? {
			return Ok(());
		}
		self.error(code);
		self.skip_while(|p| !p.check(";") && !p.starts_statement() && !p.in_follow(Rule::Body));
		if self.check(";") {
			self.advance()?;
			self.log("; (recovered)");
		}
		Ok(())
	}

	/// variable → type IDENTIFIER ( "=" expression )?
	pub(super) fn variable(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_VARIABLE", |p| {
			if !p.expect(Rule::Variable, 500) {
				return Ok(());
			}
			let r#type = p.r#type()?;
			if !p.check_identifier() {
				p.error(501);
				p.skip_while(|p| !p.in_follow(Rule::Variable) && !p.in_follow(Rule::Body));
				return Ok(());
			}
			let name = p.advance()?;
			p.log(format!("IDENTIFIER: {}", name.value));
			let declared = r#type.is_some_and(|r#type| p.analyzer.declare_variable(r#type, &name.value, name.line));
			if !p.accept("=")? {
				return Ok(());
			}
			if !p.in_first(Rule::Expression) {
				p.error(502);
				p.skip_while(|p| !p.in_follow(Rule::Variable) && !p.in_follow(Rule::Body));
				return Ok(());
			}

			if let (Some(target), Some(value)) = (r#type, p.probe()) {
				p.analyzer.check_assignment(target, value, name.line);
			}
			let single_literal = p.peek().is_some_and(Token::is_literal) && p.peek_at(1).is_some_and(|token| token.is(";"));
			if declared && single_literal {
				if let Some(literal) = p.peek() {
					p.analyzer.set_value(&name.value, &literal_text(literal));
				}
			}
			p.expression()?;
			p.generator.store(&name.value);
			Ok(())
		})
	}

	/// assignment → IDENTIFIER ( "=" | "+=" | "-=" | "*=" | "/=" ) expression | IDENTIFIER ( "++" | "--" )
	pub(super) fn assignment(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_ASSIGNMENT", |p| {
			if !p.expect(Rule::Assignment, 600) {
				return Ok(());
			}
			let name = p.advance()?;
			p.log(format!("IDENTIFIER: {}", name.value));
			let target = p.analyzer.use_variable(&name.value, name.line);
			let Some(symbol) = ASSIGNMENTS.into_iter().find(|symbol| p.check(symbol)) else {
				p.error(601);
				p.skip_while(|p| !p.in_follow(Rule::Assignment) && !p.check(")"));
				return Ok(());
			};
			p.advance()?;
			p.log(symbol);
			let arithmetic = compound(symbol);

			if symbol == "++" || symbol == "--" {
				if let (Some(target), Some((operator, _))) = (target, arithmetic) {
					p.analyzer.check_operation(target, Type::Int, operator, name.line);
				}
				p.generator.load(&name.value);
				p.generator.literal("1");
			} else {
				if !p.in_first(Rule::Expression) {
					p.error(602);
					p.skip_while(|p| !p.in_follow(Rule::Assignment) && !p.check(")"));
					return Ok(());
				}
				if let (Some(target), Some(value)) = (target, p.probe()) {
					match arithmetic {
						Some((operator, _)) => {
							if let Some(result) = p.analyzer.check_operation(target, value, operator, name.line) {
								p.analyzer.check_assignment(target, result, name.line);
							}
						}
						None => {
							p.analyzer.check_assignment(target, value, name.line);
						}
					}
				}
				if arithmetic.is_some() {
					p.generator.load(&name.value);
				}
				p.expression()?;
			}
			if let Some((_, operation)) = arithmetic {
				p.generator.operation(operation);
			}
			p.generator.store(&name.value);
			Ok(())
		})
	}

	/// call → IDENTIFIER "(" ( expression ( "," expression )* )? ")"
	///
	/// Argument code is dropped, the virtual machine has no call instruction. Returns
	/// the declared return type.
	pub(super) fn call_method(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_CALL_METHOD", |p| {
			if !p.expect(Rule::CallMethod, 700) {
				return Ok(None);
			}
			let name = p.advance()?;
			p.log(format!("IDENTIFIER: {}", name.value));
			if !p.accept("(")? {
				p.error(701);
				p.skip_while(|p| !p.in_follow(Rule::CallMethod));
				return Ok(None);
			}
			let mark = p.generator.mark();
			let arguments = p.param_values()?;
			p.generator.split_off(mark);
			if !p.accept(")")? {
				p.error(702);
				p.skip_while(|p| !p.in_follow(Rule::CallMethod));
			}
			Ok(p.analyzer.check_call(&name.value, &arguments, name.line))
		})
	}

	fn param_values(&mut self) -> Result<Vec<Option<Type>>, ParserError> {
		self.rule("RULE_PARAM_VALUES", |p| {
			let mut arguments = Vec::new();
			if p.check(")") || !p.expect(Rule::ParamValues, 800) {
				return Ok(arguments);
			}
			arguments.push(p.expression()?);
			while p.accept(",")? {
				if p.in_first(Rule::Expression) {
					arguments.push(p.expression()?);
				} else {
					p.error(801);
					arguments.push(None);
					p.skip_while(|p| !p.check(",") && !p.in_follow(Rule::ParamValues) && !p.check(";"));
				}
			}
			Ok(arguments)
		})
	}

	/// println → ( "println" | "print" ) "(" expression? ")"
	fn println(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_PRINTLN", |p| {
			if !p.expect(Rule::Println, 1500) {
				return Ok(());
			}
			let keyword = p.advance()?;
			p.log(&keyword.value);
			if !p.accept("(")? {
				p.error(1501);
				p.skip_while(|p| !p.in_follow(Rule::Println));
				return Ok(());
			}
			if p.check(")") {
				p.generator.literal("\"\"");
			} else {
				p.expression()?;
			}
			if !p.accept(")")? {
				p.error(1502);
				p.skip_while(|p| !p.in_follow(Rule::Println));
			}
			let operation = if keyword.is("println") { Operation::PrintLine } else { Operation::Print };
			p.generator.operation(operation);
			Ok(())
		})
	}

	/// inputln → "inputln" "(" IDENTIFIER ")"
	fn inputln(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_INPUTLN", |p| {
			if !p.expect(Rule::Inputln, 1503) {
				return Ok(());
			}
			p.advance()?;
			p.log("inputln");
			if !p.accept("(")? {
				p.error(1503);
				p.skip_while(|p| !p.in_follow(Rule::Inputln));
				return Ok(());
			}
			if !p.check_identifier() {
				p.error(1504);
				p.skip_while(|p| !p.in_follow(Rule::Inputln));
				return Ok(());
			}
			let name = p.advance()?;
			p.log(format!("IDENTIFIER: {}", name.value));
			p.analyzer.use_variable(&name.value, name.line);
			if !p.accept(")")? {
				p.error(1505);
				p.skip_while(|p| !p.in_follow(Rule::Inputln));
			}
			p.generator.operation(Operation::Read);
			p.generator.store(&name.value);
			Ok(())
		})
	}

	fn break_statement(&mut self) -> Result<(), ParserError> {
		let keyword = self.advance()?;
		self.log("break");
		match self.breaks.last() {
			Some(end) => {
				let end = end.clone();
				self.generator.jump(&end);
			}
			None => self.analyzer.report(SemanticError::BreakOutsideLoop { line: keyword.line }),
		}
		self.terminate(1307)
	}

	/// return → "return" expression? ";"
	fn return_statement(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_RETURN", |p| {
			if !p.expect(Rule::Return, 19) {
				return Ok(());
			}
			let keyword = p.advance()?;
			p.log("return");
			if p.check(";") {
				if let Some(expected) = p.returns {
					p.analyzer.check_empty_return(expected, keyword.line);
				}
			} else if p.in_first(Rule::Expression) {
				let found = p.expression()?;
				if let Some(expected) = p.returns {
					p.analyzer.check_return_value(expected, found, keyword.line);
				}
			} else {
				p.error(19);
				p.skip_while(|p| !p.check(";") && !p.in_follow(Rule::Return));
			}
			p.generator.operation(Operation::Return);
			p.terminate(28)
		})
	}

	/// `"(" expression ")"` of a control construct, checked to be boolean. `codes` are
	/// reported for a missing `(`, a missing expression and a missing `)`.
	fn condition(&mut self, context: &str, codes: [u16; 3]) -> Result<(), ParserError> {
		let [open, missing, close] = codes;
		if !self.accept("(")? {
			self.error(open);
		}
		if self.in_first(Rule::Expression) {
			let line = self.line();
			if let Some(found) = self.probe() {
				self.analyzer.check_boolean(found, context, line);
			}
			self.expression()?;
		} else {
			self.error(missing);
			self.skip_while(|p| !p.check(")") && !p.check("{") && !p.in_follow(Rule::Body));
		}
		if !self.accept(")")? {
			self.error(close);
			self.skip_while(|p| !p.check(")") && !p.check("{") && !p.check(";") && !p.in_follow(Rule::Body));
			self.accept(")")?;
		}
		Ok(())
	}

	/// A loop or switch body whose `break`s jump to `end`.
	fn breakable(&mut self, end: &str, body: impl FnOnce(&mut Self) -> Result<(), ParserError>) -> Result<(), ParserError> {
		self.breaks.push(end.to_string());
		let result = body(self);
		self.breaks.pop();
		result
	}

	/// while → "while" "(" expression ")" block
	fn while_statement(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_WHILE", |p| {
			if !p.expect(Rule::While, 29) {
				return Ok(());
			}
			p.advance()?;
			p.log("while");
			let start = p.generator.generate_label();
			let end = p.generator.generate_label();
			p.generator.add_label(&start);
			p.condition("while", [29, 900, 30])?;
			p.generator.jump_if(&end, false);
			p.breakable(&end, Self::statement_block)?;
			p.generator.jump(&start);
			p.generator.add_label(&end);
			Ok(())
		})
	}

	/// if → "if" "(" expression ")" block ( "else" ( if | block ) )?
	fn if_statement(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_IF", |p| {
			if !p.expect(Rule::If, 400) {
				return Ok(());
			}
			p.advance()?;
			p.log("if");
			p.condition("if", [400, 401, 402])?;
			let otherwise = p.generator.generate_label();
			p.generator.jump_if(&otherwise, false);
			p.statement_block()?;
			if p.accept("else")? {
				let end = p.generator.generate_label();
				p.generator.jump(&end);
				p.generator.add_label(&otherwise);
				p.statement_block()?;
				p.generator.add_label(&end);
			} else {
				p.generator.add_label(&otherwise);
			}
			Ok(())
		})
	}

	/// do_while → "do" block "while" "(" expression ")" ";"
	fn do_while(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_DO_WHILE", |p| {
			if !p.expect(Rule::DoWhile, 35) {
				return Ok(());
			}
			p.advance()?;
			p.log("do");
			let start = p.generator.generate_label();
			let end = p.generator.generate_label();
			p.generator.add_label(&start);
			p.breakable(&end, Self::statement_block)?;
			if !p.accept("while")? {
				p.error(36);
				p.skip_while(|p| !p.check("(") && !p.in_follow(Rule::DoWhile));
				if !p.check("(") {
					p.generator.add_label(&end);
					return Ok(());
				}
			}
			p.condition("do-while", [37, 38, 39])?;
			p.generator.jump_if(&start, true);
			p.generator.add_label(&end);
			p.terminate(40)
		})
	}

	/// for → "for" "(" ( variable | assignment )? ";" expression? ";" assignment? ")" block
	fn for_statement(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_FOR", |p| {
			if !p.expect(Rule::For, 1000) {
				return Ok(());
			}
			p.advance()?;
			p.log("for");
			if !p.accept("(")? {
				p.error(1001);
			}
			if p.is_type() {
				p.variable()?;
			} else if p.check_identifier() {
				p.assignment()?;
			}
			p.for_separator(1002)?;

			let condition = p.generator.generate_label();
			let end = p.generator.generate_label();
			p.generator.add_label(&condition);
			if !p.check(";") {
				let line = p.line();
				if let Some(found) = p.probe() {
					p.analyzer.check_boolean(found, "for", line);
				}
				p.expression()?;
				p.generator.jump_if(&end, false);
			}
			p.for_separator(1003)?;

			let mark = p.generator.mark();
			if p.check_identifier() {
				p.assignment()?;
			}
			let step = p.generator.split_off(mark);
			if !p.accept(")")? {
				p.error(1004);
				p.skip_while(|p| !p.check(")") && !p.check("{") && !p.in_follow(Rule::Body));
				p.accept(")")?;
			}

			p.breakable(&end, Self::statement_block)?;
			p.generator.append(step);
			p.generator.jump(&condition);
			p.generator.add_label(&end);
			Ok(())
		})
	}

	fn for_separator(&mut self, code: u16) -> Result<(), ParserError> {
		if !self.accept(";")? {
			self.error(code);
			self.skip_while(|p| !p.check(";") && !p.check(")") && !p.check("{"));
			self.accept(";")?;
		}
		Ok(())
	}

	/// switch → "switch" "(" expression ")" "{" ( ( "case" expression | "default" ) ":" body )* "}"
	///
	/// The value is stored once in a hidden `switch.N` variable. Each case tests it and
	/// jumps to the next test on mismatch, a body that runs to its end falls through
	/// into the next body and `default` matches whenever it is reached.
	fn switch(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_SWITCH", |p| {
			if !p.expect(Rule::Switch, 1100) {
				return Ok(());
			}
			let keyword = p.advance()?;
			p.log("switch");
			if !p.accept("(")? {
				p.error(1101);
			}
			let r#type = if p.in_first(Rule::Expression) {
				let r#type = p.probe();
				p.expression()?;
				r#type
			} else {
				p.error(1102);
				None
			};
			if !p.accept(")")? {
				p.error(1103);
				p.skip_while(|p| !p.check(")") && !p.check("{") && !p.in_follow(Rule::Body));
				p.accept(")")?;
			}

			p.selectors += 1;
			let selector = format!("switch.{}", p.selectors);
			p.analyzer.declare_variable(r#type.unwrap_or(Type::Int), &selector, keyword.line);
			p.generator.store(&selector);
			if !p.accept("{")? {
				p.error(1104);
				p.skip_while(|p| !p.in_follow(Rule::Switch));
				return Ok(());
			}

			let end = p.generator.generate_label();
			p.breakable(&end, |p| p.cases(&selector, r#type))?;
			p.generator.add_label(&end);
			if !p.accept("}")? {
				p.error(1108);
			}
			Ok(())
		})
	}

	fn cases(&mut self, selector: &str, r#type: Option<Type>) -> Result<(), ParserError> {
		let mut next_test: Option<String> = None;
		let mut has_body = false;
		loop {
			let is_case = self.check("case");
			if !is_case && !self.check("default") {
				if self.peek().is_none() || self.check("}") {
					break;
				}
				self.error(1107);
				self.skip_while(|p| !p.check("case") && !p.check("default") && !p.check("}"));
				continue;
			}
			self.advance()?;
			self.log(if is_case { "case" } else { "default" });

			let body = self.generator.generate_label();
			if has_body {
				self.generator.jump(&body);
			}
			if let Some(test) = next_test.take() {
				self.generator.add_label(&test);
			}
			if is_case {
				if self.in_first(Rule::Expression) {
					let line = self.line();
					if let (Some(expected), Some(found)) = (r#type, self.probe()) {
						self.analyzer.check_operation(expected, found, Operator::Equal, line);
					}
					self.generator.load(selector);
					self.expression()?;
					self.generator.operation(Operation::Equal);
					let test = self.generator.generate_label();
					self.generator.jump_if(&test, false);
					next_test = Some(test);
				} else {
					self.error(1105);
					self.skip_while(|p| !p.check(":") && !p.in_follow(Rule::Body));
				}
			}
			if !self.accept(":")? {
				self.error(1106);
			}
			self.generator.add_label(&body);
			self.body()?;
			has_body = true;
		}
		if let Some(test) = next_test {
			self.generator.add_label(&test);
		}
		Ok(())
	}

	/// block → "{" body "}" | statement
	pub(super) fn statement_block(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_STATEMENT_BLOCK", |p| {
			if !p.expect(Rule::StatementBlock, 1200) {
				return Ok(());
			}
			if p.accept("{")? {
				p.body()?;
				if !p.accept("}")? {
					p.error(1201);
				}
				return Ok(());
			}
			p.statement()
		})
	}
}

#[cfg(test)]
mod tests {
	use super::super::tests::{codes, compile, instructions};
	use crate::error::semantic::SemanticError;

	#[test]
	fn missing_semicolon_reports_once() {
		let compilation = compile("int x = 5\nprintln(x);");
		assert_eq!(codes(&compilation), [1300]);
		assert!(compilation.semantic_errors.is_empty());
	}

	#[test]
	fn stray_tokens_are_skipped() {
		let compilation = compile("int x;\n) ) x = 2;\nprintln(x);");
		assert_eq!(codes(&compilation), [1303]);
		assert!(instructions(&compilation).contains(&"sto x, 0".to_string()));
	}

	#[test]
	fn variable_initializer() {
		let compilation = compile("float ratio = 0x10;");
		assert_eq!(instructions(&compilation), ["lit 16, 0", "sto ratio, 0", "opr 0, 0"]);
		assert_eq!(compilation.symbols.get("global", "ratio").map(|symbol| symbol.value.as_str()), Some("16"));
		assert_eq!(compilation.program.declarations, ["ratio, float, global, 0.0"]);
	}

	#[test]
	fn computed_initializer_keeps_default_value() {
		let compilation = compile("int x = 2 + 3;");
		assert_eq!(compilation.symbols.get("global", "x").map(|symbol| symbol.value.as_str()), Some("0"));
	}

	#[test]
	fn incompatible_initializer_is_reported_and_emitted() {
		let compilation = compile("int x = \"hello\";");
		assert!(compilation.syntax_errors.is_empty());
		assert_eq!(compilation.semantic_errors.len(), 1);
		assert_eq!(instructions(&compilation), ["lit \"hello\", 0", "sto x, 0", "opr 0, 0"]);
	}

	#[test]
	fn compound_assignment() {
		let compilation = compile("int x = 1;\nx += 4;\nx *= 2;\nx++;\nx--;");
		assert!(compilation.semantic_errors.is_empty());
		assert_eq!(instructions(&compilation), [
			"lit 1, 0", "sto x, 0", "lod x, 0", "lit 4, 0", "opr 2, 0", "sto x, 0", "lod x, 0", "lit 2, 0", "opr 4, 0",
			"sto x, 0", "lod x, 0", "lit 1, 0", "opr 2, 0", "sto x, 0", "lod x, 0", "lit 1, 0", "opr 3, 0", "sto x, 0",
			"opr 0, 0",
		]);
	}

	#[test]
	fn compound_assignment_on_string() {
		let compilation = compile("string s;\ns += 1;\ns -= 1;");
		let messages: Vec<String> = compilation.semantic_errors.iter().map(ToString::to_string).collect();
		assert_eq!(messages, ["Incompatible types 'string' and 'int' for operator '-' at line 3"]);
	}

	#[test]
	fn undeclared_assignment() {
		let compilation = compile("y = 1;");
		assert_eq!(compilation.semantic_errors, [SemanticError::Undeclared { name: "y".to_string(), line: 1 }]);
	}

	#[test]
	fn while_lowering() {
		let compilation = compile("int i = 0;\nwhile (i < 3) {\n  println(i);\n  i = i + 1;\n}");
		assert!(compilation.syntax_errors.is_empty());
		assert!(compilation.semantic_errors.is_empty());
		assert_eq!(instructions(&compilation), [
			"lit 0, 0",
			"sto i, 0",
			"lod i, 0",
			"lit 3, 0",
			"opr 12, 0",
			"jmc #label2, 0",
			"lod i, 0",
			"opr 21, 0",
			"lod i, 0",
			"lit 1, 0",
			"opr 2, 0",
			"sto i, 0",
			"jmp #label1, 0",
			"opr 0, 0",
		]);
		assert_eq!(compilation.program.labels.get("#label1"), Some(&3));
		assert_eq!(compilation.program.labels.get("#label2"), Some(&14));
	}

	#[test]
	fn non_boolean_condition() {
		let compilation = compile("int i = 1;\nwhile (i) { i = 0; }");
		assert_eq!(compilation.semantic_errors, [SemanticError::NonBooleanCondition {
			context: "while".to_string(),
			found: crate::semantic::Type::Int,
			line: 2,
		}]);
	}

	#[test]
	fn if_else_lowering() {
		let compilation = compile("if (1 > 2) { println(1); } else { println(2); }");
		assert_eq!(instructions(&compilation), [
			"lit 1, 0",
			"lit 2, 0",
			"opr 11, 0",
			"jmc #label1, 0",
			"lit 1, 0",
			"opr 21, 0",
			"jmp #label2, 0",
			"lit 2, 0",
			"opr 21, 0",
			"opr 0, 0",
		]);
		assert_eq!(compilation.program.labels.get("#label1"), Some(&8));
		assert_eq!(compilation.program.labels.get("#label2"), Some(&10));
	}

	#[test]
	fn do_while_lowering() {
		let compilation = compile("int n = 0;\ndo { n++; } while (n < 2);");
		assert!(compilation.syntax_errors.is_empty());
		assert_eq!(instructions(&compilation), [
			"lit 0, 0", "sto n, 0", "lod n, 0", "lit 1, 0", "opr 2, 0", "sto n, 0", "lod n, 0", "lit 2, 0", "opr 12, 0",
			"jmc #label1, 1", "opr 0, 0",
		]);
		assert_eq!(compilation.program.labels.get("#label1"), Some(&3));
	}

	#[test]
	fn for_emits_step_after_body() {
		let compilation = compile("for (int i = 0; i < 2; i++) println(i);");
		assert!(compilation.syntax_errors.is_empty(), "{:?}", compilation.syntax_errors);
		assert_eq!(instructions(&compilation), [
			"lit 0, 0",
			"sto i, 0",
			"lod i, 0",
			"lit 2, 0",
			"opr 12, 0",
			"jmc #label2, 0",
			"lod i, 0",
			"opr 21, 0",
			"lod i, 0",
			"lit 1, 0",
			"opr 2, 0",
			"sto i, 0",
			"jmp #label1, 0",
			"opr 0, 0",
		]);
	}

	#[test]
	fn switch_uses_hidden_selector() {
		let compilation = compile("int k = 2;\nswitch (k) {\n  case 1: println(1); break;\n  default: println(0);\n}");
		assert!(compilation.syntax_errors.is_empty(), "{:?}", compilation.syntax_errors);
		assert!(compilation.semantic_errors.is_empty(), "{:?}", compilation.semantic_errors);
		assert!(compilation.symbols.contains("global", "switch.1"));
		assert_eq!(instructions(&compilation), [
			"lit 2, 0",
			"sto k, 0",
			"lod k, 0",
			"sto switch.1, 0",
			"lod switch.1, 0",
			"lit 1, 0",
			"opr 15, 0",
			"jmc #label3, 0",
			"lit 1, 0",
			"opr 21, 0",
			"jmp #label1, 0",
			"jmp #label4, 0",
			"lit 0, 0",
			"opr 21, 0",
			"opr 0, 0",
		]);
	}

	#[test]
	fn case_type_must_match() {
		let compilation = compile("int k = 2;\nswitch (k) { case \"a\": break; }");
		assert_eq!(compilation.semantic_errors.len(), 1);
		assert!(matches!(compilation.semantic_errors[0], SemanticError::IncompatibleTypes { line: 2, .. }));
	}

	#[test]
	fn break_outside_loop() {
		let compilation = compile("break;");
		assert_eq!(compilation.semantic_errors, [SemanticError::BreakOutsideLoop { line: 1 }]);
	}

	#[test]
	fn print_and_input() {
		let compilation = compile("string name;\ninputln(name);\nprint(\"hi \");\nprintln(name);\nprintln();");
		assert!(compilation.syntax_errors.is_empty());
		assert_eq!(instructions(&compilation), [
			"opr 22, 0",
			"sto name, 0",
			"lit \"hi \", 0",
			"opr 20, 0",
			"lod name, 0",
			"opr 21, 0",
			"lit \"\", 0",
			"opr 21, 0",
			"opr 0, 0",
		]);
	}

	#[test]
	fn missing_condition_paren() {
		let compilation = compile("int i = 0;\nwhile (i < 3 { i++; }");
		assert_eq!(codes(&compilation), [30]);
	}

	#[test]
	fn call_statement_emits_nothing() {
		let source = "class A {\n  void greet(string who) { println(who); }\n  void main() { greet(\"bob\"); }\n}";
		let compilation = compile(source);
		assert!(compilation.semantic_errors.is_empty());
		assert_eq!(instructions(&compilation), ["lod who, 0", "opr 21, 0", "opr 0, 0"]);
	}
}

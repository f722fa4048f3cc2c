//! A predictive recursive descent parser that analyzes and generates code in the
//! same single pass.
//!
//! ``` BNF
//! program        → "{" body "}" | "class" IDENTIFIER "{" member* "}" | body ;
//! member         → method | variable ";" ;
//! method         → type IDENTIFIER "(" params ")" "{" body "}" ;
//! params         → ( type IDENTIFIER ( "," type IDENTIFIER )* )? ;
//! body           → statement* ;
//! statement      → variable ";" | assignment ";" | call ";" | println ";" | inputln ";"
//!                | break ";" | return | while | if | do_while | for | switch
//!                | "{" body "}" | expression ";" ;
//! variable       → type IDENTIFIER ( "=" expression )? ;
//! assignment     → IDENTIFIER ( "=" | "+=" | "-=" | "*=" | "/=" ) expression
//!                | IDENTIFIER ( "++" | "--" ) ;
//! call           → IDENTIFIER "(" ( expression ( "," expression )* )? ")" ;
//! println        → ( "println" | "print" ) "(" expression? ")" ;
//! inputln        → "inputln" "(" IDENTIFIER ")" ;
//! return         → "return" expression? ";" ;
//! while          → "while" "(" expression ")" block ;
//! if             → "if" "(" expression ")" block ( "else" ( if | block ) )? ;
//! do_while       → "do" block "while" "(" expression ")" ";" ;
//! for            → "for" "(" ( variable | assignment )? ";" expression? ";" assignment? ")" block ;
//! switch         → "switch" "(" expression ")" "{" ( ( "case" expression | "default" ) ":" body )* "}" ;
//! block          → "{" body "}" | statement ;
//! expression     → x ( "||" x )* ;
//! x              → y ( "&&" y )* ;
//! y              → "!" y | r ;
//! r              → e ( ( "<" | ">" | "<=" | ">=" | "==" | "!=" ) e )? ;
//! e              → a ( ( "+" | "-" ) a )* ;
//! a              → b ( ( "*" | "/" ) b )* ;
//! b              → "-"? c ;
//! c              → IDENTIFIER | call | LITERAL | "(" expression ")" ;
//! ```
//!
//! # Error recovery
//!
//! A rule whose lookahead is not in its FIRST set reports a numbered diagnostic and
//! skips tokens until one lies in FIRST (the rule resumes) or in FOLLOW (the rule is
//! abandoned and its caller carries on). Parsing always runs to the end of input.
//! Only internal failures escape a rule as [`ParserError`], [`Parser::parse`] turns
//! them into one terminal diagnostic.
//!
//! # Trace
//!
//! Every rule entry and consumed token is logged with two spaces of indentation per
//! nesting level, which gives the parse tree as a flat list of lines.
mod expression;
mod grammar;
mod probe;
mod statement;

use std::fmt::Display;

use anyhow::anyhow;
use grammar::{Rule, TYPES, contains};
use log::{debug, info, warn};
use probe::TypeProbe;

use crate::{
	codegen::{CodeGenerator, Program},
	error::{
		parser::{ParserError, SyntaxError},
		semantic::SemanticError,
	},
	scanner::Token,
	semantic::{Analyzer, Method, SymbolTable, Type},
};

/// Everything a compile produces.
#[derive(Debug, Clone)]
pub struct Compilation {
	/// Parse tree trace, one indented line per rule or token
	pub trace:           Vec<String>,
	pub syntax_errors:   Vec<SyntaxError>,
	pub semantic_errors: Vec<SemanticError>,
	/// Declared variables in declaration order, followed by resolved labels
	pub symbols:         SymbolTable,
	pub program:         Program,
}

impl Compilation {
	/// The bytecode text of the program.
	pub fn bytecode(&self) -> String { self.program.to_string() }
}

pub struct Parser<'t> {
	tokens:     &'t [Token],
	cursor:     usize,
	depth:      usize,
	trace:      Vec<String>,
	errors:     Vec<SyntaxError>,
	analyzer:   Analyzer,
	generator:  CodeGenerator,
	/// End labels of the enclosing loops and switches, innermost last
	breaks:     Vec<String>,
	/// Return type of the method being parsed
	returns:    Option<Type>,
	/// Hidden variables holding switch values
	selectors:  usize,
}

impl<'t> Parser<'t> {
	pub fn new(tokens: &'t [Token]) -> Self {
		Self {
			tokens,
			cursor: 0,
			depth: 0,
			trace: Vec::new(),
			errors: Vec::new(),
			analyzer: Analyzer::new(),
			generator: CodeGenerator::new(),
			breaks: Vec::new(),
			returns: None,
			selectors: 0,
		}
	}

	pub fn parse(mut self) -> Compilation {
		let result = self.program();
		self.finish(result)
	}

	/// Turn the outcome of the program rule into a compilation. An internal failure
	/// ends parsing with a critical diagnostic.
	fn finish(mut self, result: Result<(), ParserError>) -> Compilation {
		match result {
			Ok(()) => {
				if self.cursor < self.tokens.len() {
					self.error(999);
				}
			}
			Err(ParserError::InternalError(e)) => {
				warn!("Critical error during parsing: {e}");
				self.errors.push(SyntaxError::Critical(e.to_string()));
			}
		}
		info!("Parsed {} tokens with {} syntax errors", self.tokens.len(), self.errors.len());

		let (mut symbols, semantic_errors) = self.analyzer.into_parts();
		let program = self.generator.assemble(&symbols);
		for label in program.label_symbols() {
			symbols.insert(label);
		}
		Compilation { trace: self.trace, syntax_errors: self.errors, semantic_errors, symbols, program }
	}

	/// program → "{" body "}" | "class" IDENTIFIER "{" member* "}" | body
	fn program(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_PROGRAM", |p| {
			let recognized = p.peek().is_none() || p.check("{") || p.check("class") || p.starts_statement();
			if !recognized && !p.expect(Rule::Program, 200) {
				return Ok(());
			}
			if p.accept("{")? {
				p.body()?;
				if !p.accept("}")? {
					p.error(202);
					p.skip_while(|_| true);
				}
				Ok(())
			} else if p.accept("class")? {
				p.class()
			} else {
				p.body()
			}
		})
	}

	fn class(&mut self) -> Result<(), ParserError> {
		if self.check_identifier() {
			let name = self.advance()?;
			self.log(format!("IDENTIFIER: {}", name.value));
		} else if !self.recover(Rule::StatementBlock, 201) {
			return Ok(());
		}
		if !self.accept("{")? {
			self.error(203);
			return Ok(());
		}
		while self.peek().is_some() && !self.check("}") {
			if !self.is_type() {
				self.error(204);
				self.skip_while(|p| !p.is_type() && !p.check("}"));
			} else if self.is_method_declaration() {
				self.method()?;
			} else {
				self.variable()?;
				if !self.accept(";")? {
					self.error(1300);
					self.skip_while(|p| !p.is_type() && !p.check("}"));
				}
			}
		}
		if !self.accept("}")? {
			self.error(202);
		}
		Ok(())
	}

	/// method → type IDENTIFIER "(" params ")" "{" body "}"
	fn method(&mut self) -> Result<(), ParserError> {
		self.rule("RULE_METHODS", |p| {
			if !p.expect(Rule::Methods, 700) {
				return Ok(());
			}
			let return_type = p.r#type()?;
			let name = if p.check_identifier() {
				let name = p.advance()?;
				p.log(format!("IDENTIFIER: {}", name.value));
				Some(name)
			} else {
				p.error(8);
				p.skip_while(|p| !p.check("(") && !p.in_follow(Rule::Methods));
				if !p.check("(") {
					return Ok(());
				}
				None
			};
			if !p.accept("(")? {
				p.error(12);
				p.skip_while(|p| !p.in_follow(Rule::Methods));
				return Ok(());
			}
			let parameters = p.params()?;

			let scope = name.map_or("method", |name| name.value.as_str());
			if let (Some(name), Some(return_type)) = (name, return_type) {
				let parameters = parameters.iter().map(|(r#type, token)| (*r#type, token.value.clone())).collect();
				let method = Method { return_type, name: name.value.clone(), parameters };
				p.analyzer.declare_method(method, name.line);
			}
			p.analyzer.enter(scope);
			for (r#type, parameter) in &parameters {
				p.analyzer.declare_variable(*r#type, &parameter.value, parameter.line);
			}
			p.returns = return_type;
			let result = p.method_body();
			p.returns = None;
			p.analyzer.exit();
			result
		})
	}

	fn method_body(&mut self) -> Result<(), ParserError> {
		if !self.accept(")")? {
			self.error(9);
			self.skip_while(|p| !p.check("{") && !p.in_follow(Rule::Methods));
			if !self.check("{") {
				return Ok(());
			}
		}
		if self.accept("{")? {
			self.body()?;
			if !self.accept("}")? {
				self.error(10);
				self.skip_while(|p| !p.in_follow(Rule::Methods));
			}
		} else {
			self.error(11);
			self.skip_while(|p| !p.in_follow(Rule::Methods));
		}
		Ok(())
	}

	/// params → ( type IDENTIFIER ( "," type IDENTIFIER )* )?
	fn params(&mut self) -> Result<Vec<(Type, &'t Token)>, ParserError> {
		self.rule("RULE_PARAMS", |p| {
			let mut parameters = Vec::new();
			if p.check(")") || !p.expect(Rule::Params, 600) {
				return Ok(parameters);
			}
			if !p.parameter(&mut parameters, 13)? {
				return Ok(parameters);
			}
			while p.accept(",")? {
				let complete = if p.is_type() {
					p.parameter(&mut parameters, 14)?
				} else {
					p.error(15);
					p.skip_parameter()
				};
				if !complete {
					break;
				}
			}
			Ok(parameters)
		})
	}

	/// Parse `type IDENTIFIER`. Returns `false` when the parameter list cannot go on.
	fn parameter(&mut self, parameters: &mut Vec<(Type, &'t Token)>, code: u16) -> Result<bool, ParserError> {
		let r#type = self.r#type()?;
		if !self.check_identifier() {
			self.error(code);
			return Ok(self.skip_parameter());
		}
		let name = self.advance()?;
		self.log(format!("IDENTIFIER: {}", name.value));
		if let Some(r#type) = r#type {
			parameters.push((r#type, name));
		}
		Ok(true)
	}

	/// Skip to the next `,` or `)` of a parameter list.
	fn skip_parameter(&mut self) -> bool {
		self.skip_while(|p| !p.check(",") && !p.check(")"));
		self.check(",") || self.check(")")
	}

	/// type → "int" | "float" | "void" | "char" | "string" | "boolean"
	fn r#type(&mut self) -> Result<Option<Type>, ParserError> {
		self.rule("RULE_TYPE", |p| {
			if !p.expect(Rule::Type, 300) {
				return Ok(None);
			}
			let token = p.advance()?;
			p.log(&token.value);
			Ok(Type::from_keyword(&token.value))
		})
	}
}

/// Cursor, trace and recovery plumbing shared by the rules.
impl<'t> Parser<'t> {
	/// Run `body` as a traced rule one level deeper.
	fn rule<T>(&mut self, name: &str, body: impl FnOnce(&mut Self) -> Result<T, ParserError>) -> Result<T, ParserError> {
		self.log(name);
		self.depth += 1;
		let result = body(self);
		self.depth -= 1;
		result
	}

	fn log(&mut self, entry: impl Display) {
		let line = format!("{}{entry}", "  ".repeat(self.depth));
		debug!("{line}");
		self.trace.push(line);
	}

	fn peek(&self) -> Option<&'t Token> { self.tokens.get(self.cursor) }

	fn peek_at(&self, offset: usize) -> Option<&'t Token> { self.tokens.get(self.cursor + offset) }

	fn advance(&mut self) -> Result<&'t Token, ParserError> {
		let token = self.tokens.get(self.cursor).ok_or_else(|| anyhow!("Unexpected EOF"))?;
		self.cursor += 1;
		Ok(token)
	}

	fn check(&self, symbol: &str) -> bool { self.peek().is_some_and(|token| token.is(symbol)) }

	fn check_identifier(&self) -> bool { self.peek().is_some_and(Token::is_identifier) }

	/// Consume and log the lookahead if it is `symbol`.
	fn accept(&mut self, symbol: &str) -> Result<bool, ParserError> {
		if !self.check(symbol) {
			return Ok(false);
		}
		self.advance()?;
		self.log(symbol);
		Ok(true)
	}

	fn is_type(&self) -> bool { TYPES.iter().any(|r#type| self.check(r#type)) }

	fn is_method_declaration(&self) -> bool {
		self.is_type()
			&& self.peek_at(1).is_some_and(Token::is_identifier)
			&& self.peek_at(2).is_some_and(|token| token.is("("))
	}

	/// Whether the lookahead can begin a statement.
	fn starts_statement(&self) -> bool {
		const KEYWORDS: [&str; 11] =
			["println", "print", "inputln", "return", "while", "if", "do", "for", "switch", "break", "{"];
		self.is_type() || self.check_identifier() || KEYWORDS.iter().any(|keyword| self.check(keyword))
	}

	fn in_first(&self, rule: Rule) -> bool { contains(rule.first(), self.peek()) }

	fn in_follow(&self, rule: Rule) -> bool { contains(rule.follow(), self.peek()) }

	/// Whether the rule can go on: the lookahead is in FIRST, possibly after recovery.
	fn expect(&mut self, rule: Rule, code: u16) -> bool { self.in_first(rule) || self.recover(rule, code) }

	/// Panic mode: report `code`, then skip tokens until one is in FIRST(rule), returning
	/// `true`, or in FOLLOW(rule) or the end of input, returning `false`.
	fn recover(&mut self, rule: Rule, code: u16) -> bool {
		self.error(code);
		while self.peek().is_some() {
			if self.in_first(rule) {
				return true;
			}
			if self.in_follow(rule) {
				return false;
			}
			self.cursor += 1;
		}
		false
	}

	/// Skip tokens while `skip` holds.
	fn skip_while(&mut self, skip: impl Fn(&Self) -> bool) {
		while self.peek().is_some() && skip(self) {
			self.cursor += 1;
		}
	}

	fn error(&mut self, code: u16) {
		let error = SyntaxError::new(code, self.peek());
		warn!("{error}");
		self.errors.push(error);
	}

	/// The expected type of the expression at the cursor, without consuming it.
	fn probe(&self) -> Option<Type> { TypeProbe::new(self.tokens, self.cursor, &self.analyzer).expression() }

	fn line(&self) -> usize {
		self.peek().or_else(|| self.tokens.last()).map_or(0, |token| token.line)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::scanner::tokenize;

	pub(super) fn compile(source: &str) -> Compilation {
		let tokens = tokenize(source);
		Parser::new(&tokens).parse()
	}

	pub(super) fn codes(compilation: &Compilation) -> Vec<u16> {
		compilation.syntax_errors.iter().filter_map(SyntaxError::code).collect()
	}

	pub(super) fn instructions(compilation: &Compilation) -> Vec<String> {
		compilation.program.instructions.iter().map(ToString::to_string).collect()
	}

	#[test]
	fn block_program() {
		let compilation = compile("{ int x; x = 5; }");
		assert!(compilation.syntax_errors.is_empty());
		assert!(compilation.semantic_errors.is_empty());
		assert_eq!(instructions(&compilation), ["lit 5, 0", "sto x, 0", "opr 0, 0"]);
	}

	#[test]
	fn class_program() {
		let source = "class Counter {\n  int total = 3;\n  void main() {\n    total = total + 1;\n    println(total);\n  }\n}";
		let compilation = compile(source);
		assert!(compilation.syntax_errors.is_empty(), "{:?}", compilation.syntax_errors);
		assert!(compilation.semantic_errors.is_empty(), "{:?}", compilation.semantic_errors);
		assert_eq!(instructions(&compilation), [
			"lit 3, 0", "sto total, 0", "lod total, 0", "lit 1, 0", "opr 2, 0", "sto total, 0", "lod total, 0",
			"opr 21, 0", "opr 0, 0",
		]);
		assert_eq!(compilation.symbols.get("global", "total").map(|symbol| symbol.value.as_str()), Some("3"));
	}

	#[test]
	fn trace_is_indented() {
		let compilation = compile("int x;");
		assert_eq!(compilation.trace[0], "RULE_PROGRAM");
		assert_eq!(compilation.trace[1], "  RULE_BODY");
		assert!(compilation.trace.contains(&"      RULE_TYPE".to_string()));
		assert!(compilation.trace.contains(&"        int".to_string()));
		assert!(compilation.trace.contains(&"      IDENTIFIER: x".to_string()));
	}

	#[test]
	fn method_parameters_live_in_method_scope() {
		let source = "class A {\n  int twice(int n) {\n    return n * 2;\n  }\n  void main() {\n    int r = twice(4);\n    println(n);\n  }\n}";
		let compilation = compile(source);
		assert!(compilation.syntax_errors.is_empty(), "{:?}", compilation.syntax_errors);
		assert!(compilation.symbols.contains("twice", "n"));
		assert!(compilation.symbols.contains("main", "r"));
		assert_eq!(compilation.semantic_errors, [SemanticError::Undeclared { name: "n".to_string(), line: 7 }]);
	}

	#[test]
	fn call_checks() {
		let source = "class A {\n  void show(int a, string b) { println(b); }\n  void main() {\n    show(1);\n    show(\"x\", \"y\");\n    hide();\n  }\n}";
		let compilation = compile(source);
		assert!(compilation.syntax_errors.is_empty(), "{:?}", compilation.syntax_errors);
		let messages: Vec<String> = compilation.semantic_errors.iter().map(ToString::to_string).collect();
		assert_eq!(messages, [
			"Method 'show' expects 2 parameters but got 1 at line 4",
			"Parameter 1 of method 'show' expects 'int' but got 'string' at line 5",
			"Method 'hide' is not declared at line 6",
		]);
	}

	#[test]
	fn return_checks() {
		let source = "class A {\n  void a() { return 1; }\n  int b() { return; }\n  int c() { return \"s\"; }\n  float d() { return 2; }\n}";
		let compilation = compile(source);
		assert!(compilation.syntax_errors.is_empty(), "{:?}", compilation.syntax_errors);
		assert_eq!(compilation.semantic_errors, [
			SemanticError::VoidReturnsValue { line: 2 },
			SemanticError::MissingReturnValue { expected: Type::Int, line: 3 },
			SemanticError::ReturnMismatch { expected: Type::Int, found: Type::Str, line: 4 },
		]);
	}

	#[test]
	fn missing_class_brace() {
		let compilation = compile("class A int x;");
		assert_eq!(codes(&compilation), [203, 999]);
	}

	#[test]
	fn invalid_class_member() {
		let compilation = compile("class A { x = 1; int y; }");
		assert_eq!(codes(&compilation), [204]);
		assert!(compilation.symbols.contains("global", "y"));
	}

	#[test]
	fn trailing_tokens() {
		let compilation = compile("{ int x; } x");
		assert_eq!(codes(&compilation), [999]);
	}

	#[test]
	fn unclosed_block_program() {
		let compilation = compile("{ int x;");
		assert_eq!(codes(&compilation), [202]);
		assert!(matches!(compilation.syntax_errors[0], SyntaxError::EndOfFile { code: 202 }));
	}

	#[test]
	fn internal_failure_becomes_critical_diagnostic() {
		let tokens = tokenize("{ int x; }");
		let mut parser = Parser::new(&tokens[..0]);
		let Err(e) = parser.advance() else { panic!("advance past the end must fail") };
		let compilation = Parser::new(&tokens).finish(Err(e));
		assert_eq!(compilation.syntax_errors, [SyntaxError::Critical("Unexpected EOF".to_string())]);
		assert_eq!(codes(&compilation), Vec::<u16>::new());
	}

	#[test]
	fn empty_program() {
		let compilation = compile("");
		assert!(compilation.syntax_errors.is_empty());
		assert_eq!(compilation.bytecode(), "@\nopr 0, 0\n");
	}
}

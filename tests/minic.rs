#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use minic::{
		Minic, MinicError, RunConfig, TokenKind, Value,
		error::{interpreter::RuntimeError, semantic::SemanticError},
		scanner::format_source,
		tokenize,
	};

	fn program(name: &str) -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("programs").join(name) }

	fn output(source: &str) -> String {
		let report = Minic.run(source, &RunConfig::default()).unwrap();
		assert!(report.compilation.syntax_errors.is_empty(), "{:?}", report.compilation.syntax_errors);
		report.execution.unwrap().output
	}

	#[test]
	fn token_table() {
		let tokens = tokenize("while (count < 0b101) total = 3.14 + 42;");
		let table: Vec<_> = tokens.iter().map(|token| (token.value.as_str(), token.kind)).collect();
		assert_eq!(table, [
			("while", TokenKind::Keyword),
			("(", TokenKind::Delimiter),
			("count", TokenKind::Identifier),
			("<", TokenKind::Operator),
			("0b101", TokenKind::Binary),
			(")", TokenKind::Delimiter),
			("total", TokenKind::Identifier),
			("=", TokenKind::Operator),
			("3.14", TokenKind::Float),
			("+", TokenKind::Operator),
			("42", TokenKind::Integer),
			(";", TokenKind::Delimiter),
		]);
	}

	#[test]
	fn declaration_defaults_and_runtime_value() {
		let report = Minic.run("int x;\nx = 5;", &RunConfig::default()).unwrap();
		let symbol = report.compilation.symbols.get("global", "x").unwrap();
		assert_eq!(symbol.value, "0");
		let execution = report.execution.unwrap();
		assert_eq!(execution.variables.get("x"), Ok(&Value::Int(5)));
	}

	#[test]
	fn print_sum() {
		let (_, compilation) = Minic.compile("println(3 + 5);").unwrap();
		let bytecode = compilation.bytecode();
		assert!(bytecode.contains("opr 2, 0\nopr 21, 0\n"), "{bytecode}");
		assert_eq!(output("println(3 + 5);"), "8\n");
	}

	#[test]
	fn while_loop() {
		assert_eq!(output("int i = 0;\nwhile (i < 3) {\n  println(i);\n  i++;\n}"), "0\n1\n2\n");
	}

	#[test]
	fn semantic_errors_do_not_stop_execution() {
		let report = Minic.run("int x;\nx = \"hello\";\nprintln(x);", &RunConfig::default()).unwrap();
		assert!(matches!(report.compilation.semantic_errors.as_slice(), [SemanticError::IncompatibleTypes { line: 2, .. }]));
		assert_eq!(report.execution.unwrap().output, "hello\n");
	}

	#[test]
	fn syntax_errors_skip_execution() {
		let report = Minic.run("int x = 5\nprintln(x);", &RunConfig::default()).unwrap();
		assert_eq!(report.compilation.syntax_errors.len(), 1);
		assert!(report.execution.is_none());
	}

	#[test]
	fn lexical_errors_skip_parsing() {
		assert!(matches!(Minic.compile("int x = 3abc;\nint y = 0b2;"), Err(MinicError::LexicalErrors(2))));
	}

	#[test]
	fn runtime_fault_keeps_earlier_output() {
		let report = Minic.run("int x = 0;\nprintln(\"before\");\nprintln(10 / x);", &RunConfig::default()).unwrap();
		let execution = report.execution.unwrap();
		assert_eq!(execution.output, "before\n");
		assert_eq!(execution.error, Some(RuntimeError::DivisionByZero));
	}

	#[test]
	fn for_loop_with_compound_assignment() {
		assert_eq!(output("int sum = 0;\nfor (int i = 1; i <= 4; i++) {\n  sum += i;\n}\nprintln(sum);"), "10\n");
	}

	#[test]
	fn break_leaves_loop() {
		let source = "int i = 0;\nwhile (true) {\n  if (i == 2) {\n    break;\n  }\n  println(i);\n  i += 1;\n}\nprintln(\"done\");";
		assert_eq!(output(source), "0\n1\ndone\n");
	}

	#[test]
	fn boolean_variables_hold_comparison_results() {
		let source = "boolean b = 1 < 2;\nboolean c = true;\nif (b == true) {\n  println(\"yes\");\n} else {\n  println(\"no\");\n}\nif (b == c) {\n  println(\"same\");\n}";
		let report = Minic.run(source, &RunConfig::default()).unwrap();
		assert!(report.compilation.semantic_errors.is_empty(), "{:?}", report.compilation.semantic_errors);
		assert_eq!(report.execution.unwrap().output, "yes\nsame\n");
	}

	#[test]
	fn switch_selector_does_not_clash_with_user_names() {
		let source = "int $switch1 = 4;\nswitch (2) {\n  case 2:\n    println($switch1);\n}";
		let report = Minic.run(source, &RunConfig::default()).unwrap();
		assert!(report.compilation.semantic_errors.is_empty(), "{:?}", report.compilation.semantic_errors);
		assert_eq!(report.execution.unwrap().output, "4\n");
	}

	#[test]
	fn oversized_integer_literal_is_reported() {
		let report = Minic.run("int x = 99999999999999999999;\nint y = 9223372036854775807;", &RunConfig::default()).unwrap();
		assert!(matches!(
			report.compilation.semantic_errors.as_slice(),
			[SemanticError::IntegerOutOfRange { line: 1, .. }]
		));
	}

	#[test]
	fn calls_evaluate_to_default_of_return_type() {
		let source = "class A {\n  int twice(int n) {\n    return n * 2;\n  }\n  void main() {\n    int r = twice(4);\n    println(r);\n  }\n}";
		let report = Minic.run(source, &RunConfig::default()).unwrap();
		assert!(report.compilation.semantic_errors.is_empty(), "{:?}", report.compilation.semantic_errors);
		assert_eq!(report.execution.unwrap().output, "0\n");
	}

	#[test]
	fn bytecode_round_trip() {
		let source = "string name = \"a, b\";\nchar c = 'z';\nprintln(name + c);";
		let (_, compilation) = Minic.compile(source).unwrap();
		let execution = Minic.execute(&compilation.bytecode(), &RunConfig::default()).unwrap();
		assert_eq!(execution.output, "a, bz\n");
	}

	#[test]
	fn handwritten_bytecode() {
		let bytecode = "s, string, global, \"\"\n@\nlit \"x, y\", 0\nsto s, 0\nlod s, 0\nopr 21, 0\nopr 0, 0\n";
		let execution = Minic.execute(bytecode, &RunConfig::default()).unwrap();
		assert_eq!(execution.output, "x, y\n");
		assert!(execution.halted);
		assert!(matches!(Minic.execute("lit 1, 0\n", &RunConfig::default()), Err(MinicError::LoadError(_))));
	}

	#[test]
	fn fibonacci_program() {
		let report = Minic.run_file(program("fibonacci.mc"), &RunConfig::default()).unwrap();
		assert!(report.compilation.syntax_errors.is_empty());
		assert!(report.compilation.semantic_errors.is_empty());
		assert_eq!(report.execution.unwrap().output, "0 1 1 2 3 5 8 13 \n");
	}

	#[test]
	fn grades_program_reads_input() {
		let config = RunConfig { input: vec!["90".into(), "80".into(), "100".into()], ..RunConfig::default() };
		let report = Minic.run_file(program("grades.mc"), &config).unwrap();
		assert!(report.compilation.syntax_errors.is_empty(), "{:?}", report.compilation.syntax_errors);
		assert!(report.compilation.semantic_errors.is_empty(), "{:?}", report.compilation.semantic_errors);
		let execution = report.execution.unwrap();
		assert_eq!(execution.output_lines(), ["average: 90.0", "A", "honors"]);
		assert_eq!(execution.variables.get("total"), Ok(&Value::Int(270)));
	}

	#[test]
	fn countdown_program() {
		let report = Minic.run_file(program("countdown.mc"), &RunConfig::default()).unwrap();
		assert!(report.compilation.syntax_errors.is_empty());
		let execution = report.execution.unwrap();
		assert_eq!(execution.output, "3*2*1*\nliftoff\n");
		assert_eq!(execution.variables.get("done"), Ok(&Value::Bool(true)));
	}

	#[test]
	fn formatted_program_compiles_the_same() {
		let tokens = Minic.tokenize_file(program("grades.mc")).unwrap();
		let formatted = format_source(&tokens);
		let (_, original) = Minic.compile_file(program("grades.mc")).unwrap();
		let (_, reformatted) = Minic.compile(&formatted).unwrap();
		assert_eq!(original.bytecode(), reformatted.bytecode());
	}

	#[test]
	fn missing_file() {
		assert!(matches!(Minic.run_file(program("missing.mc"), &RunConfig::default()), Err(MinicError::InternalError(_))));
	}
}

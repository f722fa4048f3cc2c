//! Static checks run by the parser while it recognizes constructs.
//!
//! The analyzer owns the scope stack, the symbol table and the method table. Every
//! problem it finds is recorded as a [`SemanticError`] and the check returns its best
//! guess, so code generation always carries on.
mod cube;
mod symbol;

pub use cube::{Operator, Type, cube};
use indexmap::IndexMap;
use log::warn;
pub use symbol::{Method, Symbol, SymbolKey, SymbolTable};

use crate::error::semantic::SemanticError;

pub const GLOBAL: &str = "global";

pub struct Analyzer {
	scopes:  Vec<String>,
	symbols: SymbolTable,
	methods: IndexMap<String, Method>,
	errors:  Vec<SemanticError>,
}

impl Default for Analyzer {
	fn default() -> Self { Self::new() }
}

impl Analyzer {
	pub fn new() -> Self {
		Self { scopes: vec![GLOBAL.to_string()], symbols: SymbolTable::new(), methods: IndexMap::new(), errors: Vec::new() }
	}

	pub fn scope(&self) -> &str { self.scopes.last().map_or(GLOBAL, String::as_str) }

	pub fn enter(&mut self, scope: &str) { self.scopes.push(scope.to_string()); }

	/// Leave the current scope, the global scope is never left.
	pub fn exit(&mut self) {
		if self.scopes.len() > 1 {
			self.scopes.pop();
		}
	}

	pub fn report(&mut self, error: SemanticError) {
		warn!("Semantic Error: {error}");
		self.errors.push(error);
	}

	pub fn declare_variable(&mut self, r#type: Type, name: &str, line: usize) -> bool {
		let symbol = Symbol::new(name, r#type, self.scope());
		if self.symbols.insert(symbol) {
			return true;
		}
		let scope = self.scope().to_string();
		self.report(SemanticError::AlreadyDeclared { name: name.to_string(), scope, line });
		false
	}

	/// Type of a variable visible from the current scope, without reporting anything.
	pub fn lookup(&self, name: &str) -> Option<Type> {
		self.symbols.get(self.scope(), name).or_else(|| self.symbols.get(GLOBAL, name)).map(|symbol| symbol.r#type)
	}

	pub fn use_variable(&mut self, name: &str, line: usize) -> Option<Type> {
		let found = self.lookup(name);
		if found.is_none() {
			self.report(SemanticError::Undeclared { name: name.to_string(), line });
		}
		found
	}

	pub fn check_operation(&mut self, left: Type, right: Type, operator: Operator, line: usize) -> Option<Type> {
		let result = cube(left, right, operator);
		if result.is_none() {
			self.report(SemanticError::IncompatibleTypes { left, right, operator, line });
		}
		result
	}

	pub fn check_assignment(&mut self, target: Type, value: Type, line: usize) -> bool {
		self.check_operation(target, value, Operator::Assign, line).is_some()
	}

	pub fn check_boolean(&mut self, found: Type, context: &str, line: usize) -> bool {
		if found == Type::Boolean {
			return true;
		}
		self.report(SemanticError::NonBooleanCondition { context: context.to_string(), found, line });
		false
	}

	pub fn declare_method(&mut self, method: Method, line: usize) -> bool {
		if self.methods.contains_key(&method.name) {
			self.report(SemanticError::MethodAlreadyDeclared { name: method.name, line });
			return false;
		}
		self.methods.insert(method.name.clone(), method);
		true
	}

	pub fn method(&self, name: &str) -> Option<&Method> { self.methods.get(name) }

	/// Check a call against the declared signature. Arguments of unknown type are not
	/// checked. Returns the method's return type.
	pub fn check_call(&mut self, name: &str, arguments: &[Option<Type>], line: usize) -> Option<Type> {
		let Some(method) = self.methods.get(name).cloned() else {
			self.report(SemanticError::MethodUndeclared { name: name.to_string(), line });
			return None;
		};
		if arguments.len() != method.parameters.len() {
			self.report(SemanticError::ArityMismatch {
				name: method.name.clone(),
				expected: method.parameters.len(),
				found: arguments.len(),
				line,
			});
			return Some(method.return_type);
		}
		for (index, ((expected, _), found)) in method.parameters.iter().zip(arguments).enumerate() {
			let Some(found) = *found else { continue };
			if cube(*expected, found, Operator::Assign).is_none() {
				self.report(SemanticError::ArgumentMismatch {
					name: method.name.clone(),
					index: index + 1,
					expected: *expected,
					found,
					line,
				});
			}
		}
		Some(method.return_type)
	}

	/// `return expression;` inside a method returning `expected`. `found` is `None` when
	/// the expression type could not be inferred.
	pub fn check_return_value(&mut self, expected: Type, found: Option<Type>, line: usize) {
		match found {
			_ if expected == Type::Void => self.report(SemanticError::VoidReturnsValue { line }),
			Some(found) if cube(expected, found, Operator::Assign).is_none() => {
				self.report(SemanticError::ReturnMismatch { expected, found, line })
			}
			_ => {}
		}
	}

	/// `return;` inside a method returning `expected`.
	pub fn check_empty_return(&mut self, expected: Type, line: usize) {
		if expected != Type::Void {
			self.report(SemanticError::MissingReturnValue { expected, line });
		}
	}

	/// Record the literal text a variable was initialized with.
	pub fn set_value(&mut self, name: &str, value: &str) {
		let scope = self.scope().to_string();
		if let Some(symbol) = self.symbols.get_mut(&scope, name) {
			symbol.value = value.to_string();
		}
	}

	pub fn errors(&self) -> &[SemanticError] { &self.errors }

	pub fn into_parts(self) -> (SymbolTable, Vec<SemanticError>) { (self.symbols, self.errors) }
}

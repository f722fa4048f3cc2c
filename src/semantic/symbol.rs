use std::fmt::Display;

use indexmap::IndexMap;

use super::Type;

/// Identifies a symbol by the scope it lives in and its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolKey {
	pub scope: String,
	pub name:  String,
}

impl SymbolKey {
	pub fn new(scope: &str, name: &str) -> Self { Self { scope: scope.to_string(), name: name.to_string() } }
}

/// A declared variable or resolved label.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
	pub name:   String,
	pub r#type: Type,
	pub scope:  String,
	/// Current value as text
	pub value:  String,
}

impl Symbol {
	pub fn new(name: &str, r#type: Type, scope: &str) -> Self {
		Self { name: name.to_string(), r#type, scope: scope.to_string(), value: r#type.default_value().to_string() }
	}

	/// The bytecode declaration line, always carrying the type's default value.
	pub fn declaration(&self) -> String {
		format!("{}, {}, {}, {}", self.name, self.r#type, self.scope, self.r#type.default_value())
	}
}

/// Rendered as one row of the symbol table.
impl Display for Symbol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}\t{}\t{}\t{}", self.name, self.r#type, self.scope, self.value)
	}
}

/// Symbols in declaration order.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
	entries: IndexMap<SymbolKey, Symbol>,
}

impl SymbolTable {
	pub fn new() -> Self { Self::default() }

	/// Returns `false` and leaves the table untouched if the key is taken.
	pub fn insert(&mut self, symbol: Symbol) -> bool {
		let key = SymbolKey::new(&symbol.scope, &symbol.name);
		if self.entries.contains_key(&key) {
			return false;
		}
		self.entries.insert(key, symbol);
		true
	}

	pub fn get(&self, scope: &str, name: &str) -> Option<&Symbol> { self.entries.get(&SymbolKey::new(scope, name)) }

	pub fn get_mut(&mut self, scope: &str, name: &str) -> Option<&mut Symbol> {
		self.entries.get_mut(&SymbolKey::new(scope, name))
	}

	pub fn contains(&self, scope: &str, name: &str) -> bool { self.get(scope, name).is_some() }

	pub fn iter(&self) -> impl Iterator<Item = &Symbol> { self.entries.values() }

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Signature of a declared method.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
	pub return_type: Type,
	pub name:        String,
	pub parameters:  Vec<(Type, String)>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_name_in_different_scopes() {
		let mut table = SymbolTable::new();
		assert!(table.insert(Symbol::new("x", Type::Int, "global")));
		assert!(table.insert(Symbol::new("x", Type::Float, "main")));
		assert!(!table.insert(Symbol::new("x", Type::Str, "main")));
		assert_eq!(table.len(), 2);
		assert_eq!(table.get("main", "x").map(|symbol| symbol.r#type), Some(Type::Float));
		assert!(!table.contains("other", "x"));
	}

	#[test]
	fn keys_do_not_collide_on_dots() {
		let mut table = SymbolTable::new();
		assert!(table.insert(Symbol::new("b.c", Type::Int, "a")));
		assert!(table.insert(Symbol::new("c", Type::Int, "a.b")));
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn rows_and_declarations() {
		let mut symbol = Symbol::new("name", Type::Str, "global");
		assert_eq!(symbol.to_string(), "name\tstring\tglobal\t\"\"");
		symbol.value = "\"bob\"".to_string();
		assert_eq!(symbol.declaration(), "name, string, global, \"\"");
	}
}

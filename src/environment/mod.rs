use indexmap::IndexMap;

use crate::{error::interpreter::RuntimeError, interpreter::Value, semantic::Type};

/// A variable of the running program.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
	pub r#type: Type,
	pub value:  Value,
}

/// The variable table of the virtual machine, keyed by name in load order. Scopes
/// are a compile time notion, at run time every name is global.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Environment {
	variables: IndexMap<String, Variable>,
}

impl Environment {
	pub fn new() -> Self { Self::default() }

	/// A redefinition replaces the earlier variable.
	pub fn define(&mut self, name: &str, r#type: Type, value: Value) {
		self.variables.insert(name.to_string(), Variable { r#type, value });
	}

	pub fn get(&self, name: &str) -> Result<&Value, RuntimeError> {
		self.variables.get(name).map(|variable| &variable.value).ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
	}

	/// Assign to an existing variable. An int stored into a float variable widens, and
	/// a comparison flag stored into a boolean variable becomes a boolean.
	pub fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
		let variable = self.variables.get_mut(name).ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))?;
		variable.value = match (variable.r#type, value) {
			(Type::Float, Value::Int(n)) => Value::Float(n as f64),
			(Type::Boolean, Value::Int(n)) => Value::Bool(n != 0),
			(_, value) => value,
		};
		Ok(())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
		self.variables.iter().map(|(name, variable)| (name.as_str(), variable))
	}

	pub fn len(&self) -> usize { self.variables.len() }

	pub fn is_empty(&self) -> bool { self.variables.is_empty() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn assignment_widens_into_floats() {
		let mut environment = Environment::new();
		environment.define("ratio", Type::Float, Value::default_for(Type::Float));
		environment.define("count", Type::Int, Value::default_for(Type::Int));
		environment.assign("ratio", Value::Int(3)).unwrap();
		environment.assign("count", Value::Int(3)).unwrap();
		assert_eq!(environment.get("ratio"), Ok(&Value::Float(3.0)));
		assert_eq!(environment.get("count"), Ok(&Value::Int(3)));
	}

	#[test]
	fn flags_stored_into_booleans() {
		let mut environment = Environment::new();
		environment.define("done", Type::Boolean, Value::default_for(Type::Boolean));
		environment.assign("done", Value::Int(1)).unwrap();
		assert_eq!(environment.get("done"), Ok(&Value::Bool(true)));
		environment.assign("done", Value::Int(0)).unwrap();
		assert_eq!(environment.get("done"), Ok(&Value::Bool(false)));
	}

	#[test]
	fn redefinition_replaces_type() {
		let mut environment = Environment::new();
		environment.define("x", Type::Float, Value::default_for(Type::Float));
		environment.define("x", Type::Int, Value::default_for(Type::Int));
		environment.assign("x", Value::Int(2)).unwrap();
		assert_eq!(environment.get("x"), Ok(&Value::Int(2)));
		assert_eq!(environment.len(), 1);
	}

	#[test]
	fn undefined_names() {
		let mut environment = Environment::new();
		assert_eq!(environment.get("x"), Err(RuntimeError::UndefinedVariable("x".to_string())));
		assert!(environment.assign("x", Value::Int(1)).is_err());
		assert!(environment.is_empty());
	}

	#[test]
	fn keeps_load_order() {
		let mut environment = Environment::new();
		environment.define("b", Type::Int, Value::Int(0));
		environment.define("a", Type::Str, Value::Str(String::new()));
		let names: Vec<&str> = environment.iter().map(|(name, _)| name).collect();
		assert_eq!(names, ["b", "a"]);
	}
}

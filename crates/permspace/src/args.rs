use std::collections::BTreeMap;

use permspace_core::errors::{ErrorInfo, PermspaceError};
use permspace_core::Value;

/// Read-only view of the declared arguments of a dependent function or filter.
///
/// Only names listed at registration are reachable; asking for anything else
/// is an [`PermspaceError::UnknownParameter`] error, which keeps the declared
/// dependency list honest.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    names: &'a [String],
    scope: &'a BTreeMap<String, Value>,
}

impl<'a> Args<'a> {
    pub(crate) fn new(names: &'a [String], scope: &'a BTreeMap<String, Value>) -> Self {
        Self { names, scope }
    }

    /// Rebinds the same resolved values to a subset of the declared names.
    pub(crate) fn narrow<'b>(&self, names: &'b [String]) -> Args<'b>
    where
        'a: 'b,
    {
        Args {
            names,
            scope: self.scope,
        }
    }

    /// Declared argument names in registration order.
    pub fn names(&self) -> &'a [String] {
        self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the value bound to a declared argument name.
    pub fn get(&self, name: &str) -> Result<&'a Value, PermspaceError> {
        if !self.names.iter().any(|declared| declared == name) {
            return Err(PermspaceError::UnknownParameter(
                ErrorInfo::new("undeclared-argument", "argument was not declared")
                    .with_context("parameter", name)
                    .with_hint("list the parameter among the declared dependencies"),
            ));
        }
        self.scope.get(name).ok_or_else(|| unresolved(name))
    }

    /// Returns the value bound to the declared argument at `position`.
    pub fn value(&self, position: usize) -> Result<&'a Value, PermspaceError> {
        let name = self.names.get(position).ok_or_else(|| {
            PermspaceError::UnknownParameter(
                ErrorInfo::new("argument-position", "no declared argument at position")
                    .with_context("position", position)
                    .with_context("declared", self.names.len()),
            )
        })?;
        self.scope.get(name).ok_or_else(|| unresolved(name))
    }

    /// Values of every declared argument, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = Result<&'a Value, PermspaceError>> + '_ {
        (0..self.names.len()).map(move |position| self.value(position))
    }

    pub fn i64(&self, name: &str) -> Result<i64, PermspaceError> {
        let value = self.get(name)?;
        value.as_i64().ok_or_else(|| type_mismatch(name, "integer", value))
    }

    pub fn f64(&self, name: &str) -> Result<f64, PermspaceError> {
        let value = self.get(name)?;
        value.as_f64().ok_or_else(|| type_mismatch(name, "number", value))
    }

    pub fn bool(&self, name: &str) -> Result<bool, PermspaceError> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| type_mismatch(name, "boolean", value))
    }

    pub fn str(&self, name: &str) -> Result<&'a str, PermspaceError> {
        let value = self.get(name)?;
        value.as_str().ok_or_else(|| type_mismatch(name, "string", value))
    }
}

fn unresolved(name: &str) -> PermspaceError {
    PermspaceError::UnknownParameter(
        ErrorInfo::new("unresolved-argument", "argument has no resolved value")
            .with_context("parameter", name),
    )
}

fn type_mismatch(name: &str, expected: &str, found: &Value) -> PermspaceError {
    PermspaceError::evaluation("argument-type", "argument has an unexpected type")
        .with_context("parameter", name)
        .with_context("expected", expected)
        .with_context("found", found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn narrowed_view_hides_other_names() {
        let names = vec!["question".to_string(), "part".to_string()];
        let mut scope = BTreeMap::new();
        scope.insert("question".to_string(), json!(2));
        scope.insert("part".to_string(), json!("b"));
        let args = Args::new(&names, &scope);
        assert_eq!(args.i64("question").unwrap(), 2);
        assert_eq!(args.value(1).unwrap(), &json!("b"));

        let only_part = vec!["part".to_string()];
        let narrow = args.narrow(&only_part);
        assert_eq!(narrow.str("part").unwrap(), "b");
        assert!(matches!(
            narrow.get("question"),
            Err(PermspaceError::UnknownParameter(_))
        ));
        assert!(matches!(
            narrow.i64("part"),
            Err(PermspaceError::Evaluation(_))
        ));
    }
}

//! Immutable per-point result record.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, PermspaceError};
use crate::value::Value;

/// Resolved values for one accepted combination of a parameter space.
///
/// Holds every independent, dependent and constant parameter by name, plus the
/// combination's position in the unfiltered enumeration (`index_`) and a
/// deterministic string key derived from that position (`uniqstr_`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    values: BTreeMap<String, Value>,
    #[serde(rename = "index_")]
    index: u64,
    #[serde(rename = "uniqstr_")]
    uniqstr: String,
}

impl Namespace {
    /// Creates a record from fully resolved values.
    pub fn new(values: BTreeMap<String, Value>, index: u64, uniqstr: impl Into<String>) -> Self {
        Self {
            values,
            index,
            uniqstr: uniqstr.into(),
        }
    }

    /// Linear index of the combination within the unfiltered enumeration.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Collision-free key derived from [`Namespace::index`].
    pub fn uniqstr(&self) -> &str {
        &self.uniqstr
    }

    /// Returns the value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the value bound to `name` or an unknown-parameter error.
    pub fn try_get(&self, name: &str) -> Result<&Value, PermspaceError> {
        self.values.get(name).ok_or_else(|| {
            PermspaceError::UnknownParameter(
                ErrorInfo::new("unknown-parameter", "namespace has no such parameter")
                    .with_context("parameter", name),
            )
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Name/value pairs in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the values named by `order` first, then every remaining value
    /// in sorted name order. Names in `order` that are absent are skipped.
    pub fn to_tuple<S: AsRef<str>>(&self, order: &[S]) -> Vec<&Value> {
        let mut out = Vec::with_capacity(self.values.len());
        for name in order {
            if let Some(value) = self.values.get(name.as_ref()) {
                out.push(value);
            }
        }
        for (name, value) in &self.values {
            if !order.iter().any(|listed| listed.as_ref() == name.as_str()) {
                out.push(value);
            }
        }
        out
    }

    /// Consumes the record and returns its value map.
    pub fn into_values(self) -> BTreeMap<String, Value> {
        self.values
    }
}

/// # Panics
///
/// Panics if `name` is not a parameter of the record. Use [`Namespace::get`]
/// or [`Namespace::try_get`] for fallible access.
impl Index<&str> for Namespace {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.values.get(name) {
            Some(value) => value,
            None => panic!("namespace has no parameter named {name:?}"),
        }
    }
}

//! Structured error types shared across permspace crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`PermspaceError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (parameter names, values, sizes).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the permspace engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum PermspaceError {
    /// An independent domain is not a finite, non-empty sequence of distinct values.
    #[error("domain error: {0}")]
    Domain(ErrorInfo),
    /// The significance order is not a permutation of the independent names.
    #[error("order error: {0}")]
    Order(ErrorInfo),
    /// A dependency, filter argument or boundary names no known parameter.
    #[error("unknown parameter: {0}")]
    UnknownParameter(ErrorInfo),
    /// Dependent parameters form a dependency cycle.
    #[error("cyclic dependency: {0}")]
    CyclicDependency(ErrorInfo),
    /// A seek boundary names a value absent from the parameter's domain.
    #[error("value not in domain: {0}")]
    ValueNotInDomain(ErrorInfo),
    /// The same parameter name was registered more than once.
    #[error("duplicate parameter: {0}")]
    DuplicateParameter(ErrorInfo),
    /// A dependent function or filter predicate failed.
    #[error("evaluation error: {0}")]
    Evaluation(ErrorInfo),
    /// Serialization and configuration parsing errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl PermspaceError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            PermspaceError::Domain(info)
            | PermspaceError::Order(info)
            | PermspaceError::UnknownParameter(info)
            | PermspaceError::CyclicDependency(info)
            | PermspaceError::ValueNotInDomain(info)
            | PermspaceError::DuplicateParameter(info)
            | PermspaceError::Evaluation(info)
            | PermspaceError::Serde(info) => info,
        }
    }

    /// Adds a context entry to whichever payload the error carries.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map_info(|info| info.with_context(key, value))
    }

    /// Sets the remediation hint on whichever payload the error carries.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    /// Shorthand for an [`PermspaceError::Evaluation`] failure raised from
    /// inside a dependent function or filter predicate.
    pub fn evaluation(code: impl Into<String>, message: impl Into<String>) -> Self {
        PermspaceError::Evaluation(ErrorInfo::new(code, message))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            PermspaceError::Domain(info) => PermspaceError::Domain(f(info)),
            PermspaceError::Order(info) => PermspaceError::Order(f(info)),
            PermspaceError::UnknownParameter(info) => PermspaceError::UnknownParameter(f(info)),
            PermspaceError::CyclicDependency(info) => PermspaceError::CyclicDependency(f(info)),
            PermspaceError::ValueNotInDomain(info) => PermspaceError::ValueNotInDomain(f(info)),
            PermspaceError::DuplicateParameter(info) => {
                PermspaceError::DuplicateParameter(f(info))
            }
            PermspaceError::Evaluation(info) => PermspaceError::Evaluation(f(info)),
            PermspaceError::Serde(info) => PermspaceError::Serde(f(info)),
        }
    }
}

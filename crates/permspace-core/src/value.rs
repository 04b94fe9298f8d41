//! Dynamic parameter values and their canonical rendering.

pub use serde_json::Value;

/// Renders a value for error context and log output.
///
/// Strings render verbatim without quotes; every other value renders as its
/// compact JSON text, so `1` and `"a"` become `1` and `a`.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#![doc = "Shared error, value and record types for the permspace enumeration engine."]

pub mod errors;
pub mod namespace;
pub mod value;

pub use errors::{ErrorInfo, PermspaceError};
pub use namespace::Namespace;
pub use value::{render_value, Value};

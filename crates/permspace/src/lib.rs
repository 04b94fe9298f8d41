//! Ordered enumeration of parameter spaces.
//!
//! A space is the Cartesian product of independent parameter domains,
//! enumerated as a mixed-radix counter in a caller-chosen significance order.
//! Each point is augmented with dependent parameters computed from other
//! parameters, filtered by predicates, and can be reached directly by seeking
//! to a boundary assignment without visiting the points before it.

mod args;
mod builder;
mod config;
mod evaluator;
mod filters;
mod graph;
mod hash;
mod locator;
pub mod odometer;
mod space;

pub use args::Args;
pub use builder::SpaceBuilder;
pub use config::SpaceConfig;
pub use evaluator::{CacheStats, Evaluator};
pub use filters::{Filter, FilterChain, PredicateFn};
pub use graph::{DependentFn, DependentParameter, Domain, ParameterGraph};
pub use hash::{stable_hash_string, to_canonical_json_bytes};
pub use locator::{bounds, locate, Boundary, Bounds};
pub use odometer::Odometer;
pub use space::{PermutationSpace, SpaceIter};

pub use permspace_core::{render_value, ErrorInfo, Namespace, PermspaceError, Value};

use std::collections::BTreeMap;

use permspace_core::errors::{ErrorInfo, PermspaceError};
use permspace_core::{render_value, Value};
use serde::{Deserialize, Serialize};

use crate::graph::ParameterGraph;
use crate::odometer::encode;

/// Partial assignment of independent parameters used as a seek boundary.
pub type Boundary = BTreeMap<String, Value>;

/// Half-open linear index range `[start, end)` of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub start: u64,
    pub end: u64,
}

impl Bounds {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Smallest linear index whose combination is not before `boundary`.
///
/// Independent parameters absent from the boundary take their first domain
/// value, so the result is exactly the encoding of the completed assignment.
pub fn locate(graph: &ParameterGraph, boundary: &Boundary) -> Result<u64, PermspaceError> {
    let mut digits = vec![0usize; graph.order().len()];
    for (name, value) in boundary {
        let position = graph.significance(name).ok_or_else(|| {
            let info = if graph.contains(name) {
                ErrorInfo::new(
                    "boundary-not-independent",
                    "boundary names a non-independent parameter",
                )
                .with_hint("seek boundaries accept independent parameters only")
            } else {
                ErrorInfo::new(
                    "unknown-boundary-parameter",
                    "boundary names an unknown parameter",
                )
            };
            PermspaceError::UnknownParameter(info.with_context("parameter", name))
        })?;
        let domain = &graph.domains()[position];
        digits[position] = domain.position(value).ok_or_else(|| {
            PermspaceError::ValueNotInDomain(
                ErrorInfo::new("value-not-in-domain", "boundary value is not in the domain")
                    .with_context("parameter", name)
                    .with_context("value", render_value(value)),
            )
        })?;
    }
    Ok(encode(&graph.ordered_sizes(), &digits))
}

/// Resolves optional boundaries plus `skip` into a pass range.
///
/// `None` leaves that side unbounded. `skip` advances the start after it is
/// located and is clamped so the range never inverts.
pub fn bounds(
    graph: &ParameterGraph,
    start: Option<&Boundary>,
    end: Option<&Boundary>,
    skip: u64,
) -> Result<Bounds, PermspaceError> {
    let end = match end {
        Some(boundary) => locate(graph, boundary)?,
        None => graph.approximate_size(),
    };
    let start = match start {
        Some(boundary) => locate(graph, boundary)?,
        None => 0,
    };
    Ok(Bounds {
        start: start.saturating_add(skip).min(end),
        end,
    })
}

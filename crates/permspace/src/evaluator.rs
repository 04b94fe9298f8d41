use std::collections::BTreeMap;

use permspace_core::errors::PermspaceError;
use permspace_core::Value;
use serde::{Deserialize, Serialize};

use crate::args::Args;
use crate::graph::ParameterGraph;
use crate::hash::to_canonical_json_bytes;

/// Cache effectiveness counters for one pass, summed over all dependents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache without invoking the function.
    pub hits: u64,
    /// Lookups that invoked the function.
    pub misses: u64,
}

/// Resolves dependent parameters for a digit assignment.
///
/// Holds one lookup table per dependent keyed by the canonical encoding of
/// its dependencies' values, so a function runs once per distinct argument
/// tuple regardless of where in the enumeration the tuple appears.
#[derive(Debug)]
pub struct Evaluator<'g> {
    graph: &'g ParameterGraph,
    caches: Vec<BTreeMap<Vec<u8>, Value>>,
    stats: CacheStats,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g ParameterGraph) -> Self {
        Self {
            graph,
            caches: vec![BTreeMap::new(); graph.dependents().len()],
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Produces the full value scope for `digits` (significance order):
    /// constants, independents, then dependents in topological order.
    pub fn resolve(&mut self, digits: &[usize]) -> Result<BTreeMap<String, Value>, PermspaceError> {
        let graph = self.graph;
        let mut scope = graph.constants().clone();
        for ((name, domain), &digit) in graph.order().iter().zip(graph.domains()).zip(digits) {
            if let Some(value) = domain.get(digit) {
                scope.insert(name.clone(), value.clone());
            }
        }

        for (slot, dependent) in graph.dependents().iter().enumerate() {
            let arguments: Vec<Option<&Value>> = dependent
                .dependencies()
                .iter()
                .map(|dependency| scope.get(dependency))
                .collect();
            let key = to_canonical_json_bytes(&arguments)?;
            let value = match self.caches[slot].get(&key) {
                Some(cached) => {
                    self.stats.hits += 1;
                    cached.clone()
                }
                None => {
                    self.stats.misses += 1;
                    let computed = dependent.call(&Args::new(dependent.dependencies(), &scope))?;
                    self.caches[slot].insert(key, computed.clone());
                    computed
                }
            };
            scope.insert(dependent.name().to_string(), value);
        }
        Ok(scope)
    }
}

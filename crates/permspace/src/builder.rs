use std::collections::BTreeMap;

use permspace_core::errors::PermspaceError;
use permspace_core::Value;
use tracing::debug;

use crate::args::Args;
use crate::filters::{Filter, FilterChain};
use crate::graph::{DependentParameter, ParameterGraph};
use crate::space::{check_filter, PermutationSpace};

/// Open registration stage of a parameter space.
///
/// Registrations never fail here; every check runs in [`SpaceBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct SpaceBuilder {
    order: Vec<String>,
    independents: Vec<(String, Value)>,
    constants: Vec<(String, Value)>,
    dependents: Vec<DependentParameter>,
    filters: Vec<Filter>,
}

impl SpaceBuilder {
    /// Starts a space whose independents are enumerated in `order`, most
    /// significant first.
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Registers an independent parameter over the given values.
    pub fn independent<I, V>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.domain(name, Value::Array(values))
    }

    /// Registers an independent parameter from a raw value, which must be a
    /// sequence when the space is built.
    pub fn domain(mut self, name: impl Into<String>, source: Value) -> Self {
        self.independents.push((name.into(), source));
        self
    }

    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constants.push((name.into(), value.into()));
        self
    }

    /// Registers a dependent parameter computed from the named dependencies.
    pub fn dependent<I, S, F>(mut self, name: impl Into<String>, dependencies: I, function: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Args<'_>) -> Result<Value, PermspaceError> + Send + Sync + 'static,
    {
        self.dependents
            .push(DependentParameter::new(name, dependencies, function));
        self
    }

    pub fn filter<I, S, F>(self, parameters: I, predicate: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Args<'_>) -> Result<bool, PermspaceError> + Send + Sync + 'static,
    {
        self.add_filter(Filter::new(parameters, predicate))
    }

    pub fn filter_if(self, antecedent: Filter, consequent: Filter) -> Self {
        self.add_filter(Filter::implication(antecedent, consequent))
    }

    pub fn filter_orthog(self, k: usize, defaults: BTreeMap<String, Value>) -> Self {
        self.add_filter(Filter::orthogonal(k, defaults))
    }

    pub fn add_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Validates every registration and freezes the space.
    pub fn build(self) -> Result<PermutationSpace, PermspaceError> {
        let graph = ParameterGraph::build(
            self.order,
            self.independents,
            self.constants,
            self.dependents,
        )?;
        let mut chain = FilterChain::new();
        for filter in self.filters {
            check_filter(&graph, &filter)?;
            chain.push(filter);
        }
        debug!(
            size = graph.approximate_size(),
            independents = graph.order().len(),
            dependents = graph.dependents().len(),
            constants = graph.constants().len(),
            filters = chain.len(),
            "parameter space built"
        );
        Ok(PermutationSpace::from_parts(graph, chain))
    }
}

use std::collections::{BTreeMap, BTreeSet};
use std::iter::FusedIterator;
use std::sync::Arc;

use permspace_core::errors::{ErrorInfo, PermspaceError};
use permspace_core::{Namespace, Value};
use serde_json::json;
use tracing::{debug, trace};

use crate::args::Args;
use crate::builder::SpaceBuilder;
use crate::evaluator::{CacheStats, Evaluator};
use crate::filters::{Filter, FilterChain};
use crate::graph::ParameterGraph;
use crate::hash::stable_hash_string;
use crate::locator::{bounds, Boundary, Bounds};
use crate::odometer::Odometer;

/// Immutable, shareable enumeration engine over a validated parameter graph.
///
/// Adding a filter consumes the space and returns a new one, so passes that
/// borrow the space never see filters registered after they started.
#[derive(Debug, Clone)]
pub struct PermutationSpace {
    graph: Arc<ParameterGraph>,
    filters: FilterChain,
}

impl PermutationSpace {
    pub(crate) fn from_parts(graph: ParameterGraph, filters: FilterChain) -> Self {
        Self {
            graph: Arc::new(graph),
            filters,
        }
    }

    /// Shorthand for [`SpaceBuilder::new`].
    pub fn builder<I, S>(order: I) -> SpaceBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SpaceBuilder::new(order)
    }

    pub fn graph(&self) -> &ParameterGraph {
        &self.graph
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    /// Number of unfiltered combinations; an upper bound on what a full pass
    /// yields once filters are registered.
    pub fn len(&self) -> u64 {
        self.graph.approximate_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn parameters(&self) -> BTreeSet<&str> {
        self.graph.parameters()
    }

    pub fn order(&self) -> &[String] {
        self.graph.order()
    }

    pub fn ordered_sizes(&self) -> Vec<usize> {
        self.graph.ordered_sizes()
    }

    /// Full pass over every accepted combination.
    pub fn iter(&self) -> SpaceIter<'_> {
        SpaceIter::new(
            self,
            Bounds {
                start: 0,
                end: self.len(),
            },
        )
    }

    /// Pass starting at the first combination not before `start`.
    pub fn iter_from(
        &self,
        start: Option<&Boundary>,
        skip: u64,
    ) -> Result<SpaceIter<'_>, PermspaceError> {
        self.iter_between(start, None, skip)
    }

    /// Pass stopping before the first combination not before `end`.
    pub fn iter_until(
        &self,
        end: Option<&Boundary>,
        skip: u64,
    ) -> Result<SpaceIter<'_>, PermspaceError> {
        self.iter_between(None, end, skip)
    }

    pub fn iter_between(
        &self,
        start: Option<&Boundary>,
        end: Option<&Boundary>,
        skip: u64,
    ) -> Result<SpaceIter<'_>, PermspaceError> {
        let range = bounds(&self.graph, start, end, skip)?;
        Ok(SpaceIter::new(self, range))
    }

    /// Runs a full pass and counts the accepted combinations.
    pub fn exact_len(&self) -> Result<u64, PermspaceError> {
        let mut count = 0;
        for namespace in self.iter() {
            namespace?;
            count += 1;
        }
        Ok(count)
    }

    pub fn filter<I, S, F>(self, parameters: I, predicate: F) -> Result<Self, PermspaceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Args<'_>) -> Result<bool, PermspaceError> + Send + Sync + 'static,
    {
        self.add_filter(Filter::new(parameters, predicate))
    }

    /// Keeps combinations where `antecedent` implies `consequent`.
    pub fn filter_if(self, antecedent: Filter, consequent: Filter) -> Result<Self, PermspaceError> {
        self.add_filter(Filter::implication(antecedent, consequent))
    }

    /// Keeps combinations differing from `defaults` in at most `k` parameters.
    pub fn filter_orthog(
        self,
        k: usize,
        defaults: BTreeMap<String, Value>,
    ) -> Result<Self, PermspaceError> {
        self.add_filter(Filter::orthogonal(k, defaults))
    }

    pub fn add_filter(mut self, filter: Filter) -> Result<Self, PermspaceError> {
        check_filter(&self.graph, &filter)?;
        self.filters.push(filter);
        Ok(self)
    }

    /// Stable digest of the enumerated space: order, domains, constants,
    /// dependency lists and filter argument lists.
    pub fn fingerprint(&self) -> Result<String, PermspaceError> {
        let domains: Vec<&[Value]> = self.graph.domains().iter().map(|d| d.values()).collect();
        let dependents: Vec<(&str, &[String])> = self
            .graph
            .dependents()
            .iter()
            .map(|dependent| (dependent.name(), dependent.dependencies()))
            .collect();
        let filters: Vec<&[String]> = self.filters.iter().map(Filter::parameters).collect();
        stable_hash_string(&json!({
            "order": self.graph.order(),
            "domains": domains,
            "constants": self.graph.constants(),
            "dependents": dependents,
            "filters": filters,
        }))
    }
}

impl<'s> IntoIterator for &'s PermutationSpace {
    type Item = Result<Namespace, PermspaceError>;
    type IntoIter = SpaceIter<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub(crate) fn check_filter(graph: &ParameterGraph, filter: &Filter) -> Result<(), PermspaceError> {
    for name in filter.parameters() {
        if !graph.contains(name) {
            return Err(PermspaceError::UnknownParameter(
                ErrorInfo::new("unknown-filter-argument", "filter reads an unknown parameter")
                    .with_context("parameter", name),
            ));
        }
    }
    Ok(())
}

/// One lazy enumeration pass.
///
/// Each step decodes one index, resolves dependents through the pass's own
/// cache and runs the filter chain. The first error ends the pass.
#[derive(Debug)]
pub struct SpaceIter<'s> {
    space: &'s PermutationSpace,
    odometer: Odometer,
    evaluator: Evaluator<'s>,
    finished: bool,
}

impl<'s> SpaceIter<'s> {
    fn new(space: &'s PermutationSpace, range: Bounds) -> Self {
        debug!(start = range.start, end = range.end, "enumeration pass started");
        Self {
            space,
            odometer: Odometer::new(space.ordered_sizes(), range.start, range.end),
            evaluator: Evaluator::new(&space.graph),
            finished: false,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.evaluator.stats()
    }

    /// Next linear index the pass will examine.
    pub fn position(&self) -> u64 {
        self.odometer.position()
    }

    fn fail(&mut self, err: PermspaceError) -> Option<Result<Namespace, PermspaceError>> {
        self.finished = true;
        debug!(index = self.odometer.position(), error = %err, "enumeration pass aborted");
        Some(Err(err))
    }
}

impl Iterator for SpaceIter<'_> {
    type Item = Result<Namespace, PermspaceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some((index, digits)) = self.odometer.next() else {
                self.finished = true;
                let stats = self.evaluator.stats();
                debug!(hits = stats.hits, misses = stats.misses, "enumeration pass exhausted");
                return None;
            };
            let scope = match self.evaluator.resolve(&digits) {
                Ok(scope) => scope,
                Err(err) => return self.fail(err),
            };
            match self.space.filters.accepts(&scope) {
                Ok(true) => {
                    let uniqstr = self.space.graph.uniqstr(index);
                    return Some(Ok(Namespace::new(scope, index, uniqstr)));
                }
                Ok(false) => trace!(index, "candidate rejected"),
                Err(err) => return self.fail(err),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        (0, self.odometer.size_hint().1)
    }
}

impl FusedIterator for SpaceIter<'_> {}

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use permspace_core::errors::PermspaceError;
use permspace_core::Value;

use crate::args::Args;

/// Predicate deciding whether a resolved combination is kept.
pub type PredicateFn = Arc<dyn Fn(&Args<'_>) -> Result<bool, PermspaceError> + Send + Sync>;

/// A predicate plus the explicit set of parameter names it reads.
#[derive(Clone)]
pub struct Filter {
    parameters: Vec<String>,
    predicate: PredicateFn,
}

impl Filter {
    pub fn new<I, S, F>(parameters: I, predicate: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Args<'_>) -> Result<bool, PermspaceError> + Send + Sync + 'static,
    {
        Self {
            parameters: parameters.into_iter().map(Into::into).collect(),
            predicate: Arc::new(predicate),
        }
    }

    /// Accepts unless `antecedent` holds and `consequent` does not.
    ///
    /// The consequent is only evaluated when the antecedent holds.
    pub fn implication(antecedent: Filter, consequent: Filter) -> Self {
        let mut parameters = antecedent.parameters.clone();
        for name in &consequent.parameters {
            if !parameters.contains(name) {
                parameters.push(name.clone());
            }
        }
        Self {
            parameters,
            predicate: predicate(move |args| {
                if !antecedent.test(&args.narrow(&antecedent.parameters))? {
                    return Ok(true);
                }
                consequent.test(&args.narrow(&consequent.parameters))
            }),
        }
    }

    /// Accepts combinations that differ from `defaults` in at most `k` of the
    /// named parameters. Parameters absent from `defaults` are unconstrained.
    pub fn orthogonal(k: usize, defaults: BTreeMap<String, Value>) -> Self {
        let parameters: Vec<String> = defaults.keys().cloned().collect();
        Self {
            parameters,
            predicate: predicate(move |args| {
                let mut differing = 0usize;
                for (name, default) in &defaults {
                    if args.get(name)? != default {
                        differing += 1;
                        if differing > k {
                            return Ok(false);
                        }
                    }
                }
                Ok(true)
            }),
        }
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub(crate) fn test(&self, args: &Args<'_>) -> Result<bool, PermspaceError> {
        (self.predicate)(args)
    }

    /// Evaluates the predicate against a fully resolved value scope.
    pub fn accepts(&self, scope: &BTreeMap<String, Value>) -> Result<bool, PermspaceError> {
        self.test(&Args::new(&self.parameters, scope))
    }
}

fn predicate<F>(function: F) -> PredicateFn
where
    F: Fn(&Args<'_>) -> Result<bool, PermspaceError> + Send + Sync + 'static,
{
    Arc::new(function)
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Ordered list of filters applied with short-circuit conjunction.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> + '_ {
        self.filters.iter()
    }

    /// True iff every filter accepts; stops at the first rejection.
    pub fn accepts(&self, scope: &BTreeMap<String, Value>) -> Result<bool, PermspaceError> {
        for filter in &self.filters {
            if !filter.accepts(scope)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

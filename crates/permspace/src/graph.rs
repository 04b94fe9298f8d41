use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use permspace_core::errors::{ErrorInfo, PermspaceError};
use permspace_core::Value;

use crate::args::Args;

/// Function computing a dependent parameter from its declared arguments.
pub type DependentFn = Arc<dyn Fn(&Args<'_>) -> Result<Value, PermspaceError> + Send + Sync>;

/// Finite, ordered domain of an independent parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    values: Vec<Value>,
    /// First digit of each value, keyed by its compact JSON text.
    positions: BTreeMap<String, usize>,
}

impl Domain {
    /// Validates `source` as the domain of parameter `name`.
    ///
    /// The source must be a non-empty JSON array. Repeated values are kept
    /// and enumerated; seeking to one resolves to its first occurrence.
    pub fn new(name: &str, source: Value) -> Result<Self, PermspaceError> {
        let values = match source {
            Value::Array(values) => values,
            other => {
                return Err(domain_error("domain-not-sequence", "domain must be a sequence")
                    .with_context("parameter", name)
                    .with_context("found", other));
            }
        };
        if values.is_empty() {
            return Err(domain_error("empty-domain", "domain has no values")
                .with_context("parameter", name));
        }
        let mut positions = BTreeMap::new();
        for (digit, value) in values.iter().enumerate() {
            positions.entry(value.to_string()).or_insert(digit);
        }
        Ok(Self { values, positions })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at the given digit.
    pub fn get(&self, digit: usize) -> Option<&Value> {
        self.values.get(digit)
    }

    /// Digit of `value` within the domain, if present.
    pub fn position(&self, value: &Value) -> Option<usize> {
        self.positions.get(&value.to_string()).copied()
    }
}

/// Dependent parameter registration: a function plus its declared arguments.
#[derive(Clone)]
pub struct DependentParameter {
    name: String,
    dependencies: Vec<String>,
    function: DependentFn,
}

impl DependentParameter {
    pub fn new<I, S, F>(name: impl Into<String>, dependencies: I, function: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Args<'_>) -> Result<Value, PermspaceError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            function: Arc::new(function),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub(crate) fn call(&self, args: &Args<'_>) -> Result<Value, PermspaceError> {
        (self.function)(args)
    }
}

impl fmt::Debug for DependentParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependentParameter")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Validated parameter graph: domains in significance order, constants, and
/// dependents in topological order.
#[derive(Debug, Clone)]
pub struct ParameterGraph {
    order: Vec<String>,
    domains: Vec<Domain>,
    constants: BTreeMap<String, Value>,
    dependents: Vec<DependentParameter>,
    size: u64,
}

impl ParameterGraph {
    /// Validates the registrations and orders the dependents.
    ///
    /// Checks run in a fixed sequence: duplicate names, domains, the
    /// significance order, dependency resolution, then cycles.
    pub fn build(
        order: Vec<String>,
        independents: Vec<(String, Value)>,
        constants: Vec<(String, Value)>,
        dependents: Vec<DependentParameter>,
    ) -> Result<Self, PermspaceError> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let names = independents
            .iter()
            .map(|(name, _)| name)
            .chain(constants.iter().map(|(name, _)| name))
            .chain(dependents.iter().map(|dependent| &dependent.name));
        for name in names {
            if !seen.insert(name.clone()) {
                return Err(PermspaceError::DuplicateParameter(
                    ErrorInfo::new("duplicate-parameter", "parameter registered more than once")
                        .with_context("parameter", name),
                ));
            }
        }

        let mut by_name = BTreeMap::new();
        for (name, source) in independents {
            let domain = Domain::new(&name, source)?;
            by_name.insert(name, domain);
        }
        let constants: BTreeMap<String, Value> = constants.into_iter().collect();

        check_order(&order, &by_name, &constants, &dependents)?;
        let mut domains = Vec::with_capacity(order.len());
        let mut size: u64 = 1;
        for name in &order {
            if let Some(domain) = by_name.remove(name) {
                size = size.checked_mul(domain.len() as u64).ok_or_else(|| {
                    domain_error("space-too-large", "combination count overflows u64")
                        .with_context("parameter", name)
                })?;
                domains.push(domain);
            }
        }

        for dependent in &dependents {
            for dependency in &dependent.dependencies {
                if !seen.contains(dependency.as_str()) {
                    return Err(PermspaceError::UnknownParameter(
                        ErrorInfo::new("unknown-dependency", "dependency does not resolve")
                            .with_context("parameter", &dependent.name)
                            .with_context("dependency", dependency),
                    ));
                }
            }
        }
        let dependents = topological_sort(dependents)?;

        Ok(Self {
            order,
            domains,
            constants,
            dependents,
            size,
        })
    }

    /// Independent names from most to least significant.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Domains aligned with [`ParameterGraph::order`].
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn ordered_sizes(&self) -> Vec<usize> {
        self.domains.iter().map(Domain::len).collect()
    }

    /// Product of the independent domain sizes, ignoring filters.
    pub fn approximate_size(&self) -> u64 {
        self.size
    }

    pub fn constants(&self) -> &BTreeMap<String, Value> {
        &self.constants
    }

    /// Dependents sorted so each follows all of its dependencies.
    pub fn dependents(&self) -> &[DependentParameter] {
        &self.dependents
    }

    pub fn topological_order(&self) -> Vec<&str> {
        self.dependents.iter().map(|dependent| dependent.name()).collect()
    }

    /// Every parameter name: independent, dependent and constant.
    pub fn parameters(&self) -> BTreeSet<&str> {
        self.order
            .iter()
            .map(String::as_str)
            .chain(self.constants.keys().map(String::as_str))
            .chain(self.dependents.iter().map(DependentParameter::name))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.significance(name).is_some()
            || self.constants.contains_key(name)
            || self.dependents.iter().any(|dependent| dependent.name == name)
    }

    /// Position of an independent parameter in the significance order.
    pub fn significance(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|listed| listed == name)
    }

    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.significance(name).map(|position| &self.domains[position])
    }

    /// Builds the `uniqstr_` key for a linear index.
    ///
    /// The key is the index in lowercase base 36, zero-padded to the width of
    /// the largest index in the space, so keys of one space are distinct and
    /// sort in enumeration order.
    pub fn uniqstr(&self, index: u64) -> String {
        let width = radix36(self.size.saturating_sub(1)).len();
        let digits = radix36(index);
        format!("{digits:0>width$}")
    }
}

fn radix36(mut value: u64) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    loop {
        out.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

fn check_order(
    order: &[String],
    independents: &BTreeMap<String, Domain>,
    constants: &BTreeMap<String, Value>,
    dependents: &[DependentParameter],
) -> Result<(), PermspaceError> {
    let mut listed = BTreeSet::new();
    for name in order {
        if !listed.insert(name.as_str()) {
            return Err(order_error("order-duplicate", "order lists a parameter twice")
                .with_context("parameter", name));
        }
        if !independents.contains_key(name) {
            let declared = constants.contains_key(name)
                || dependents.iter().any(|dependent| &dependent.name == name);
            let err = if declared {
                order_error("order-not-independent", "order lists a non-independent parameter")
            } else {
                order_error("order-undefined", "order lists an undefined parameter")
            };
            return Err(err.with_context("parameter", name));
        }
    }
    let missing: Vec<&str> = independents
        .keys()
        .map(String::as_str)
        .filter(|name| !listed.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(order_error("order-missing", "order omits independent parameters")
            .with_context("parameters", missing.join(",")));
    }
    Ok(())
}

/// Kahn's algorithm over dependent-on-dependent edges, stable with respect
/// to registration order.
fn topological_sort(
    dependents: Vec<DependentParameter>,
) -> Result<Vec<DependentParameter>, PermspaceError> {
    let index: BTreeMap<&str, usize> = dependents
        .iter()
        .enumerate()
        .map(|(slot, dependent)| (dependent.name.as_str(), slot))
        .collect();
    let mut in_degree = vec![0usize; dependents.len()];
    let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); dependents.len()];
    for (slot, dependent) in dependents.iter().enumerate() {
        let upstream: BTreeSet<usize> = dependent
            .dependencies
            .iter()
            .filter_map(|dependency| index.get(dependency.as_str()).copied())
            .collect();
        in_degree[slot] = upstream.len();
        for source in upstream {
            consumers[source].push(slot);
        }
    }

    let mut ready: VecDeque<usize> = (0..dependents.len())
        .filter(|slot| in_degree[*slot] == 0)
        .collect();
    let mut sorted = Vec::with_capacity(dependents.len());
    while let Some(slot) = ready.pop_front() {
        sorted.push(slot);
        for &consumer in &consumers[slot] {
            in_degree[consumer] -= 1;
            if in_degree[consumer] == 0 {
                ready.push_back(consumer);
            }
        }
    }

    if sorted.len() < dependents.len() {
        let cyclic: Vec<&str> = (0..dependents.len())
            .filter(|slot| in_degree[*slot] > 0)
            .map(|slot| dependents[slot].name.as_str())
            .collect();
        return Err(PermspaceError::CyclicDependency(
            ErrorInfo::new("dependency-cycle", "dependent parameters form a cycle")
                .with_context("parameters", cyclic.join(",")),
        ));
    }

    let mut slots: Vec<Option<DependentParameter>> = dependents.into_iter().map(Some).collect();
    Ok(sorted
        .into_iter()
        .filter_map(|slot| slots[slot].take())
        .collect())
}

fn domain_error(code: &str, message: &str) -> PermspaceError {
    PermspaceError::Domain(ErrorInfo::new(code, message))
}

fn order_error(code: &str, message: &str) -> PermspaceError {
    PermspaceError::Order(ErrorInfo::new(code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radix36_uses_lowercase_digits() {
        assert_eq!(radix36(0), "0");
        assert_eq!(radix36(35), "z");
        assert_eq!(radix36(36), "10");
        assert_eq!(radix36(u64::MAX), "3w5e11264sgsf");
    }
}

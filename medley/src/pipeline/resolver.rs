//! Execution order resolution.
//!
//! Produces one deterministic total order over all registered stages:
//! dependencies always precede dependents, and among unconstrained
//! stages the lower phase runs first, ties broken by ascending name.
//! Configuration and cycle errors surface here, before anything runs.

use crate::errors::{CycleError, UnknownDependencyError};
use crate::graph::DependencyGraph;
use crate::registry::StageRegistry;
use crate::MedleyError;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Resolves the execution order for every stage in the registry.
///
/// Resolution is a pre-flight gate: an unknown dependency or a cycle
/// fails the whole run with no partial order returned. Resolving the
/// same unchanged registry twice yields the same order.
///
/// # Errors
///
/// [`MedleyError::UnknownDependency`] if a required name is absent from
/// the registry; [`MedleyError::Cycle`] if the dependency graph is
/// cyclic (reporting the minimal cycle path per affected root).
pub fn resolve_execution_order(registry: &StageRegistry) -> Result<Vec<String>, MedleyError> {
    let graph = DependencyGraph::from_descriptors(registry.all());

    if let Some((stage, dependency)) = graph.unknown_dependencies().into_iter().next() {
        return Err(UnknownDependencyError::new(stage, dependency).into());
    }

    let cycles = graph.detect_cycles();
    if !cycles.is_empty() {
        return Err(CycleError::new(cycles).into());
    }

    // Kahn's algorithm over a min-heap keyed by (phase, name): a stage
    // becomes eligible once all of its requirements are scheduled, and
    // the eligible stage with the lowest phase (then name) goes next.
    let phases: HashMap<&str, i32> = registry
        .all()
        .iter()
        .map(|d| (d.name.as_str(), d.phase))
        .collect();

    let mut pending: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for descriptor in registry.all() {
        pending.insert(descriptor.name.as_str(), descriptor.requires.len());
        for dep in &descriptor.requires {
            dependents
                .entry(dep.as_str())
                .or_default()
                .push(descriptor.name.as_str());
        }
    }

    let mut ready: BinaryHeap<Reverse<(i32, &str)>> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(name, _)| Reverse((phases[name], *name)))
        .collect();

    let mut order = Vec::with_capacity(registry.len());
    while let Some(Reverse((_, name))) = ready.pop() {
        order.push(name.to_string());
        for dependent in dependents.get(name).map_or(&[][..], Vec::as_slice) {
            let count = pending
                .get_mut(dependent)
                .ok_or_else(|| MedleyError::Internal(format!("unregistered dependent '{dependent}'")))?;
            *count -= 1;
            if *count == 0 {
                ready.push(Reverse((phases[dependent], *dependent)));
            }
        }
    }

    // Cycle detection already gated; every stage must have scheduled.
    if order.len() != registry.len() {
        return Err(MedleyError::Internal(format!(
            "resolver scheduled {} of {} stages",
            order.len(),
            registry.len()
        )));
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InputCategory;
    use crate::registry::StageDescriptor;
    use crate::stages::NoOpStage;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn registry_of(specs: &[(&str, i32, &[&str])]) -> StageRegistry {
        let mut registry = StageRegistry::new();
        for (name, phase, requires) in specs {
            registry
                .register(
                    StageDescriptor::new(*name, InputCategory::audio(), Arc::new(NoOpStage))
                        .with_phase(*phase)
                        .with_requires(requires.iter().copied()),
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_phase_then_dependency_order() {
        let registry = registry_of(&[
            ("a", 1, &[]),
            ("b", 1, &["a"]),
            ("c", 2, &[]),
        ]);
        let order = resolve_execution_order(&registry).unwrap();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cycle_is_fatal() {
        let registry = registry_of(&[("x", 1, &["y"]), ("y", 1, &["x"])]);
        let err = resolve_execution_order(&registry).unwrap_err();
        match err {
            MedleyError::Cycle(cycle) => {
                let members = cycle.members();
                assert_eq!(members, vec!["x".to_string(), "y".to_string()]);
            }
            other => panic!("expected cycle error, got {other}"),
        }
    }

    #[test]
    fn test_unknown_dependency_is_fatal() {
        let registry = registry_of(&[("a", 1, &["ghost"])]);
        let err = resolve_execution_order(&registry).unwrap_err();
        assert!(matches!(err, MedleyError::UnknownDependency(_)));
    }

    #[test]
    fn test_dependency_overrides_phase() {
        // b sits in phase 1 but requires a stage in phase 2: the
        // dependency wins over the phase grouping.
        let registry = registry_of(&[("late", 2, &[]), ("b", 1, &["late"])]);
        let order = resolve_execution_order(&registry).unwrap();
        assert_eq!(order, vec!["late", "b"]);
    }

    #[test]
    fn test_every_requirement_precedes_its_stage() {
        let registry = registry_of(&[
            ("master", 3, &["mix", "tempo"]),
            ("mix", 2, &["tempo", "key"]),
            ("tempo", 1, &[]),
            ("key", 1, &[]),
        ]);
        let order = resolve_execution_order(&registry).unwrap();
        assert_eq!(order.len(), 4);
        for descriptor in registry.all() {
            let pos = order.iter().position(|n| *n == descriptor.name).unwrap();
            for dep in &descriptor.requires {
                let dep_pos = order.iter().position(|n| n == dep).unwrap();
                assert!(dep_pos < pos, "{dep} must precede {}", descriptor.name);
            }
        }
    }

    #[test]
    fn test_ties_break_by_name() {
        let registry = registry_of(&[("zeta", 1, &[]), ("alpha", 1, &[]), ("mid", 1, &[])]);
        let order = resolve_execution_order(&registry).unwrap();
        assert_eq!(order, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let registry = registry_of(&[
            ("report", 3, &[]),
            ("beats", 1, &[]),
            ("melody", 2, &["beats"]),
            ("harmony", 2, &["beats"]),
        ]);
        let first = resolve_execution_order(&registry).unwrap();
        let second = resolve_execution_order(&registry).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_registry_resolves_empty() {
        let registry = StageRegistry::new();
        assert!(resolve_execution_order(&registry).unwrap().is_empty());
    }
}

//! Stage descriptors and the registry.
//!
//! Stages self-register their descriptor before a run begins. The registry
//! only enforces name uniqueness and self-dependency at registration time;
//! phase and cross-stage dependency validation is deferred to the resolver
//! so that registration order never matters.

use crate::core::{InputCategory, InvocationMode};
use crate::errors::{DuplicateStageError, SelfDependencyError};
use crate::stages::Stage;
use std::collections::HashSet;
use std::sync::Arc;

/// Declared metadata and callable for one stage.
///
/// Immutable after registration; owned by the registry.
#[derive(Debug, Clone)]
pub struct StageDescriptor {
    /// Unique stage name.
    pub name: String,
    /// Which collected files are routed to this stage.
    pub category: InputCategory,
    /// Execution phase; lower runs earlier.
    pub phase: i32,
    /// Names of stages that must run before this one. Ordered, deduped.
    pub requires: Vec<String>,
    /// Per-file or batch dispatch.
    pub mode: InvocationMode,
    /// Whether the executor passes the shared run context to the stage.
    pub wants_context: bool,
    /// The stage implementation.
    pub runner: Arc<dyn Stage>,
}

impl StageDescriptor {
    /// Creates a descriptor with phase 1, no requirements, per-file
    /// dispatch and no context access.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: InputCategory,
        runner: Arc<dyn Stage>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            phase: 1,
            requires: Vec::new(),
            mode: InvocationMode::PerFile,
            wants_context: false,
            runner,
        }
    }

    /// Sets the execution phase.
    #[must_use]
    pub fn with_phase(mut self, phase: i32) -> Self {
        self.phase = phase;
        self
    }

    /// Sets the required stages, preserving order and dropping repeats.
    #[must_use]
    pub fn with_requires(mut self, requires: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut seen = HashSet::new();
        self.requires = requires
            .into_iter()
            .map(Into::into)
            .filter(|name| seen.insert(name.clone()))
            .collect();
        self
    }

    /// Adds a single required stage.
    #[must_use]
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.requires.contains(&name) {
            self.requires.push(name);
        }
        self
    }

    /// Switches the stage to batch dispatch.
    #[must_use]
    pub fn batch(mut self) -> Self {
        self.mode = InvocationMode::Batch;
        self
    }

    /// Marks the stage as consuming the shared run context.
    #[must_use]
    pub fn with_context(mut self) -> Self {
        self.wants_context = true;
        self
    }

    /// Validates the descriptor in isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage requires itself.
    pub fn validate(&self) -> Result<(), SelfDependencyError> {
        if self.requires.contains(&self.name) {
            return Err(SelfDependencyError::new(&self.name));
        }
        Ok(())
    }
}

/// Append-only collection of stage descriptors.
#[derive(Debug, Default)]
pub struct StageRegistry {
    descriptors: Vec<StageDescriptor>,
}

impl StageRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a stage descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateStageError`] if the name is taken, or a
    /// self-dependency error from [`StageDescriptor::validate`].
    pub fn register(&mut self, descriptor: StageDescriptor) -> Result<(), crate::MedleyError> {
        descriptor.validate()?;
        if self.contains(&descriptor.name) {
            return Err(DuplicateStageError::new(&descriptor.name).into());
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Returns every registered descriptor, in registration order.
    #[must_use]
    pub fn all(&self) -> &[StageDescriptor] {
        &self.descriptors
    }

    /// Looks up a descriptor by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StageDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Returns true if a stage with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.iter().any(|d| d.name == name)
    }

    /// Returns the number of registered stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no stages are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::NoOpStage;
    use crate::MedleyError;

    fn noop() -> Arc<dyn Stage> {
        Arc::new(NoOpStage)
    }

    #[test]
    fn test_descriptor_defaults() {
        let d = StageDescriptor::new("tempo", InputCategory::audio(), noop());
        assert_eq!(d.phase, 1);
        assert!(d.requires.is_empty());
        assert_eq!(d.mode, InvocationMode::PerFile);
        assert!(!d.wants_context);
    }

    #[test]
    fn test_descriptor_requires_dedup() {
        let d = StageDescriptor::new("melody", InputCategory::midi(), noop())
            .with_requires(["tempo", "key", "tempo"]);
        assert_eq!(d.requires, vec!["tempo".to_string(), "key".to_string()]);
    }

    #[test]
    fn test_descriptor_self_dependency() {
        let d = StageDescriptor::new("tempo", InputCategory::audio(), noop())
            .with_required("tempo");
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = StageRegistry::new();
        registry
            .register(StageDescriptor::new("tempo", InputCategory::audio(), noop()))
            .unwrap();
        let err = registry
            .register(StageDescriptor::new("tempo", InputCategory::midi(), noop()))
            .unwrap_err();
        assert!(matches!(err, MedleyError::DuplicateStage(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_preserves_order() {
        let mut registry = StageRegistry::new();
        for name in ["c", "a", "b"] {
            registry
                .register(StageDescriptor::new(name, InputCategory::audio(), noop()))
                .unwrap();
        }
        let names: Vec<&str> = registry.all().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert!(registry.contains("a"));
        assert!(registry.get("missing").is_none());
    }
}

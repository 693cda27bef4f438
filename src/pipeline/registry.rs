use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::kernel::{Capability, KernelSession};
use crate::topology::Shape;

type OpFn = Box<dyn Fn(&mut KernelSession) -> Result<Option<Shape>>>;

/// A named custom operation registered by embedding code.
pub struct RegisteredOp {
    /// Human-readable label for UI listings.
    pub label: String,
    /// The kernel capability groups the operation needs.
    pub capabilities: Vec<Capability>,
    /// The operation body, driving the session.
    pub run: OpFn,
}

impl fmt::Debug for RegisteredOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredOp")
            .field("label", &self.label)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// A registry of named custom operations over the kernel pipeline.
///
/// Registering under an existing name replaces the previous entry, so
/// embedding code can re-register operations as it reloads. Before an
/// operation runs, every capability it declares is resolved against the
/// session, surfacing missing kernel groups as one upfront error
/// instead of a failure midway through the operation body.
#[derive(Debug, Default)]
pub struct OpRegistry {
    ops: HashMap<String, RegisteredOp>,
}

impl OpRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an operation, replacing any previous entry of the same
    /// name.
    pub fn register(&mut self, name: impl Into<String>, op: RegisteredOp) {
        let name = name.into();
        if self.ops.insert(name.clone(), op).is_some() {
            debug!(%name, "replaced registered operation");
        }
    }

    /// Removes a registered operation, returning whether it existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.ops.remove(name).is_some()
    }

    /// Returns the registered operation names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ops.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns a registered operation's label.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.ops.get(name).map(|op| op.label.as_str())
    }

    /// Runs a registered operation within a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown, the session lacks a
    /// declared capability, or the operation body fails.
    pub fn run(&self, name: &str, session: &mut KernelSession) -> Result<Option<Shape>> {
        let op = self
            .ops
            .get(name)
            .ok_or_else(|| OperationError::InvalidInput(format!("unknown operation {name:?}")))?;
        for &capability in &op.capabilities {
            session.ensure(capability)?;
        }
        (op.run)(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::KernelRegistry;
    use crate::topology::CompoundData;

    fn empty_compound_op(label: &str) -> RegisteredOp {
        let label = label.to_owned();
        RegisteredOp {
            label,
            capabilities: vec![Capability::Construction],
            run: Box::new(|session| {
                let compound = session.store_mut().add_compound(CompoundData::default());
                Ok(Some(Shape::Compound(compound)))
            }),
        }
    }

    #[test]
    fn registered_operation_runs() {
        let mut registry = OpRegistry::new();
        registry.register("empty", empty_compound_op("Empty compound"));

        let mut session = KernelSession::new();
        let result = registry.run("empty", &mut session).unwrap();
        assert!(matches!(result, Some(Shape::Compound(_))));
        assert_eq!(registry.label("empty"), Some("Empty compound"));
    }

    #[test]
    fn unknown_operation_is_invalid_input() {
        let registry = OpRegistry::new();
        let mut session = KernelSession::new();
        assert!(registry.run("nope", &mut session).is_err());
    }

    #[test]
    fn registration_replaces_previous_entry() {
        let mut registry = OpRegistry::new();
        registry.register("op", empty_compound_op("First"));
        registry.register("op", empty_compound_op("Second"));

        assert_eq!(registry.names(), vec!["op"]);
        assert_eq!(registry.label("op"), Some("Second"));

        assert!(registry.unregister("op"));
        assert!(!registry.unregister("op"));
    }

    #[test]
    fn declared_capabilities_gate_execution() {
        let mut registry = OpRegistry::new();
        registry.register(
            "needs-booleans",
            RegisteredOp {
                label: "Boolean-backed".into(),
                capabilities: vec![Capability::BooleanCsg],
                run: Box::new(|_| Ok(None)),
            },
        );

        let restricted = KernelRegistry::with_capabilities([Capability::Construction]);
        let mut session = KernelSession::with_registry(restricted);
        assert!(registry.run("needs-booleans", &mut session).is_err());

        let mut session = KernelSession::new();
        assert!(registry.run("needs-booleans", &mut session).unwrap().is_none());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = OpRegistry::new();
        registry.register("zeta", empty_compound_op("Z"));
        registry.register("alpha", empty_compound_op("A"));
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }
}

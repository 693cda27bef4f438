pub mod boolean;
pub mod construction;
pub mod sewing;
pub mod traversal;
pub mod triangulation;

pub use boolean::{BooleanCsg, BooleanOperation, CsgOp};
pub use construction::{Construction, WireBuilder};
pub use sewing::Sewing;
pub use traversal::Traversal;
pub use triangulation::Triangulation;

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::error::KernelError;
use crate::topology::TopologyStore;

/// The capability groups the geometry kernel exposes.
///
/// The original kernel boundary resolved submodules by string name at
/// runtime; here each group is a statically known binding selected by
/// this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Edge, wire, face and compound construction.
    Construction,
    /// Sewing faces into shells and classifying solids.
    Sewing,
    /// Boolean CSG operations.
    BooleanCsg,
    /// Incremental triangulation of shapes.
    Triangulation,
    /// Face and triangulation traversal.
    Traversal,
}

impl Capability {
    /// All capability groups the kernel can provide.
    pub const ALL: [Self; 5] = [
        Self::Construction,
        Self::Sewing,
        Self::BooleanCsg,
        Self::Triangulation,
        Self::Traversal,
    ];

    /// Stable name of the capability group.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Sewing => "sewing",
            Self::BooleanCsg => "boolean-csg",
            Self::Triangulation => "triangulation",
            Self::Traversal => "traversal",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A statically bindable kernel capability group.
pub trait KernelModule: Any {
    /// The capability this module provides.
    const CAPABILITY: Capability;

    /// Creates the binding. Called at most once per session.
    fn bind() -> Self;
}

/// The set of capability groups available to a session.
///
/// Defaults to the full set; a restricted registry makes resolution of
/// the missing groups fail, which callers surface as a pipeline error.
#[derive(Debug, Clone)]
pub struct KernelRegistry {
    capabilities: HashSet<Capability>,
}

impl KernelRegistry {
    /// A registry providing every capability group.
    #[must_use]
    pub fn full() -> Self {
        Self {
            capabilities: Capability::ALL.into_iter().collect(),
        }
    }

    /// A registry providing only the given capability groups.
    #[must_use]
    pub fn with_capabilities(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Whether the registry provides the given capability group.
    #[must_use]
    pub fn provides(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::full()
    }
}

/// A single-threaded kernel session.
///
/// Owns the topology store for the lifetime of the session and lazily
/// binds capability modules on first request, memoizing the handle so
/// repeated requests return the identical binding. Sessions are not
/// shared across threads and hold no process-wide state.
#[derive(Default)]
pub struct KernelSession {
    registry: KernelRegistry,
    modules: HashMap<Capability, Rc<dyn Any>>,
    store: TopologyStore,
}

impl fmt::Debug for KernelSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelSession")
            .field("registry", &self.registry)
            .field("bound", &self.modules.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl KernelSession {
    /// Creates a session over the full kernel registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session over a custom registry.
    #[must_use]
    pub fn with_registry(registry: KernelRegistry) -> Self {
        Self {
            registry,
            modules: HashMap::new(),
            store: TopologyStore::new(),
        }
    }

    /// Resolves a capability module, binding it on first request.
    ///
    /// Subsequent calls for the same module return the identical
    /// (reference-equal) handle.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::ModuleUnavailable`] if the session's
    /// registry does not provide the module's capability group.
    pub fn resolve<M: KernelModule>(&mut self) -> Result<Rc<M>, KernelError> {
        if !self.registry.provides(M::CAPABILITY) {
            return Err(KernelError::ModuleUnavailable(M::CAPABILITY));
        }
        let handle = self
            .modules
            .entry(M::CAPABILITY)
            .or_insert_with(|| Rc::new(M::bind()))
            .clone();
        handle
            .downcast::<M>()
            .map_err(|_| KernelError::ModuleUnavailable(M::CAPABILITY))
    }

    /// Resolves a capability group by enum value, binding its module.
    ///
    /// Used by callers that carry capability requirements as data (the
    /// custom-operation registry) rather than as types.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::ModuleUnavailable`] if the session's
    /// registry does not provide the capability group.
    pub fn ensure(&mut self, capability: Capability) -> Result<(), KernelError> {
        match capability {
            Capability::Construction => self.resolve::<Construction>().map(|_| ()),
            Capability::Sewing => self.resolve::<Sewing>().map(|_| ()),
            Capability::BooleanCsg => self.resolve::<BooleanCsg>().map(|_| ()),
            Capability::Triangulation => self.resolve::<Triangulation>().map(|_| ()),
            Capability::Traversal => self.resolve::<Traversal>().map(|_| ()),
        }
    }

    /// Returns the session's topology store.
    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// Returns the session's topology store mutably.
    pub fn store_mut(&mut self) -> &mut TopologyStore {
        &mut self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resolution_is_memoized() {
        let mut session = KernelSession::new();
        let first: Rc<Construction> = session.resolve().unwrap();
        let second: Rc<Construction> = session.resolve().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn distinct_groups_bind_independently() {
        let mut session = KernelSession::new();
        session.resolve::<Construction>().unwrap();
        session.resolve::<Sewing>().unwrap();
        session.resolve::<Traversal>().unwrap();
    }

    #[test]
    fn missing_capability_names_the_group() {
        let registry = KernelRegistry::with_capabilities([Capability::Construction]);
        let mut session = KernelSession::with_registry(registry);
        session.resolve::<Construction>().unwrap();

        let err = session.resolve::<Sewing>().unwrap_err();
        let KernelError::ModuleUnavailable(capability) = err;
        assert_eq!(capability, Capability::Sewing);
        assert_eq!(capability.to_string(), "sewing");
    }

    #[test]
    fn ensure_resolves_by_enum() {
        let mut session = KernelSession::new();
        for capability in Capability::ALL {
            session.ensure(capability).unwrap();
        }

        let restricted = KernelRegistry::with_capabilities([Capability::Traversal]);
        let mut session = KernelSession::with_registry(restricted);
        assert!(session.ensure(Capability::BooleanCsg).is_err());
        assert!(session.ensure(Capability::Traversal).is_ok());
    }
}

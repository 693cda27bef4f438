use super::shell::ShellId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// Data associated with a topological solid.
///
/// A solid is the volume bounded by its outer shell. If the shell was
/// sewn from an open or non-manifold boundary the solid is degenerate;
/// callers are responsible for supplying closed input.
#[derive(Debug, Clone, Copy)]
pub struct SolidData {
    /// The boundary shell of the solid.
    pub outer_shell: ShellId,
}

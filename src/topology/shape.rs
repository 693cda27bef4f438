use super::compound::CompoundId;
use super::shell::ShellId;
use super::solid::SolidId;

/// Kernel-level catch-all handle for a topological result.
///
/// Boolean operations return a `Shape`; tessellation accepts any
/// variant without needing to know which one it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A loose collection of faces.
    Compound(CompoundId),
    /// A sewn (possibly open) face set.
    Shell(ShellId),
    /// A classified solid volume.
    Solid(SolidId),
}

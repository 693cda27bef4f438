use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a compound in the topology store.
    pub struct CompoundId;
}

/// Data associated with a topological compound.
///
/// A compound is a loose collection of faces with no connectivity,
/// used to accumulate independently built faces before sewing.
#[derive(Debug, Clone, Default)]
pub struct CompoundData {
    /// The faces collected into this compound.
    pub faces: Vec<FaceId>,
}

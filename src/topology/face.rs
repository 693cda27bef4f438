use crate::geometry::Plane;
use crate::math::{Isometry3, Point3};

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// Per-face marker indicating whether the face's parametric orientation
/// is forward or reversed relative to the outward normal convention.
///
/// Consumers that emit winding-sensitive output (the tessellator, the
/// boolean engine) must swap the traversal direction of `Reversed` faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Forward,
    Reversed,
}

impl Orientation {
    /// Returns `true` for [`Orientation::Reversed`].
    #[must_use]
    pub fn is_reversed(self) -> bool {
        self == Self::Reversed
    }

    /// Returns the opposite orientation.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reversed,
            Self::Reversed => Self::Forward,
        }
    }
}

/// Cached triangulation of a single face.
///
/// Nodes are stored in the face's local frame; the face's placement
/// transforms them into shape space. Node and triangle indices follow
/// the kernel protocol and are **1-based**.
#[derive(Debug, Clone)]
pub struct FaceTriangulation {
    nodes: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
}

impl FaceTriangulation {
    /// Creates a triangulation from nodes and 1-based index triples.
    #[must_use]
    pub fn new(nodes: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Self {
        Self { nodes, triangles }
    }

    /// Number of nodes.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn nb_nodes(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// Number of triangles.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn nb_triangles(&self) -> u32 {
        self.triangles.len() as u32
    }

    /// Returns the node at 1-based index `i`, or `None` if out of range.
    #[must_use]
    pub fn node(&self, i: u32) -> Option<&Point3> {
        i.checked_sub(1).and_then(|i| self.nodes.get(i as usize))
    }

    /// Returns the 1-based node index triple of the triangle at 1-based
    /// index `i`, or `None` if out of range.
    #[must_use]
    pub fn triangle(&self, i: u32) -> Option<[u32; 3]> {
        i.checked_sub(1)
            .and_then(|i| self.triangles.get(i as usize))
            .copied()
    }
}

/// Data associated with a topological face.
///
/// A face is a bounded planar region defined by a closed outer wire.
/// The plane and any cached triangulation live in the face's local
/// frame; `location` places them within the owning shape.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The plane on which this face lies.
    pub plane: Plane,
    /// The outer boundary wire.
    pub outer_wire: WireId,
    /// Placement of the face within its shape.
    pub location: Isometry3,
    /// Orientation of the face relative to the outward normal convention.
    pub orientation: Orientation,
    /// Cached triangulation, populated by incremental meshing.
    pub triangulation: Option<FaceTriangulation>,
}

impl FaceData {
    /// Creates a face on `plane` bounded by `outer_wire`, with identity
    /// placement, forward orientation and no cached triangulation.
    #[must_use]
    pub fn new(plane: Plane, outer_wire: WireId) -> Self {
        Self {
            plane,
            outer_wire,
            location: Isometry3::identity(),
            orientation: Orientation::Forward,
            triangulation: None,
        }
    }
}

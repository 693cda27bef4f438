use crate::math::{Matrix4, Point3};

/// An indexed polygon mesh handed to the solid builder.
///
/// Polygons reference positions by index and may have any arity of
/// three or more. Positions are local; `transform` carries the mesh's
/// object-to-world placement and is applied when the mesh is converted
/// to a solid.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions in local space.
    pub positions: Vec<Point3>,
    /// Polygon loops as indices into `positions`.
    pub polygons: Vec<Vec<u32>>,
    /// Object-to-world transform.
    pub transform: Matrix4,
}

impl Mesh {
    /// Creates a mesh with an identity transform.
    #[must_use]
    pub fn new(positions: Vec<Point3>, polygons: Vec<Vec<u32>>) -> Self {
        Self {
            positions,
            polygons,
            transform: Matrix4::identity(),
        }
    }

    /// Creates a mesh with an explicit object-to-world transform.
    #[must_use]
    pub fn with_transform(
        positions: Vec<Point3>,
        polygons: Vec<Vec<u32>>,
        transform: Matrix4,
    ) -> Self {
        Self {
            positions,
            polygons,
            transform,
        }
    }

    /// Returns the positions with the mesh transform applied.
    #[must_use]
    pub fn world_positions(&self) -> Vec<Point3> {
        self.positions
            .iter()
            .map(|p| self.transform.transform_point(p))
            .collect()
    }
}

/// A triangle mesh produced by tessellating a shape.
///
/// Indices are 0-based into `positions`; triangles wind
/// counter-clockwise around the outward normal.
#[derive(Debug, Clone, Default)]
pub struct RenderMesh {
    /// Vertex positions in world space.
    pub positions: Vec<Point3>,
    /// Triangles as position index triples.
    pub triangles: Vec<[u32; 3]>,
}

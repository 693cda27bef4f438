use tracing::debug;

use crate::error::Result;
use crate::kernel::{KernelSession, Traversal, Triangulation};
use crate::math::LINEAR_DEFLECTION;
use crate::mesh::RenderMesh;
use crate::topology::Shape;

/// Converts a shape into a render-ready triangle mesh.
///
/// Runs incremental meshing over the shape, then gathers every face's
/// cached triangulation into one indexed triangle buffer, applying the
/// face placement to node positions and swapping the winding of
/// reversed faces so all triangles come out counter-clockwise around
/// the outward normal.
#[derive(Debug)]
pub struct TessellateShape {
    shape: Shape,
    deflection: f64,
}

impl TessellateShape {
    /// Creates the tessellation with the default linear deflection.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            deflection: LINEAR_DEFLECTION,
        }
    }

    /// Overrides the linear deflection.
    #[must_use]
    pub fn with_deflection(mut self, deflection: f64) -> Self {
        self.deflection = deflection;
        self
    }

    /// Runs the tessellation within a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session lacks the triangulation or
    /// traversal capability, the deflection is invalid, or the shape
    /// references missing topology.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, session: &mut KernelSession) -> Result<RenderMesh> {
        let meshing = session.resolve::<Triangulation>()?;
        let traversal = session.resolve::<Traversal>()?;
        let store = session.store_mut();

        meshing.incremental_mesh(store, self.shape, self.deflection)?;

        let mut mesh = RenderMesh::default();
        for face_id in traversal.faces(store, self.shape)? {
            let Some(triangulation) = traversal.triangulation(store, face_id)? else {
                debug!("face carries no triangulation, skipping");
                continue;
            };
            let location = traversal.location(store, face_id)?;
            let reversed = traversal.orientation(store, face_id)?.is_reversed();

            let offset = mesh.positions.len() as u32;
            for i in 1..=triangulation.nb_nodes() {
                // Indices below stay within nb_nodes, so the lookups
                // cannot miss.
                if let Some(node) = triangulation.node(i) {
                    mesh.positions.push(location.transform_point(node));
                }
            }
            for i in 1..=triangulation.nb_triangles() {
                let Some(mut triple) = triangulation.triangle(i) else {
                    continue;
                };
                if reversed {
                    triple.swap(1, 2);
                }
                mesh.triangles
                    .push([offset + triple[0] - 1, offset + triple[1] - 1, offset + triple[2] - 1]);
            }
        }
        Ok(mesh)
    }
}

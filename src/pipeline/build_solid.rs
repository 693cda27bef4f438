use tracing::{debug, warn};

use crate::error::Result;
use crate::kernel::{Construction, KernelSession, Sewing};
use crate::math::{Point3, SEWING_TOLERANCE};
use crate::mesh::Mesh;
use crate::topology::Shape;

/// Converts an indexed polygon mesh into a sewn, classified solid.
///
/// Each polygon becomes a planar face built edge by edge through the
/// construction module; the faces are collected into a compound, sewn
/// into a shell and classified into a solid. Polygons that cannot form
/// a valid face (degenerate edges, out-of-range indices, open chains)
/// are dropped with a log entry rather than failing the conversion.
#[derive(Debug)]
pub struct SolidFromMesh<'a> {
    mesh: &'a Mesh,
}

impl<'a> SolidFromMesh<'a> {
    /// Creates the conversion over a mesh.
    #[must_use]
    pub fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// Runs the conversion within a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session lacks the construction or sewing
    /// capability, or if no polygon survives into the sewn shell.
    pub fn execute(&self, session: &mut KernelSession) -> Result<Shape> {
        let construction = session.resolve::<Construction>()?;
        let sewing = session.resolve::<Sewing>()?;
        let store = session.store_mut();

        let positions = self.mesh.world_positions();
        let compound = construction.make_compound(store);
        let mut skipped = 0usize;

        'polygons: for polygon in &self.mesh.polygons {
            let mut loop_points = Vec::with_capacity(polygon.len());
            for &index in polygon {
                let Some(point) = positions.get(index as usize) else {
                    warn!(index, "polygon references a missing position");
                    skipped += 1;
                    continue 'polygons;
                };
                loop_points.push(*point);
            }
            match build_face(&construction, store, &loop_points) {
                Ok(Some(face)) => construction.add_to_compound(store, compound, face)?,
                Ok(None) | Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "dropped degenerate polygons during solid build");
        }

        let shell = sewing.sew(store, compound, SEWING_TOLERANCE)?;
        let solid = sewing.make_solid(store, shell)?;
        Ok(Shape::Solid(solid))
    }
}

/// Builds one planar face from an ordered loop, edge by edge.
///
/// Returns `Ok(None)` when the loop does not close into a wire, which
/// the caller counts as a skipped polygon.
fn build_face(
    construction: &Construction,
    store: &mut crate::topology::TopologyStore,
    loop_points: &[Point3],
) -> Result<Option<crate::topology::FaceId>> {
    if loop_points.len() < 3 {
        return Ok(None);
    }
    let mut builder = construction.wire_builder();
    for i in 0..loop_points.len() {
        let a = loop_points[i];
        let b = loop_points[(i + 1) % loop_points.len()];
        let edge = construction.make_edge(store, a, b)?;
        builder.add(store, edge)?;
    }
    if !builder.is_done() {
        return Ok(None);
    }
    let wire = builder.wire(store)?;
    Ok(Some(construction.make_face(store, wire)?))
}

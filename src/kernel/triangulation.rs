use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation as SpadeTriangulation};
use tracing::debug;

use crate::error::{Result, TessellationError};
use crate::math::polygon::winding_number_2d;
use crate::math::Point3;
use crate::topology::{FaceData, FaceTriangulation, Shape, TopologyStore};

use super::{Capability, KernelModule};

/// Incremental triangulation capability group.
#[derive(Debug)]
pub struct Triangulation;

impl KernelModule for Triangulation {
    const CAPABILITY: Capability = Capability::Triangulation;

    fn bind() -> Self {
        Self
    }
}

impl Triangulation {
    /// Triangulates every face of a shape, caching the result on each
    /// face.
    ///
    /// Faces that already carry a triangulation are left untouched, so
    /// repeated meshing of the same shape is cheap. Faces whose loop
    /// cannot be triangulated are skipped rather than failing the whole
    /// shape.
    ///
    /// Planar faces are reproduced exactly by their boundary chords, so
    /// any positive `deflection` is met without refinement.
    ///
    /// # Errors
    ///
    /// Returns an error if `deflection` is not strictly positive or the
    /// shape references missing topology.
    pub fn incremental_mesh(
        &self,
        store: &mut TopologyStore,
        shape: Shape,
        deflection: f64,
    ) -> Result<()> {
        if !deflection.is_finite() || deflection <= 0.0 {
            return Err(TessellationError::InvalidParameters(format!(
                "linear deflection must be positive, got {deflection}"
            ))
            .into());
        }

        for face_id in store.shape_faces(shape)? {
            if store.face(face_id)?.triangulation.is_some() {
                continue;
            }
            let points = store.wire_points(store.face(face_id)?.outer_wire)?;
            match triangulate_face(store.face(face_id)?, &points) {
                Ok(triangulation) => {
                    store.face_mut(face_id)?.triangulation = Some(triangulation);
                }
                Err(error) => {
                    debug!(%error, "skipping untriangulable face");
                }
            }
        }
        Ok(())
    }
}

/// Triangulates a single planar face via constrained Delaunay.
///
/// Boundary points are projected into the face plane's UV frame, the
/// loop is inserted as constraint edges, and triangles whose centroid
/// falls outside the loop are discarded. The plane frame satisfies
/// `u_dir × v_dir = normal`, so counter-clockwise UV triangles come
/// back counter-clockwise around the face normal.
fn triangulate_face(face: &FaceData, points: &[Point3]) -> Result<FaceTriangulation> {
    if points.len() < 3 {
        return Err(
            TessellationError::Failed("face loop needs at least 3 points".into()).into(),
        );
    }

    let loop_2d: Vec<(f64, f64)> = points.iter().map(|p| face.plane.project(p)).collect();

    let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
    let mut handles = Vec::with_capacity(loop_2d.len());
    for &(u, v) in &loop_2d {
        let handle = cdt
            .insert(SpadePoint2::new(u, v))
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        handles.push(handle);
    }
    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to {
            cdt.add_constraint(from, to);
        }
    }

    let mut nodes = vec![Point3::origin(); cdt.num_vertices()];
    for vertex in cdt.vertices() {
        let position = vertex.position();
        nodes[vertex.fix().index()] = face.plane.point_at(position.x, position.y);
    }

    let mut triangles = Vec::new();
    for face_handle in cdt.inner_faces() {
        let vertices = face_handle.vertices();
        let centroid_u =
            vertices.iter().map(|vh| vh.position().x).sum::<f64>() / 3.0;
        let centroid_v =
            vertices.iter().map(|vh| vh.position().y).sum::<f64>() / 3.0;
        if winding_number_2d(centroid_u, centroid_v, &loop_2d) == 0 {
            continue;
        }
        let mut triple = [0u32; 3];
        for (slot, vh) in triple.iter_mut().zip(vertices.iter()) {
            #[allow(clippy::cast_possible_truncation)]
            {
                // Kernel triangulations are 1-based.
                *slot = vh.fix().index() as u32 + 1;
            }
        }
        triangles.push(triple);
    }

    if triangles.is_empty() {
        return Err(TessellationError::Failed("face loop bounds no interior".into()).into());
    }
    Ok(FaceTriangulation::new(nodes, triangles))
}

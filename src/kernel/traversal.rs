use crate::error::Result;
use crate::math::{Isometry3, Point3};
use crate::topology::{FaceId, FaceTriangulation, Orientation, Shape, TopologyStore};

use super::{Capability, KernelModule};

/// Shape traversal capability group: faces, their placements and
/// cached triangulations, and shape extents.
#[derive(Debug)]
pub struct Traversal;

impl KernelModule for Traversal {
    const CAPABILITY: Capability = Capability::Traversal;

    fn bind() -> Self {
        Self
    }
}

impl Traversal {
    /// Returns the faces of a shape in deterministic order.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape references missing topology.
    pub fn faces(&self, store: &TopologyStore, shape: Shape) -> Result<Vec<FaceId>> {
        Ok(store.shape_faces(shape)?)
    }

    /// Returns a face's cached triangulation, if it has been meshed.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn triangulation<'a>(
        &self,
        store: &'a TopologyStore,
        face: FaceId,
    ) -> Result<Option<&'a FaceTriangulation>> {
        Ok(store.face(face)?.triangulation.as_ref())
    }

    /// Returns a face's placement within its shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn location(&self, store: &TopologyStore, face: FaceId) -> Result<Isometry3> {
        Ok(store.face(face)?.location)
    }

    /// Returns a face's orientation flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is not found.
    pub fn orientation(&self, store: &TopologyStore, face: FaceId) -> Result<Orientation> {
        Ok(store.face(face)?.orientation)
    }

    /// Returns the axis-aligned bounding box of a shape's boundary
    /// points in shape space, or `None` for a shape with no points.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape references missing topology.
    pub fn bounding_box(
        &self,
        store: &TopologyStore,
        shape: Shape,
    ) -> Result<Option<(Point3, Point3)>> {
        let mut bounds: Option<(Point3, Point3)> = None;
        for face_id in store.shape_faces(shape)? {
            let face = store.face(face_id)?;
            for point in store.wire_points(face.outer_wire)? {
                let point = face.location.transform_point(&point);
                match &mut bounds {
                    Some((min, max)) => {
                        min.x = min.x.min(point.x);
                        min.y = min.y.min(point.y);
                        min.z = min.z.min(point.z);
                        max.x = max.x.max(point.x);
                        max.y = max.y.max(point.y);
                        max.z = max.z.max(point.z);
                    }
                    None => bounds = Some((point, point)),
                }
            }
        }
        Ok(bounds)
    }
}

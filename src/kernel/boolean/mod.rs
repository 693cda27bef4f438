pub mod bsp;

use tracing::debug;

use crate::error::Result;
use crate::math::{Point3, SEWING_TOLERANCE};
use crate::topology::{CompoundData, Shape, TopologyStore};

use self::bsp::BspPolygon;
use super::construction::face_from_loop;
use super::sewing::{classify_solid, sew_compound};
use super::{Capability, KernelModule};

/// The CSG operators the kernel provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsgOp {
    /// Boolean union.
    Fuse,
    /// Boolean difference (first operand minus second).
    Cut,
    /// Boolean intersection.
    Common,
}

/// Boolean CSG capability group.
#[derive(Debug)]
pub struct BooleanCsg;

impl KernelModule for BooleanCsg {
    const CAPABILITY: Capability = Capability::BooleanCsg;

    fn bind() -> Self {
        Self
    }
}

impl BooleanCsg {
    /// Creates a Boolean operation object over two shapes.
    ///
    /// The operation follows the kernel protocol: construct, `build`,
    /// then check `is_done` before taking the result shape.
    #[must_use]
    pub fn operation(&self, op: CsgOp, a: Shape, b: Shape) -> BooleanOperation {
        BooleanOperation {
            op,
            a,
            b,
            result: None,
        }
    }
}

/// A constructed-but-not-yet-executed Boolean operation.
///
/// `build` may succeed while the operation still reports not done —
/// degenerate operands and empty results are not errors, they are
/// absent results the caller must check for via [`Self::is_done`].
#[derive(Debug)]
pub struct BooleanOperation {
    op: CsgOp,
    a: Shape,
    b: Shape,
    result: Option<Shape>,
}

impl BooleanOperation {
    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if an operand references missing topology or
    /// the result boundary cannot be sewn into a shape. Degenerate
    /// inputs and empty results are reported through [`Self::is_done`]
    /// instead.
    pub fn build(&mut self, store: &mut TopologyStore) -> Result<()> {
        self.result = None;

        // Operating a shape against itself is degenerate input; the
        // kernel completes without a result rather than failing.
        if self.a == self.b {
            debug!(op = ?self.op, "boolean over identical shape handles reports not done");
            return Ok(());
        }

        let polygons_a = boundary_polygons(store, self.a)?;
        let polygons_b = boundary_polygons(store, self.b)?;
        if polygons_a.is_empty() || polygons_b.is_empty() {
            debug!(op = ?self.op, "boolean operand has no usable boundary; not done");
            return Ok(());
        }

        let merged = match self.op {
            CsgOp::Fuse => bsp::union(polygons_a, polygons_b),
            CsgOp::Cut => bsp::difference(polygons_a, polygons_b),
            CsgOp::Common => bsp::intersection(polygons_a, polygons_b),
        };
        if merged.is_empty() {
            debug!(op = ?self.op, "boolean result boundary is empty; not done");
            return Ok(());
        }

        self.result = assemble_shape(store, &merged)?;
        Ok(())
    }

    /// Whether the operation completed with a result.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.result.is_some()
    }

    /// The result shape, if the operation is done.
    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        self.result
    }
}

/// Extracts a shape's boundary as outward-wound polygon loops.
fn boundary_polygons(store: &TopologyStore, shape: Shape) -> Result<Vec<BspPolygon>> {
    let mut polygons = Vec::new();
    for face_id in store.shape_faces(shape)? {
        let face = store.face(face_id)?;
        let mut points: Vec<Point3> = store
            .wire_points(face.outer_wire)?
            .iter()
            .map(|p| face.location.transform_point(p))
            .collect();
        if face.orientation.is_reversed() {
            points.reverse();
        }
        if let Some(polygon) = BspPolygon::from_loop(points) {
            polygons.push(polygon);
        }
    }
    Ok(polygons)
}

/// Sews a result boundary back into a solid shape.
///
/// Individual degenerate fragments are dropped; returns `None` if no
/// fragment survives (the operation then reports not done).
fn assemble_shape(store: &mut TopologyStore, polygons: &[BspPolygon]) -> Result<Option<Shape>> {
    let mut faces = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        if let Some(face) = face_from_loop(store, &polygon.vertices) {
            faces.push(face);
        }
    }
    if faces.is_empty() {
        return Ok(None);
    }
    let compound = store.add_compound(CompoundData { faces });
    let shell = sew_compound(store, compound, SEWING_TOLERANCE)?;
    let solid = classify_solid(store, shell)?;
    Ok(Some(Shape::Solid(solid)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::sewing::sew_compound;
    use crate::math::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn cube_solid(store: &mut TopologyStore, origin: Point3, size: f64) -> Shape {
        let (x, y, z) = (origin.x, origin.y, origin.z);
        let s = size;
        let c = [
            p(x, y, z),
            p(x + s, y, z),
            p(x + s, y + s, z),
            p(x, y + s, z),
            p(x, y, z + s),
            p(x + s, y, z + s),
            p(x + s, y + s, z + s),
            p(x, y + s, z + s),
        ];
        let quads = [
            [0usize, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
        ];
        let mut faces = Vec::new();
        for quad in quads {
            let loop_points: Vec<Point3> = quad.iter().map(|&i| c[i]).collect();
            faces.push(face_from_loop(store, &loop_points).unwrap());
        }
        let compound = store.add_compound(CompoundData { faces });
        let shell = sew_compound(store, compound, SEWING_TOLERANCE).unwrap();
        let solid = classify_solid(store, shell).unwrap();
        Shape::Solid(solid)
    }

    #[test]
    fn fuse_of_overlapping_cubes_completes() {
        let mut store = TopologyStore::new();
        let a = cube_solid(&mut store, p(0.0, 0.0, 0.0), 1.0);
        let b = cube_solid(&mut store, p(0.5, 0.5, 0.5), 1.0);

        let booleans = BooleanCsg::bind();
        let mut operation = booleans.operation(CsgOp::Fuse, a, b);
        operation.build(&mut store).unwrap();

        assert!(operation.is_done());
        let Some(Shape::Solid(_)) = operation.shape() else {
            panic!("expected a solid result");
        };
    }

    #[test]
    fn self_operation_reports_not_done() {
        let mut store = TopologyStore::new();
        let a = cube_solid(&mut store, p(0.0, 0.0, 0.0), 1.0);

        let booleans = BooleanCsg::bind();
        let mut operation = booleans.operation(CsgOp::Fuse, a, a);
        operation.build(&mut store).unwrap();

        assert!(!operation.is_done());
        assert!(operation.shape().is_none());
    }

    #[test]
    fn common_of_disjoint_cubes_reports_not_done() {
        let mut store = TopologyStore::new();
        let a = cube_solid(&mut store, p(0.0, 0.0, 0.0), 1.0);
        let b = cube_solid(&mut store, p(5.0, 0.0, 0.0), 1.0);

        let booleans = BooleanCsg::bind();
        let mut operation = booleans.operation(CsgOp::Common, a, b);
        operation.build(&mut store).unwrap();

        assert!(!operation.is_done());
    }

    #[test]
    fn cut_of_overlapping_cubes_stays_inside_the_target() {
        let mut store = TopologyStore::new();
        let a = cube_solid(&mut store, p(0.0, 0.0, 0.0), 1.0);
        let b = cube_solid(&mut store, p(0.5, 0.5, 0.5), 1.0);

        let booleans = BooleanCsg::bind();
        let mut operation = booleans.operation(CsgOp::Cut, a, b);
        operation.build(&mut store).unwrap();
        assert!(operation.is_done());

        let shape = operation.shape().unwrap();
        for face_id in store.shape_faces(shape).unwrap() {
            let wire = store.face(face_id).unwrap().outer_wire;
            for point in store.wire_points(wire).unwrap() {
                for coord in [point.x, point.y, point.z] {
                    assert!(coord >= -1e-6 && coord <= 1.0 + 1e-6);
                }
            }
        }
    }
}

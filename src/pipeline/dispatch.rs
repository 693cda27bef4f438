use tracing::debug;

use crate::error::Result;
use crate::kernel::{BooleanCsg, CsgOp, KernelSession};
use crate::topology::Shape;

/// The Boolean operations the pipeline exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Union,
    Difference,
    Intersection,
}

impl BooleanKind {
    fn op(self) -> CsgOp {
        match self {
            Self::Union => CsgOp::Fuse,
            Self::Difference => CsgOp::Cut,
            Self::Intersection => CsgOp::Common,
        }
    }
}

/// Runs a Boolean operation between two shapes within a session.
///
/// Returns `Ok(None)` when the operation completes without a result,
/// which covers identical operands, degenerate inputs and empty
/// intersections. Callers decide whether an absent result is an error
/// for their use case.
///
/// # Errors
///
/// Returns an error if the session lacks the Boolean capability or the
/// operation fails on valid input.
pub fn execute_boolean(
    session: &mut KernelSession,
    kind: BooleanKind,
    a: Shape,
    b: Shape,
) -> Result<Option<Shape>> {
    let booleans = session.resolve::<BooleanCsg>()?;
    let mut operation = booleans.operation(kind.op(), a, b);
    operation.build(session.store_mut())?;
    if !operation.is_done() {
        debug!(?kind, "boolean completed without a result");
        return Ok(None);
    }
    Ok(operation.shape())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Matrix4, Point3, Vector3};
    use crate::pipeline::{SolidFromMesh, TessellateShape};
    use crate::Mesh;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn init_logs() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn unit_cube_at(offset: Vector3) -> Mesh {
        let positions = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 1.0),
        ];
        let polygons = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![1, 2, 6, 5],
            vec![2, 3, 7, 6],
            vec![3, 0, 4, 7],
        ];
        Mesh::with_transform(positions, polygons, Matrix4::new_translation(&offset))
    }

    fn two_overlapping_cubes(session: &mut KernelSession) -> (Shape, Shape) {
        let a = SolidFromMesh::new(&unit_cube_at(Vector3::zeros()))
            .execute(session)
            .unwrap();
        let b = SolidFromMesh::new(&unit_cube_at(Vector3::new(0.5, 0.5, 0.5)))
            .execute(session)
            .unwrap();
        (a, b)
    }

    #[test]
    fn all_kinds_produce_renderable_results_for_overlapping_cubes() {
        init_logs();
        for kind in [
            BooleanKind::Union,
            BooleanKind::Difference,
            BooleanKind::Intersection,
        ] {
            let mut session = KernelSession::new();
            let (a, b) = two_overlapping_cubes(&mut session);

            let shape = execute_boolean(&mut session, kind, a, b)
                .unwrap()
                .unwrap_or_else(|| panic!("{kind:?} over overlapping cubes must produce a shape"));
            let mesh = TessellateShape::new(shape).execute(&mut session).unwrap();

            assert!(!mesh.triangles.is_empty());
            for point in &mesh.positions {
                for coord in [point.x, point.y, point.z] {
                    assert!(coord >= -0.01 && coord <= 1.51);
                }
            }
        }
    }

    #[test]
    fn intersection_of_overlapping_cubes_spans_the_overlap() {
        let mut session = KernelSession::new();
        let (a, b) = two_overlapping_cubes(&mut session);

        let shape = execute_boolean(&mut session, BooleanKind::Intersection, a, b)
            .unwrap()
            .unwrap();
        let mesh = TessellateShape::new(shape).execute(&mut session).unwrap();
        for point in &mesh.positions {
            for coord in [point.x, point.y, point.z] {
                assert!(coord >= 0.5 - 1e-6 && coord <= 1.0 + 1e-6);
            }
        }
    }

    #[test]
    fn disjoint_intersection_has_no_result() {
        let mut session = KernelSession::new();
        let a = SolidFromMesh::new(&unit_cube_at(Vector3::zeros()))
            .execute(&mut session)
            .unwrap();
        let b = SolidFromMesh::new(&unit_cube_at(Vector3::new(10.0, 0.0, 0.0)))
            .execute(&mut session)
            .unwrap();

        let result = execute_boolean(&mut session, BooleanKind::Intersection, a, b).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn disjoint_union_returns_without_raising() {
        let mut session = KernelSession::new();
        let a = SolidFromMesh::new(&unit_cube_at(Vector3::zeros()))
            .execute(&mut session)
            .unwrap();
        let b = SolidFromMesh::new(&unit_cube_at(Vector3::new(10.0, 0.0, 0.0)))
            .execute(&mut session)
            .unwrap();

        // Either a multi-component result or no result is acceptable.
        let result = execute_boolean(&mut session, BooleanKind::Union, a, b).unwrap();
        if let Some(shape) = result {
            assert!(!session.store().shape_faces(shape).unwrap().is_empty());
        }
    }

    #[test]
    fn self_union_has_no_result() {
        let mut session = KernelSession::new();
        let a = SolidFromMesh::new(&unit_cube_at(Vector3::zeros()))
            .execute(&mut session)
            .unwrap();

        let result = execute_boolean(&mut session, BooleanKind::Union, a, a).unwrap();
        assert!(result.is_none());
    }
}

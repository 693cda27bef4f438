use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::Plane;
use crate::math::polygon::{centroid, newell_normal};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{
    CompoundData, CompoundId, EdgeData, EdgeId, FaceData, FaceId, OrientedEdge, TopologyStore,
    VertexData, WireData, WireId,
};

use super::{Capability, KernelModule};

/// Construction capability group: edges from point pairs, wire
/// accumulation, planar faces from closed wires, compound assembly.
#[derive(Debug)]
pub struct Construction;

impl KernelModule for Construction {
    const CAPABILITY: Capability = Capability::Construction;

    fn bind() -> Self {
        Self
    }
}

impl Construction {
    /// Creates a straight edge between two points, adding its vertices
    /// to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide (degenerate edge).
    pub fn make_edge(&self, store: &mut TopologyStore, a: Point3, b: Point3) -> Result<EdgeId> {
        make_edge(store, a, b)
    }

    /// Starts accumulating edges into a wire.
    #[must_use]
    pub fn wire_builder(&self) -> WireBuilder {
        WireBuilder::new()
    }

    /// Creates a planar face bounded by a closed wire.
    ///
    /// The face plane is fitted to the wire loop by Newell's method, so
    /// its normal follows the loop's winding.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not closed or bounds a
    /// zero-area region.
    pub fn make_face(&self, store: &mut TopologyStore, wire: WireId) -> Result<FaceId> {
        if !store.wire(wire)?.is_closed {
            return Err(TopologyError::WireNotClosed.into());
        }
        make_face(store, wire)
    }

    /// Creates an empty compound to accumulate faces into.
    pub fn make_compound(&self, store: &mut TopologyStore) -> CompoundId {
        store.add_compound(CompoundData::default())
    }

    /// Adds a face to a compound.
    ///
    /// # Errors
    ///
    /// Returns an error if the compound is not found.
    pub fn add_to_compound(
        &self,
        store: &mut TopologyStore,
        compound: CompoundId,
        face: FaceId,
    ) -> Result<()> {
        store.compound_mut(compound)?.faces.push(face);
        Ok(())
    }
}

/// Accumulates edges into a closed wire, tracking whether the chain is
/// connected and closes on itself.
///
/// Mirrors the kernel protocol of adding edges one by one and checking
/// completion afterwards: a disconnected or open chain does not error,
/// it just never reports done.
#[derive(Debug, Default)]
pub struct WireBuilder {
    edges: Vec<EdgeId>,
    first_start: Option<Point3>,
    last_end: Option<Point3>,
    broken: bool,
}

impl WireBuilder {
    /// Creates an empty wire builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an edge to the chain.
    ///
    /// The edge must start where the previous one ended; otherwise the
    /// chain is marked broken and the builder will not complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or its vertices are not found.
    pub fn add(&mut self, store: &TopologyStore, edge: EdgeId) -> Result<()> {
        let data = store.edge(edge)?;
        let start = store.vertex(data.start)?.point;
        let end = store.vertex(data.end)?.point;

        match self.last_end {
            Some(last) if (start - last).norm() > TOLERANCE => self.broken = true,
            Some(_) => {}
            None => self.first_start = Some(start),
        }
        self.last_end = Some(end);
        self.edges.push(edge);
        Ok(())
    }

    /// Whether the accumulated chain forms a closed loop.
    #[must_use]
    pub fn is_done(&self) -> bool {
        if self.broken || self.edges.len() < 3 {
            return false;
        }
        match (self.first_start, self.last_end) {
            (Some(first), Some(last)) => (first - last).norm() <= TOLERANCE,
            _ => false,
        }
    }

    /// Finishes the wire, consuming the builder.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain is not a closed loop.
    pub fn wire(self, store: &mut TopologyStore) -> Result<WireId> {
        if !self.is_done() {
            return Err(TopologyError::WireNotClosed.into());
        }
        let edges = self
            .edges
            .into_iter()
            .map(|edge| OrientedEdge::new(edge, true))
            .collect();
        Ok(store.add_wire(WireData {
            edges,
            is_closed: true,
        }))
    }
}

pub(crate) fn make_edge(store: &mut TopologyStore, a: Point3, b: Point3) -> Result<EdgeId> {
    if (b - a).norm() < TOLERANCE {
        return Err(GeometryError::Degenerate(format!("coincident edge points at {a}")).into());
    }
    let start = store.add_vertex(VertexData::new(a));
    let end = store.add_vertex(VertexData::new(b));
    Ok(store.add_edge(EdgeData::new(start, end)))
}

pub(crate) fn make_face(store: &mut TopologyStore, wire: WireId) -> Result<FaceId> {
    let points = store.wire_points(wire)?;
    let normal = newell_normal(&points);
    if normal.norm() < TOLERANCE {
        return Err(GeometryError::Degenerate("face loop bounds zero area".into()).into());
    }
    let plane = Plane::from_normal(centroid(&points), normal)?;
    Ok(store.add_face(FaceData::new(plane, wire)))
}

/// Builds a face from an ordered point loop, best effort.
///
/// Returns `None` if any edge is degenerate, the loop does not close,
/// or the face bounds zero area. Used where a malformed loop must be
/// dropped instead of aborting the surrounding operation.
pub(crate) fn face_from_loop(store: &mut TopologyStore, points: &[Point3]) -> Option<FaceId> {
    if points.len() < 3 {
        return None;
    }
    let mut builder = WireBuilder::new();
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let edge = make_edge(store, a, b).ok()?;
        builder.add(store, edge).ok()?;
    }
    if !builder.is_done() {
        return None;
    }
    let wire = builder.wire(store).ok()?;
    make_face(store, wire).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn edge_from_coincident_points_is_degenerate() {
        let mut store = TopologyStore::new();
        let construction = Construction::bind();
        let result = construction.make_edge(&mut store, p(1.0, 2.0, 3.0), p(1.0, 2.0, 3.0));
        assert!(result.is_err());
    }

    #[test]
    fn wire_builder_closes_a_triangle() {
        let mut store = TopologyStore::new();
        let construction = Construction::bind();
        let corners = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)];

        let mut builder = construction.wire_builder();
        for i in 0..3 {
            let edge = construction
                .make_edge(&mut store, corners[i], corners[(i + 1) % 3])
                .unwrap();
            builder.add(&store, edge).unwrap();
            // Completion requires the closing edge.
            assert_eq!(builder.is_done(), i == 2);
        }
        let wire = builder.wire(&mut store).unwrap();
        assert!(store.wire(wire).unwrap().is_closed);
        assert_eq!(store.wire_points(wire).unwrap().len(), 3);
    }

    #[test]
    fn disconnected_chain_never_completes() {
        let mut store = TopologyStore::new();
        let construction = Construction::bind();

        let mut builder = construction.wire_builder();
        let e1 = construction
            .make_edge(&mut store, p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0))
            .unwrap();
        // Gap: starts away from (1, 0, 0).
        let e2 = construction
            .make_edge(&mut store, p(2.0, 0.0, 0.0), p(0.0, 1.0, 0.0))
            .unwrap();
        let e3 = construction
            .make_edge(&mut store, p(0.0, 1.0, 0.0), p(0.0, 0.0, 0.0))
            .unwrap();
        for edge in [e1, e2, e3] {
            builder.add(&store, edge).unwrap();
        }
        assert!(!builder.is_done());
        assert!(builder.wire(&mut store).is_err());
    }

    #[test]
    fn face_plane_follows_loop_winding() {
        let mut store = TopologyStore::new();
        let construction = Construction::bind();
        let corners = [
            p(0.0, 0.0, 2.0),
            p(1.0, 0.0, 2.0),
            p(1.0, 1.0, 2.0),
            p(0.0, 1.0, 2.0),
        ];

        let mut builder = construction.wire_builder();
        for i in 0..4 {
            let edge = construction
                .make_edge(&mut store, corners[i], corners[(i + 1) % 4])
                .unwrap();
            builder.add(&store, edge).unwrap();
        }
        let wire = builder.wire(&mut store).unwrap();
        let face = construction.make_face(&mut store, wire).unwrap();

        let normal = *store.face(face).unwrap().plane.normal();
        assert_relative_eq!(normal.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn face_from_collinear_loop_is_rejected() {
        let mut store = TopologyStore::new();
        let points = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        assert!(face_from_loop(&mut store, &points).is_none());
    }

    #[test]
    fn compound_accumulates_faces() {
        let mut store = TopologyStore::new();
        let construction = Construction::bind();
        let compound = construction.make_compound(&mut store);

        let face = face_from_loop(
            &mut store,
            &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)],
        )
        .unwrap();
        construction
            .add_to_compound(&mut store, compound, face)
            .unwrap();
        assert_eq!(store.compound(compound).unwrap().faces, vec![face]);
    }
}

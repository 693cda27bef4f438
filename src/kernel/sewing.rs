use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::math::Point3;
use crate::topology::{
    CompoundId, EdgeData, EdgeId, FaceData, FaceId, Orientation, OrientedEdge, ShellData, ShellId,
    SolidData, SolidId, TopologyStore, VertexData, VertexId, WireData,
};

use super::{Capability, KernelModule};

/// Sewing capability group: merges independently built faces into a
/// connected shell and classifies shells as solids.
#[derive(Debug)]
pub struct Sewing;

impl KernelModule for Sewing {
    const CAPABILITY: Capability = Capability::Sewing;

    fn bind() -> Self {
        Self
    }
}

impl Sewing {
    /// Runs a sewing pass over a compound of faces.
    ///
    /// Vertices closer than `tolerance` are welded into one, coincident
    /// edges across adjacent faces are shared, and the resulting shell
    /// is marked closed when every edge is used by exactly two faces.
    /// A closed shell whose faces wind inward (negative enclosed
    /// volume) has every face flagged [`Orientation::Reversed`] so that
    /// downstream consumers emit outward windings.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is not positive or the pass
    /// produces an empty shell.
    pub fn sew(
        &self,
        store: &mut TopologyStore,
        compound: CompoundId,
        tolerance: f64,
    ) -> Result<ShellId> {
        sew_compound(store, compound, tolerance)
    }

    /// Classifies a sewn shell as a solid.
    ///
    /// An open shell still classifies, producing a degenerate solid;
    /// supplying closed input is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell is empty.
    pub fn make_solid(&self, store: &mut TopologyStore, shell: ShellId) -> Result<SolidId> {
        classify_solid(store, shell)
    }
}

/// Welds vertices of loop points to canonical store vertices using a
/// tolerance grid with neighbor-cell lookup.
struct VertexWelder {
    tolerance: f64,
    cells: HashMap<(i64, i64, i64), Vec<VertexId>>,
}

impl VertexWelder {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cells: HashMap::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, point: &Point3) -> (i64, i64, i64) {
        (
            (point.x / self.tolerance).round() as i64,
            (point.y / self.tolerance).round() as i64,
            (point.z / self.tolerance).round() as i64,
        )
    }

    fn canonical(&mut self, store: &mut TopologyStore, point: Point3) -> VertexId {
        let (cx, cy, cz) = self.cell_of(&point);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &id in candidates {
                        if let Ok(existing) = store.vertex(id) {
                            if (existing.point - point).norm() <= self.tolerance {
                                return id;
                            }
                        }
                    }
                }
            }
        }
        let id = store.add_vertex(VertexData::new(point));
        self.cells.entry((cx, cy, cz)).or_default().push(id);
        id
    }
}

pub(crate) fn sew_compound(
    store: &mut TopologyStore,
    compound: CompoundId,
    tolerance: f64,
) -> Result<ShellId> {
    if tolerance <= 0.0 {
        return Err(
            OperationError::InvalidInput(format!("sewing tolerance must be positive: {tolerance}"))
                .into(),
        );
    }

    let face_ids = store.compound(compound)?.faces.clone();
    let mut welder = VertexWelder::new(tolerance);
    let mut shared_edges: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
    let mut edge_use: HashMap<(VertexId, VertexId), u32> = HashMap::new();
    let mut sewn_faces: Vec<FaceId> = Vec::new();
    let mut loops: Vec<Vec<Point3>> = Vec::new();
    let mut dropped = 0usize;

    for face_id in face_ids {
        let face = store.face(face_id)?;
        let plane = face.plane.clone();
        let outer_wire = face.outer_wire;
        let points = store.wire_points(outer_wire)?;

        let mut loop_ids: Vec<VertexId> = Vec::with_capacity(points.len());
        for point in &points {
            let id = welder.canonical(store, *point);
            if loop_ids.last() != Some(&id) {
                loop_ids.push(id);
            }
        }
        while loop_ids.len() > 1 && loop_ids.first() == loop_ids.last() {
            loop_ids.pop();
        }
        if loop_ids.len() < 3 {
            dropped += 1;
            continue;
        }

        let mut oriented = Vec::with_capacity(loop_ids.len());
        let mut loop_points = Vec::with_capacity(loop_ids.len());
        for i in 0..loop_ids.len() {
            let a = loop_ids[i];
            let b = loop_ids[(i + 1) % loop_ids.len()];
            let key = if a < b { (a, b) } else { (b, a) };
            let edge = *shared_edges
                .entry(key)
                .or_insert_with(|| store.add_edge(EdgeData::new(key.0, key.1)));
            *edge_use.entry(key).or_insert(0) += 1;
            oriented.push(OrientedEdge::new(edge, a == key.0));
            loop_points.push(store.vertex(a)?.point);
        }

        let wire = store.add_wire(WireData {
            edges: oriented,
            is_closed: true,
        });
        sewn_faces.push(store.add_face(FaceData::new(plane, wire)));
        loops.push(loop_points);
    }

    if dropped > 0 {
        debug!(dropped, "sewing dropped faces that collapsed under the weld tolerance");
    }
    if sewn_faces.is_empty() {
        return Err(OperationError::Failed("sewing produced an empty shell".into()).into());
    }

    let is_closed = edge_use.values().all(|&count| count == 2);
    if is_closed && enclosed_volume(&loops) < 0.0 {
        // The boundary winds inward; flag every face reversed so
        // winding-sensitive consumers emit outward triangles.
        for &face_id in &sewn_faces {
            store.face_mut(face_id)?.orientation = Orientation::Reversed;
        }
    }

    Ok(store.add_shell(ShellData {
        faces: sewn_faces,
        is_closed,
    }))
}

pub(crate) fn classify_solid(store: &mut TopologyStore, shell: ShellId) -> Result<SolidId> {
    let data = store.shell(shell)?;
    if data.faces.is_empty() {
        return Err(OperationError::Failed("cannot classify an empty shell as a solid".into()).into());
    }
    if !data.is_closed {
        warn!("classifying an open shell as a solid; the result is degenerate");
    }
    Ok(store.add_solid(SolidData { outer_shell: shell }))
}

/// Signed volume enclosed by a set of planar face loops, via the
/// divergence theorem over fan triangles. Positive when the loops wind
/// counter-clockwise seen from outside.
fn enclosed_volume(loops: &[Vec<Point3>]) -> f64 {
    let mut volume = 0.0;
    for loop_points in loops {
        let p0 = loop_points[0].coords;
        for window in loop_points[1..].windows(2) {
            let p1 = window[0].coords;
            let p2 = window[1].coords;
            volume += p0.dot(&p1.cross(&p2)) / 6.0;
        }
    }
    volume
}

//! BSP-tree solid clipping over planar boundary polygons.
//!
//! Each solid's boundary is a set of convex-or-simple planar polygons
//! with outward winding. Boolean results are computed by mutually
//! clipping two BSP trees and merging the surviving fragments.

use crate::math::polygon::newell_normal;
use crate::math::{Point3, Vector3};

/// Splitting tolerance: points closer than this to a plane are treated
/// as lying on it.
const EPSILON: f64 = 1e-5;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// An oriented splitting plane, `normal · p = w`.
#[derive(Debug, Clone, Copy)]
pub struct BspPlane {
    normal: Vector3,
    w: f64,
}

impl BspPlane {
    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Partitions `polygon` by this plane into the four split buckets.
    fn split_polygon(&self, polygon: &BspPolygon) -> SplitResult {
        let mut result = SplitResult::default();
        let mut polygon_type = COPLANAR;
        let mut types = Vec::with_capacity(polygon.vertices.len());

        for vertex in &polygon.vertices {
            let t = self.normal.dot(&vertex.coords) - self.w;
            let vertex_type = if t < -EPSILON {
                BACK
            } else if t > EPSILON {
                FRONT
            } else {
                COPLANAR
            };
            polygon_type |= vertex_type;
            types.push(vertex_type);
        }

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    result.coplanar_front.push(polygon.clone());
                } else {
                    result.coplanar_back.push(polygon.clone());
                }
            }
            FRONT => result.front.push(polygon.clone()),
            BACK => result.back.push(polygon.clone()),
            _ => {
                let mut front_vertices = Vec::new();
                let mut back_vertices = Vec::new();
                let count = polygon.vertices.len();
                for i in 0..count {
                    let j = (i + 1) % count;
                    let ti = types[i];
                    let tj = types[j];
                    let vi = polygon.vertices[i];
                    let vj = polygon.vertices[j];

                    if ti != BACK {
                        front_vertices.push(vi);
                    }
                    if ti != FRONT {
                        back_vertices.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let direction = vj - vi;
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&direction);
                        let crossing = vi + direction * t;
                        front_vertices.push(crossing);
                        back_vertices.push(crossing);
                    }
                }
                if let Some(fragment) = BspPolygon::from_loop(front_vertices) {
                    result.front.push(fragment);
                }
                if let Some(fragment) = BspPolygon::from_loop(back_vertices) {
                    result.back.push(fragment);
                }
            }
        }

        result
    }
}

#[derive(Debug, Default)]
struct SplitResult {
    coplanar_front: Vec<BspPolygon>,
    coplanar_back: Vec<BspPolygon>,
    front: Vec<BspPolygon>,
    back: Vec<BspPolygon>,
}

/// A planar boundary polygon with outward winding.
#[derive(Debug, Clone)]
pub struct BspPolygon {
    pub vertices: Vec<Point3>,
    plane: BspPlane,
}

impl BspPolygon {
    /// Builds a polygon from an ordered vertex loop.
    ///
    /// Returns `None` for loops with fewer than three vertices or a
    /// degenerate (near-zero area) boundary.
    #[must_use]
    pub fn from_loop(vertices: Vec<Point3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let normal = newell_normal(&vertices);
        let length = normal.norm();
        if length < EPSILON * EPSILON {
            return None;
        }
        let normal = normal / length;
        let w = normal.dot(&vertices[0].coords);
        Some(Self {
            vertices,
            plane: BspPlane { normal, w },
        })
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

/// A node of a BSP tree built from boundary polygons.
#[derive(Debug, Default)]
struct BspNode {
    plane: Option<BspPlane>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
    polygons: Vec<BspPolygon>,
}

impl BspNode {
    fn from_polygons(polygons: Vec<BspPolygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Converts this tree to solid space becoming its complement.
    fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Removes the parts of `polygons` inside the solid this tree bounds.
    fn clip_polygons(&self, polygons: Vec<BspPolygon>) -> Vec<BspPolygon> {
        let Some(plane) = self.plane else {
            return polygons;
        };

        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in &polygons {
            let mut split = plane.split_polygon(polygon);
            front.append(&mut split.front);
            front.append(&mut split.coplanar_front);
            back.append(&mut split.back);
            back.append(&mut split.coplanar_back);
        }

        let mut front = match &self.front {
            Some(node) => node.clip_polygons(front),
            None => front,
        };
        let back = match &self.back {
            Some(node) => node.clip_polygons(back),
            // No back subtree: the back half-space is inside the solid.
            None => Vec::new(),
        };

        front.extend(back);
        front
    }

    /// Removes from this tree every polygon inside the solid `other` bounds.
    fn clip_to(&mut self, other: &BspNode) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    fn all_polygons(&self) -> Vec<BspPolygon> {
        let mut polygons = self.polygons.clone();
        if let Some(front) = &self.front {
            polygons.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            polygons.extend(back.all_polygons());
        }
        polygons
    }

    fn build(&mut self, polygons: Vec<BspPolygon>) {
        if polygons.is_empty() {
            return;
        }
        if self.plane.is_none() {
            self.plane = Some(polygons[0].plane);
        }
        let Some(plane) = self.plane else {
            return;
        };

        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in &polygons {
            let mut split = plane.split_polygon(polygon);
            self.polygons.append(&mut split.coplanar_front);
            self.polygons.append(&mut split.coplanar_back);
            front.append(&mut split.front);
            back.append(&mut split.back);
        }

        if !front.is_empty() {
            self.front
                .get_or_insert_with(Box::default)
                .build(front);
        }
        if !back.is_empty() {
            self.back
                .get_or_insert_with(Box::default)
                .build(back);
        }
    }
}

/// Boundary of `a ∪ b`.
#[must_use]
pub fn union(a: Vec<BspPolygon>, b: Vec<BspPolygon>) -> Vec<BspPolygon> {
    let mut a = BspNode::from_polygons(a);
    let mut b = BspNode::from_polygons(b);
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.all_polygons()
}

/// Boundary of `a \ b`.
#[must_use]
pub fn difference(a: Vec<BspPolygon>, b: Vec<BspPolygon>) -> Vec<BspPolygon> {
    let mut a = BspNode::from_polygons(a);
    let mut b = BspNode::from_polygons(b);
    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.invert();
    a.all_polygons()
}

/// Boundary of `a ∩ b`.
#[must_use]
pub fn intersection(a: Vec<BspPolygon>, b: Vec<BspPolygon>) -> Vec<BspPolygon> {
    let mut a = BspNode::from_polygons(a);
    let mut b = BspNode::from_polygons(b);
    a.invert();
    b.clip_to(&a);
    b.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    a.build(b.all_polygons());
    a.invert();
    a.all_polygons()
}

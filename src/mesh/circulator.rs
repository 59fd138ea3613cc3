//! Circulators: cyclic traversal of mesh adjacency.
//!
//! A circulator walks one adjacency relation around a *pivot* (a vertex or a
//! polygon). There are six of them, one per target kind and pivot kind:
//!
//! | pivot \ target | vertex                      | half-edge                     | polygon                      |
//! |----------------|-----------------------------|-------------------------------|------------------------------|
//! | vertex         | [`VertexVertexCirculator`]  | [`VertexHalfEdgeCirculator`]  | [`VertexPolygonCirculator`]  |
//! | polygon        | [`PolygonVertexCirculator`] | [`PolygonHalfEdgeCirculator`] | [`PolygonPolygonCirculator`] |
//!
//! Circulators never run out: after the last element they come back to the first.
//! Completion is detected by [`Circulator::at_start`], or by turning the circulator
//! into an iterator, which yields exactly one lap.
//!
//! Around a vertex the walk crosses from polygon to polygon through twins. When it
//! hits the boundary it resumes on the next fan recorded at the vertex, so fans
//! meeting at a degenerate vertex are visited one after the other and never
//! bridged.
//!
//! # Example
//! ```
//! use conslaw2d::mesh::{Circulator, PolygonalMesh};
//!
//! let mut mesh: PolygonalMesh = PolygonalMesh::new();
//! let a = mesh.add_vertex(0.0, 0.0).unwrap();
//! let b = mesh.add_vertex(1.0, 0.0).unwrap();
//! let c = mesh.add_vertex(0.0, 1.0).unwrap();
//! let p = mesh.add_polygon(&[a, b, c]).unwrap();
//!
//! let mut circ = mesh.polygon_vertices(p);
//! let mut visited = Vec::new();
//! loop {
//!     visited.push(circ.current());
//!     circ.advance();
//!     if circ.at_start() {
//!         break;
//!     }
//! }
//! assert_eq!(visited, vec![a, b, c]);
//! ```

use super::halfedge::PolygonalMesh;
use super::index::{HalfEdgeId, MeshIndex, PolygonId, VertexId};
use crate::error::{MeshError, Result};

/// A restartable cyclic traversal positioned on a half-edge.
pub trait Circulator {
    /// The index type of the underlying mesh.
    type Index: MeshIndex;

    /// What the circulator yields.
    type Item: Copy;

    /// The element at the current position.
    fn current(&self) -> Self::Item;

    /// Move to the next position.
    fn advance(&mut self);

    /// The half-edge the circulator is positioned on.
    fn position(&self) -> HalfEdgeId<Self::Index>;

    /// True if the circulator is back at its starting position.
    fn at_start(&self) -> bool;

    /// Go back to the starting position.
    fn reset(&mut self);

    /// Iterate over one full lap, starting at the current position.
    fn iter_loop(self) -> CirculatorIter<Self>
    where
        Self: Sized,
    {
        CirculatorIter {
            circ: self,
            done: false,
        }
    }
}

/// Iterator over one lap of a circulator.
#[derive(Debug, Clone)]
pub struct CirculatorIter<C> {
    circ: C,
    done: bool,
}

impl<C: Circulator> Iterator for CirculatorIter<C> {
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.circ.current();
        self.circ.advance();
        if self.circ.at_start() {
            self.done = true;
        }
        Some(item)
    }
}

// ==================== Vertex pivot ====================

/// Position of a walk around a vertex.
#[derive(Debug, Clone)]
struct VertexWalk<'a, I: MeshIndex> {
    mesh: &'a PolygonalMesh<I>,
    anchors: &'a [HalfEdgeId<I>],
    idx: usize,
    current: HalfEdgeId<I>,
    start: HalfEdgeId<I>,
    /// Set while `current` is the incoming boundary arc closing a fan.
    on_boundary: bool,
}

impl<'a, I: MeshIndex> VertexWalk<'a, I> {
    fn new(mesh: &'a PolygonalMesh<I>, v: VertexId<I>) -> Result<Self> {
        let anchors = mesh.vertex(v).anchors();
        let start = *anchors
            .last()
            .ok_or(MeshError::IsolatedVertex { vertex: v.index() })?;
        Ok(Self {
            mesh,
            anchors,
            idx: anchors.len() - 1,
            current: start,
            start,
            on_boundary: false,
        })
    }

    fn next_fan(&mut self) {
        self.idx = (self.idx + 1) % self.anchors.len();
        self.current = self.anchors[self.idx];
        self.on_boundary = false;
    }

    /// Rotate to the next outgoing arc. With `stop_at_boundary`, the incoming
    /// boundary arc that closes each fan is visited as an extra position.
    fn step(&mut self, stop_at_boundary: bool) {
        if self.on_boundary {
            self.next_fan();
            return;
        }
        let prev = self.mesh.prev(self.current);
        match self.mesh.twin(prev) {
            Some(t) => self.current = t,
            None if stop_at_boundary => {
                self.current = prev;
                self.on_boundary = true;
            }
            None => self.next_fan(),
        }
    }

    fn reset(&mut self) {
        self.idx = self.anchors.len() - 1;
        self.current = self.start;
        self.on_boundary = false;
    }
}

/// Circulates over the vertices adjacent to a vertex.
///
/// Along a boundary fan with `k` polygons this yields `k + 1` neighbours.
#[derive(Debug, Clone)]
pub struct VertexVertexCirculator<'a, I: MeshIndex = u32> {
    walk: VertexWalk<'a, I>,
}

impl<'a, I: MeshIndex> VertexVertexCirculator<'a, I> {
    /// Create a circulator around `v`.
    ///
    /// Fails with [`MeshError::IsolatedVertex`] if `v` belongs to no polygon.
    pub fn new(mesh: &'a PolygonalMesh<I>, v: VertexId<I>) -> Result<Self> {
        Ok(Self {
            walk: VertexWalk::new(mesh, v)?,
        })
    }
}

impl<I: MeshIndex> Circulator for VertexVertexCirculator<'_, I> {
    type Index = I;
    type Item = VertexId<I>;

    fn current(&self) -> VertexId<I> {
        let w = &self.walk;
        if w.on_boundary {
            w.mesh.origin(w.current)
        } else {
            w.mesh.dest(w.current)
        }
    }

    fn advance(&mut self) {
        self.walk.step(true);
    }

    fn position(&self) -> HalfEdgeId<I> {
        self.walk.current
    }

    fn at_start(&self) -> bool {
        self.walk.current == self.walk.start
    }

    fn reset(&mut self) {
        self.walk.reset();
    }
}

/// Circulates over the half-edges around a vertex.
///
/// Yields the outgoing arcs; at the end of a boundary fan the incoming boundary
/// arc is yielded as well, so every edge touching the vertex shows up once.
#[derive(Debug, Clone)]
pub struct VertexHalfEdgeCirculator<'a, I: MeshIndex = u32> {
    walk: VertexWalk<'a, I>,
}

impl<'a, I: MeshIndex> VertexHalfEdgeCirculator<'a, I> {
    /// Create a circulator around `v`.
    ///
    /// Fails with [`MeshError::IsolatedVertex`] if `v` belongs to no polygon.
    pub fn new(mesh: &'a PolygonalMesh<I>, v: VertexId<I>) -> Result<Self> {
        Ok(Self {
            walk: VertexWalk::new(mesh, v)?,
        })
    }
}

impl<I: MeshIndex> Circulator for VertexHalfEdgeCirculator<'_, I> {
    type Index = I;
    type Item = HalfEdgeId<I>;

    fn current(&self) -> HalfEdgeId<I> {
        self.walk.current
    }

    fn advance(&mut self) {
        self.walk.step(true);
    }

    fn position(&self) -> HalfEdgeId<I> {
        self.walk.current
    }

    fn at_start(&self) -> bool {
        self.walk.current == self.walk.start
    }

    fn reset(&mut self) {
        self.walk.reset();
    }
}

/// Circulates over the polygons around a vertex.
#[derive(Debug, Clone)]
pub struct VertexPolygonCirculator<'a, I: MeshIndex = u32> {
    walk: VertexWalk<'a, I>,
}

impl<'a, I: MeshIndex> VertexPolygonCirculator<'a, I> {
    /// Create a circulator around `v`.
    ///
    /// Fails with [`MeshError::IsolatedVertex`] if `v` belongs to no polygon.
    pub fn new(mesh: &'a PolygonalMesh<I>, v: VertexId<I>) -> Result<Self> {
        Ok(Self {
            walk: VertexWalk::new(mesh, v)?,
        })
    }
}

impl<I: MeshIndex> Circulator for VertexPolygonCirculator<'_, I> {
    type Index = I;
    type Item = PolygonId<I>;

    fn current(&self) -> PolygonId<I> {
        self.walk.mesh.left_polygon(self.walk.current)
    }

    fn advance(&mut self) {
        self.walk.step(false);
    }

    fn position(&self) -> HalfEdgeId<I> {
        self.walk.current
    }

    fn at_start(&self) -> bool {
        self.walk.current == self.walk.start
    }

    fn reset(&mut self) {
        self.walk.reset();
    }
}

// ==================== Polygon pivot ====================

/// Circulates over the vertices of a polygon, in winding order.
#[derive(Debug, Clone)]
pub struct PolygonVertexCirculator<'a, I: MeshIndex = u32> {
    mesh: &'a PolygonalMesh<I>,
    current: HalfEdgeId<I>,
    start: HalfEdgeId<I>,
}

impl<'a, I: MeshIndex> PolygonVertexCirculator<'a, I> {
    /// Create a circulator around `p`, starting at its anchor.
    pub fn new(mesh: &'a PolygonalMesh<I>, p: PolygonId<I>) -> Self {
        let start = mesh.polygon(p).halfedge();
        Self {
            mesh,
            current: start,
            start,
        }
    }
}

impl<I: MeshIndex> Circulator for PolygonVertexCirculator<'_, I> {
    type Index = I;
    type Item = VertexId<I>;

    fn current(&self) -> VertexId<I> {
        self.mesh.origin(self.current)
    }

    fn advance(&mut self) {
        self.current = self.mesh.next(self.current);
    }

    fn position(&self) -> HalfEdgeId<I> {
        self.current
    }

    fn at_start(&self) -> bool {
        self.current == self.start
    }

    fn reset(&mut self) {
        self.current = self.start;
    }
}

/// Circulates over the half-edges of a polygon, in winding order.
#[derive(Debug, Clone)]
pub struct PolygonHalfEdgeCirculator<'a, I: MeshIndex = u32> {
    mesh: &'a PolygonalMesh<I>,
    current: HalfEdgeId<I>,
    start: HalfEdgeId<I>,
}

impl<'a, I: MeshIndex> PolygonHalfEdgeCirculator<'a, I> {
    /// Create a circulator around `p`, starting at its anchor.
    pub fn new(mesh: &'a PolygonalMesh<I>, p: PolygonId<I>) -> Self {
        let start = mesh.polygon(p).halfedge();
        Self {
            mesh,
            current: start,
            start,
        }
    }
}

impl<I: MeshIndex> Circulator for PolygonHalfEdgeCirculator<'_, I> {
    type Index = I;
    type Item = HalfEdgeId<I>;

    fn current(&self) -> HalfEdgeId<I> {
        self.current
    }

    fn advance(&mut self) {
        self.current = self.mesh.next(self.current);
    }

    fn position(&self) -> HalfEdgeId<I> {
        self.current
    }

    fn at_start(&self) -> bool {
        self.current == self.start
    }

    fn reset(&mut self) {
        self.current = self.start;
    }
}

/// Circulates over the polygons sharing an edge with a polygon.
///
/// Boundary sides are skipped, so a polygon with `k` interior sides yields `k`
/// neighbours.
#[derive(Debug, Clone)]
pub struct PolygonPolygonCirculator<'a, I: MeshIndex = u32> {
    mesh: &'a PolygonalMesh<I>,
    current: HalfEdgeId<I>,
    start: HalfEdgeId<I>,
}

impl<'a, I: MeshIndex> PolygonPolygonCirculator<'a, I> {
    /// Create a circulator around `p`, starting at its first interior side.
    ///
    /// Fails with [`MeshError::IsolatedPolygon`] if every side of `p` is boundary.
    pub fn new(mesh: &'a PolygonalMesh<I>, p: PolygonId<I>) -> Result<Self> {
        let start = mesh
            .polygon_cycle(p)
            .find(|&he| !mesh.is_boundary_halfedge(he))
            .ok_or(MeshError::IsolatedPolygon { polygon: p.index() })?;
        Ok(Self {
            mesh,
            current: start,
            start,
        })
    }
}

impl<I: MeshIndex> Circulator for PolygonPolygonCirculator<'_, I> {
    type Index = I;
    type Item = PolygonId<I>;

    fn current(&self) -> PolygonId<I> {
        // `current` is never a boundary arc
        match self.mesh.twin(self.current) {
            Some(t) => self.mesh.left_polygon(t),
            None => self.mesh.left_polygon(self.current),
        }
    }

    fn advance(&mut self) {
        self.current = self.mesh.next(self.current);
        while self.mesh.is_boundary_halfedge(self.current) {
            self.current = self.mesh.next(self.current);
        }
    }

    fn position(&self) -> HalfEdgeId<I> {
        self.current
    }

    fn at_start(&self) -> bool {
        self.current == self.start
    }

    fn reset(&mut self) {
        self.current = self.start;
    }
}

macro_rules! impl_circulator_common {
    ($($name:ident),*) => {
        $(
            impl<I: MeshIndex> PartialEq for $name<'_, I> {
                fn eq(&self, other: &Self) -> bool {
                    self.position() == other.position()
                }
            }

            impl<'a, I: MeshIndex> IntoIterator for $name<'a, I> {
                type Item = <Self as Circulator>::Item;
                type IntoIter = CirculatorIter<Self>;

                fn into_iter(self) -> Self::IntoIter {
                    self.iter_loop()
                }
            }
        )*
    };
}

impl_circulator_common!(
    VertexVertexCirculator,
    VertexHalfEdgeCirculator,
    VertexPolygonCirculator,
    PolygonVertexCirculator,
    PolygonHalfEdgeCirculator,
    PolygonPolygonCirculator
);

// ==================== Mesh entry points ====================

impl<I: MeshIndex> PolygonalMesh<I> {
    /// Circulate over the vertices adjacent to `v`.
    pub fn vertex_vertices(&self, v: VertexId<I>) -> Result<VertexVertexCirculator<'_, I>> {
        VertexVertexCirculator::new(self, v)
    }

    /// Circulate over the half-edges around `v`.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> Result<VertexHalfEdgeCirculator<'_, I>> {
        VertexHalfEdgeCirculator::new(self, v)
    }

    /// Circulate over the polygons around `v`.
    pub fn vertex_polygons(&self, v: VertexId<I>) -> Result<VertexPolygonCirculator<'_, I>> {
        VertexPolygonCirculator::new(self, v)
    }

    /// Circulate over the vertices of `p`.
    pub fn polygon_vertices(&self, p: PolygonId<I>) -> PolygonVertexCirculator<'_, I> {
        PolygonVertexCirculator::new(self, p)
    }

    /// Circulate over the half-edges of `p`.
    pub fn polygon_halfedges(&self, p: PolygonId<I>) -> PolygonHalfEdgeCirculator<'_, I> {
        PolygonHalfEdgeCirculator::new(self, p)
    }

    /// Circulate over the neighbours of `p`.
    pub fn polygon_polygons(&self, p: PolygonId<I>) -> Result<PolygonPolygonCirculator<'_, I>> {
        PolygonPolygonCirculator::new(self, p)
    }

    /// The vertices of `p` in winding order, starting at its anchor.
    pub fn polygon_vertex_ids(&self, p: PolygonId<I>) -> Vec<VertexId<I>> {
        self.polygon_vertices(p).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;
    use nalgebra::Point2;
    use std::collections::HashSet;

    /// 3x3 grid of vertices split into 8 triangles; vertex 4 is interior.
    fn grid() -> PolygonalMesh {
        let mut positions = Vec::new();
        for j in 0..3 {
            for i in 0..3 {
                positions.push(Point2::new(i as f64, j as f64));
            }
        }
        let mut tris = Vec::new();
        for j in 0..2 {
            for i in 0..2 {
                let v00 = j * 3 + i;
                let v10 = v00 + 1;
                let v01 = v00 + 3;
                let v11 = v01 + 1;
                tris.push(vec![v00, v10, v11]);
                tris.push(vec![v00, v11, v01]);
            }
        }
        build_from_polygons(&positions, &tris).unwrap()
    }

    fn bowtie() -> PolygonalMesh {
        let mut mesh: PolygonalMesh = PolygonalMesh::new();
        let v0 = mesh.add_vertex(0.0, 0.0).unwrap();
        let v1 = mesh.add_vertex(1.0, 0.0).unwrap();
        let v2 = mesh.add_vertex(1.0, 1.0).unwrap();
        let v3 = mesh.add_vertex(-1.0, 0.0).unwrap();
        let v4 = mesh.add_vertex(-1.0, -1.0).unwrap();
        mesh.add_polygon(&[v0, v1, v2]).unwrap();
        mesh.add_polygon(&[v0, v3, v4]).unwrap();
        mesh
    }

    #[test]
    fn test_polygon_circulators_close_after_sides() {
        let mesh = grid();
        for p in mesh.polygon_ids() {
            let mut circ = mesh.polygon_halfedges(p);
            for _ in 0..mesh.polygon_sides(p) {
                assert_eq!(mesh.left_polygon(circ.current()), p);
                circ.advance();
            }
            assert!(circ.at_start());

            let verts = mesh.polygon_vertex_ids(p);
            assert_eq!(verts.len(), 3);
        }
    }

    #[test]
    fn test_interior_vertex() {
        let mesh = grid();
        let center = VertexId::new(4);

        let neighbours: HashSet<_> = mesh
            .vertex_vertices(center)
            .unwrap()
            .into_iter()
            .map(|v| v.index())
            .collect();
        assert_eq!(neighbours, [0, 1, 3, 5, 7, 8].into_iter().collect());

        assert_eq!(mesh.vertex_halfedges(center).unwrap().into_iter().count(), 6);
        assert_eq!(mesh.vertex_polygons(center).unwrap().into_iter().count(), 6);

        for he in mesh.vertex_halfedges(center).unwrap() {
            assert_eq!(mesh.origin(he), center);
        }
    }

    #[test]
    fn test_boundary_vertex_counts() {
        let mesh = grid();
        // Vertex 1 (bottom middle) touches 3 triangles
        let v = VertexId::new(1);

        let polys: Vec<_> = mesh.vertex_polygons(v).unwrap().into_iter().collect();
        assert_eq!(polys.len(), 3);

        let neighbours: HashSet<_> = mesh
            .vertex_vertices(v)
            .unwrap()
            .into_iter()
            .map(|v| v.index())
            .collect();
        assert_eq!(neighbours, [0, 2, 4, 5].into_iter().collect());

        let halfedges: Vec<_> = mesh.vertex_halfedges(v).unwrap().into_iter().collect();
        assert_eq!(halfedges.len(), 4);
        // Only the last one comes into the vertex
        assert_eq!(mesh.dest(halfedges[3]), v);
        assert!(mesh.is_boundary_halfedge(halfedges[3]));
    }

    #[test]
    fn test_degenerate_vertex_keeps_fans_apart() {
        let mesh = bowtie();
        let v0 = VertexId::new(0);

        let visited: Vec<usize> = mesh
            .vertex_vertices(v0)
            .unwrap()
            .into_iter()
            .map(|v| v.index())
            .collect();
        assert_eq!(visited.len(), 4);

        // Each fan is visited as a contiguous run
        let fan_of = |v: usize| if v == 1 || v == 2 { 0 } else { 1 };
        let switches = visited
            .windows(2)
            .filter(|w| fan_of(w[0]) != fan_of(w[1]))
            .count();
        assert_eq!(switches, 1);
        let all: HashSet<_> = visited.into_iter().collect();
        assert_eq!(all, [1, 2, 3, 4].into_iter().collect());

        let polys: HashSet<_> = mesh.vertex_polygons(v0).unwrap().into_iter().collect();
        assert_eq!(polys.len(), 2);
    }

    #[test]
    fn test_polygon_neighbours() {
        let mesh = grid();
        // Triangle 1 = (0, 4, 3) borders triangle 0 and triangle 4
        let neighbours: HashSet<_> = mesh
            .polygon_polygons(PolygonId::new(1))
            .unwrap()
            .into_iter()
            .map(|p| p.index())
            .collect();
        assert_eq!(neighbours, [0, 4].into_iter().collect());
    }

    #[test]
    fn test_isolated_entities() {
        let mut mesh = bowtie();
        let lonely = mesh.add_vertex(10.0, 10.0).unwrap();
        assert!(matches!(
            mesh.vertex_vertices(lonely),
            Err(MeshError::IsolatedVertex { vertex: 5 })
        ));
        assert!(matches!(
            mesh.polygon_polygons(PolygonId::new(0)),
            Err(MeshError::IsolatedPolygon { polygon: 0 })
        ));
    }

    #[test]
    fn test_equality_and_reset() {
        let mesh = grid();
        let center = VertexId::new(4);
        let a = mesh.vertex_halfedges(center).unwrap();
        let mut b = a.clone();
        assert!(a == b);

        b.advance();
        assert!(a != b);
        assert!(!b.at_start());

        b.reset();
        assert!(a == b);
        assert!(b.at_start());
    }
}

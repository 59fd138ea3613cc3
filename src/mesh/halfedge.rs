//! Half-edge polygonal mesh data structure.
//!
//! This module provides a half-edge representation for 2D polygonal meshes with
//! boundary. Unlike a closed-surface half-edge structure, boundary edges are not
//! closed off with ghost half-edges: a half-edge without a twin *is* the boundary.
//!
//! # Structure
//!
//! - Each polygon owns one **half-edge** per side, linked by **next** into a cycle
//!   running around the polygon (the polygon is on the left of each of them)
//! - Two polygons sharing an edge have mutual **twin** half-edges; a half-edge with
//!   no twin lies on the outer boundary or on a hole
//! - Each vertex stores its outgoing **boundary half-edges**, one per boundary fan;
//!   a vertex surrounded by polygons stores a single arbitrary outgoing half-edge
//! - Each polygon stores one anchor half-edge, preferably an interior one
//!
//! All entities live in arenas owned by [`PolygonalMesh`] and refer to each other by
//! index, so there is no shared ownership and no dangling link. Topology can only be
//! changed through the construction methods in the builder module.

use std::fmt;
use std::mem::size_of;

use nalgebra::{Point2, Vector2};

use super::index::{HalfEdgeId, MeshIndex, PolygonId, VertexId};
use crate::error::{MeshError, Result};

/// A vertex in the polygonal mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 2D position of this vertex.
    pub(super) position: Point2<f64>,

    /// Outgoing boundary half-edges, one per boundary fan. A vertex whose fan is
    /// closed keeps exactly one (interior) outgoing half-edge as anchor.
    pub(super) halfedges: Vec<HalfEdgeId<I>>,
}

impl<I: MeshIndex> Vertex<I> {
    pub(super) fn new(position: Point2<f64>) -> Self {
        Self {
            position,
            halfedges: Vec::new(),
        }
    }

    /// The position of this vertex.
    #[inline]
    pub fn position(&self) -> &Point2<f64> {
        &self.position
    }

    /// The x coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// The y coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// The anchor half-edges leaving this vertex.
    #[inline]
    pub fn anchors(&self) -> &[HalfEdgeId<I>] {
        &self.halfedges
    }

    /// True if the vertex does not belong to any polygon.
    #[inline]
    pub fn is_isolated(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// True if two or more boundary fans meet at this vertex.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.halfedges.len() > 1
    }
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge leaves.
    pub(super) origin: VertexId<I>,

    /// The polygon on the left of this half-edge.
    pub(super) polygon: PolygonId<I>,

    /// The next half-edge around the left polygon.
    pub(super) next: HalfEdgeId<I>,

    /// The oppositely directed half-edge of the neighbouring polygon, if any.
    pub(super) twin: Option<HalfEdgeId<I>>,

    /// Boundary classification tag.
    pub(super) tag: usize,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// The origin vertex.
    #[inline]
    pub fn origin(&self) -> VertexId<I> {
        self.origin
    }

    /// The polygon on the left.
    #[inline]
    pub fn polygon(&self) -> PolygonId<I> {
        self.polygon
    }

    /// The next half-edge around the left polygon.
    #[inline]
    pub fn next(&self) -> HalfEdgeId<I> {
        self.next
    }

    /// The twin half-edge, `None` on the boundary.
    #[inline]
    pub fn twin(&self) -> Option<HalfEdgeId<I>> {
        self.twin
    }

    /// The tag (color) of this half-edge.
    #[inline]
    pub fn tag(&self) -> usize {
        self.tag
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.twin.is_none()
    }
}

/// A polygonal cell of the mesh.
#[derive(Debug, Clone, Copy)]
pub struct Polygon<I: MeshIndex = u32> {
    /// One half-edge on the boundary of this polygon.
    pub(super) halfedge: HalfEdgeId<I>,

    /// Number of sides.
    pub(super) sides: usize,

    /// Region tag.
    pub(super) tag: usize,
}

impl<I: MeshIndex> Polygon<I> {
    /// The anchor half-edge.
    #[inline]
    pub fn halfedge(&self) -> HalfEdgeId<I> {
        self.halfedge
    }

    /// Number of sides (and of vertices).
    #[inline]
    pub fn sides(&self) -> usize {
        self.sides
    }

    /// The tag (color) of this polygon.
    #[inline]
    pub fn tag(&self) -> usize {
        self.tag
    }
}

/// A half-edge mesh of 2D polygons.
///
/// Vertices, half-edges and polygons are stored in insertion order; indices are
/// stable for the whole lifetime of the mesh.
#[derive(Debug, Clone)]
pub struct PolygonalMesh<I: MeshIndex = u32> {
    /// All vertices in the mesh.
    pub(super) vertices: Vec<Vertex<I>>,

    /// All half-edges in the mesh.
    pub(super) halfedges: Vec<HalfEdge<I>>,

    /// All polygons in the mesh.
    pub(super) polygons: Vec<Polygon<I>>,

    /// True while every polygon added so far is a triangle.
    pub(super) triangular: bool,
}

impl<I: MeshIndex> Default for PolygonalMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> PolygonalMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            polygons: Vec::new(),
            triangular: true,
        }
    }

    /// Create a mesh with pre-allocated capacity, assuming mostly triangles.
    pub fn with_capacity(num_vertices: usize, num_polygons: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_polygons * 3),
            polygons: Vec::with_capacity(num_polygons),
            triangular: true,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of polygons.
    #[inline]
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// True if every polygon is a triangle. An empty mesh counts as triangular.
    #[inline]
    pub fn is_triangular(&self) -> bool {
        self.triangular
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a polygon by ID.
    #[inline]
    pub fn polygon(&self, id: PolygonId<I>) -> &Polygon<I> {
        &self.polygons[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point2<f64> {
        &self.vertex(v).position
    }

    /// Move a vertex. Topology is unaffected.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point2<f64>) {
        self.vertices[v.index()].position = pos;
    }

    /// Set the tag of a half-edge.
    #[inline]
    pub fn set_halfedge_tag(&mut self, he: HalfEdgeId<I>, tag: usize) {
        self.halfedges[he.index()].tag = tag;
    }

    /// Set the tag of a polygon.
    #[inline]
    pub fn set_polygon_tag(&mut self, p: PolygonId<I>, tag: usize) {
        self.polygons[p.index()].tag = tag;
    }

    // ==================== Topology Queries ====================

    /// Get the twin half-edge, `None` on the boundary.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> Option<HalfEdgeId<I>> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the left polygon.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the left polygon.
    ///
    /// Half-edges do not store a back link, so this walks the polygon cycle.
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        let mut cur = he;
        loop {
            let next = self.next(cur);
            if next == he {
                return cur;
            }
            cur = next;
        }
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.next(he))
    }

    /// Get the polygon on the left of a half-edge.
    #[inline]
    pub fn left_polygon(&self, he: HalfEdgeId<I>) -> PolygonId<I> {
        self.halfedge(he).polygon
    }

    /// Get the polygon on the right of a half-edge.
    ///
    /// Fails with [`MeshError::BoundaryHasNoRightPolygon`] on the boundary.
    pub fn right_polygon(&self, he: HalfEdgeId<I>) -> Result<PolygonId<I>> {
        self.twin(he)
            .map(|t| self.left_polygon(t))
            .ok_or(MeshError::BoundaryHasNoRightPolygon {
                halfedge: he.index(),
            })
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if a vertex lies on the boundary.
    ///
    /// Isolated vertices are reported as boundary vertices.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        match self.vertex(v).halfedges.first() {
            Some(&he) => self.is_boundary_halfedge(he),
            None => true,
        }
    }

    /// Number of sides of a polygon.
    #[inline]
    pub fn polygon_sides(&self, p: PolygonId<I>) -> usize {
        self.polygon(p).sides
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<I>)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over all boundary half-edge IDs.
    pub fn boundary_halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges()
            .filter(|(_, he)| he.is_boundary())
            .map(|(id, _)| id)
    }

    /// Iterate over all polygon IDs.
    pub fn polygon_ids(&self) -> impl Iterator<Item = PolygonId<I>> + '_ {
        (0..self.polygons.len()).map(PolygonId::new)
    }

    /// Iterate over all polygons with their IDs.
    pub fn polygons(&self) -> impl Iterator<Item = (PolygonId<I>, &Polygon<I>)> + '_ {
        self.polygons
            .iter()
            .enumerate()
            .map(|(i, p)| (PolygonId::new(i), p))
    }

    /// Walk the half-edge cycle of a polygon, starting at its anchor.
    pub(crate) fn polygon_cycle(&self, p: PolygonId<I>) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        let start = self.polygon(p).halfedge;
        let sides = self.polygon(p).sides;
        std::iter::successors(Some(start), move |&he| Some(self.next(he))).take(sides)
    }

    // ==================== Geometry ====================

    /// Length of a half-edge.
    pub fn halfedge_length(&self, he: HalfEdgeId<I>) -> f64 {
        self.halfedge_vector(he).norm()
    }

    /// Vector from origin to destination.
    pub fn halfedge_vector(&self, he: HalfEdgeId<I>) -> Vector2<f64> {
        self.position(self.dest(he)) - self.position(self.origin(he))
    }

    /// Midpoint of a half-edge.
    pub fn halfedge_midpoint(&self, he: HalfEdgeId<I>) -> Point2<f64> {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.dest(he));
        Point2::from((p0.coords + p1.coords) * 0.5)
    }

    /// Unit normal of a half-edge: the tangent rotated clockwise.
    ///
    /// For a counter-clockwise polygon this points out of the left polygon.
    pub fn halfedge_normal(&self, he: HalfEdgeId<I>) -> Vector2<f64> {
        let d = self.halfedge_vector(he);
        Vector2::new(d.y, -d.x) / d.norm()
    }

    /// Unit tangent of a half-edge, from origin to destination.
    pub fn halfedge_tangent(&self, he: HalfEdgeId<I>) -> Vector2<f64> {
        let d = self.halfedge_vector(he);
        d / d.norm()
    }

    /// Signed area of a polygon (shoelace formula).
    ///
    /// Positive for counter-clockwise polygons.
    pub fn polygon_area(&self, p: PolygonId<I>) -> f64 {
        let twice: f64 = self
            .polygon_cycle(p)
            .map(|he| {
                let s = self.position(self.origin(he));
                let e = self.position(self.dest(he));
                s.x * e.y - e.x * s.y
            })
            .sum();
        twice / 2.0
    }

    /// Centroid of a polygon, computed as the plain average of its vertices.
    ///
    /// This matches the area-weighted centroid for triangles and for regular
    /// polygons only; irregular polygons get a biased cell center.
    pub fn polygon_centroid(&self, p: PolygonId<I>) -> Point2<f64> {
        let sides = self.polygon(p).sides as f64;
        let sum = self
            .polygon_cycle(p)
            .fold(Vector2::zeros(), |acc, he| acc + self.position(self.origin(he)).coords);
        Point2::from(sum / sides)
    }

    /// Diameter of a polygon: the largest distance between two of its vertices.
    pub fn polygon_diameter(&self, p: PolygonId<I>) -> f64 {
        let points: Vec<Point2<f64>> = self
            .polygon_cycle(p)
            .map(|he| *self.position(self.origin(he)))
            .collect();

        let mut diam2 = 0.0_f64;
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                diam2 = diam2.max((b - a).norm_squared());
            }
        }
        diam2.sqrt()
    }

    /// Sum of the signed areas of all polygons.
    pub fn total_area(&self) -> f64 {
        self.polygon_ids().map(|p| self.polygon_area(p)).sum()
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = self.vertices.first()?.position;
        let (min, max) = self.vertices.iter().fold((first, first), |(min, max), v| {
            (
                Point2::new(min.x.min(v.position.x), min.y.min(v.position.y)),
                Point2::new(max.x.max(v.position.x), max.y.max(v.position.y)),
            )
        });
        Some((min, max))
    }

    // ==================== Statistics ====================

    /// Summary statistics of the mesh.
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            num_vertices: self.num_vertices(),
            num_halfedges: self.num_halfedges(),
            num_polygons: self.num_polygons(),
            num_boundary_halfedges: self.boundary_halfedge_ids().count(),
            num_degenerate_vertices: self.vertices.iter().filter(|v| v.is_degenerate()).count(),
            is_triangular: self.triangular,
            vertex_bytes: self.vertices.iter().fold(0, |acc, v| {
                acc + size_of::<Vertex<I>>() + v.halfedges.capacity() * size_of::<HalfEdgeId<I>>()
            }),
            halfedge_bytes: self.halfedges.len() * size_of::<HalfEdge<I>>(),
            polygon_bytes: self.polygons.len() * size_of::<Polygon<I>>(),
        }
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        // Vertex anchors leave their vertex; several anchors must all be boundary
        for (vid, v) in self.vertices() {
            for &he in &v.halfedges {
                if he.index() >= self.halfedges.len() || self.origin(he) != vid {
                    return false;
                }
                if v.halfedges.len() > 1 && !self.is_boundary_halfedge(he) {
                    return false;
                }
            }
        }

        // Twin symmetry and geometric consistency
        for (heid, he) in self.halfedges() {
            if let Some(twin) = he.twin {
                let t = self.halfedge(twin);
                if t.twin != Some(heid) || t.origin != self.dest(heid) || he.origin != self.dest(twin)
                {
                    return false;
                }
            }
        }

        // Cycle closure and left-polygon consistency
        for (pid, p) in self.polygons() {
            let mut he = p.halfedge;
            for _ in 0..p.sides {
                if self.left_polygon(he) != pid {
                    return false;
                }
                he = self.next(he);
            }
            if he != p.halfedge {
                return false;
            }
        }

        true
    }
}

/// Summary statistics of a [`PolygonalMesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStats {
    /// Number of vertices.
    pub num_vertices: usize,
    /// Number of half-edges.
    pub num_halfedges: usize,
    /// Number of polygons.
    pub num_polygons: usize,
    /// Number of half-edges without twin.
    pub num_boundary_halfedges: usize,
    /// Number of vertices where several boundary fans meet.
    pub num_degenerate_vertices: usize,
    /// True if every polygon is a triangle.
    pub is_triangular: bool,
    /// Approximate memory used by vertices.
    pub vertex_bytes: usize,
    /// Approximate memory used by half-edges.
    pub halfedge_bytes: usize,
    /// Approximate memory used by polygons.
    pub polygon_bytes: usize,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mesh stats:")?;
        writeln!(f, "  Vertices: {}", self.num_vertices)?;
        writeln!(f, "  Half-edges: {}", self.num_halfedges)?;
        writeln!(f, "  Boundary half-edges: {}", self.num_boundary_halfedges)?;
        writeln!(f, "  Polygons: {}", self.num_polygons)?;
        writeln!(f, "  Degenerate vertices: {}", self.num_degenerate_vertices)?;
        writeln!(f, "  Triangular: {}", if self.is_triangular { "yes" } else { "no" })?;
        writeln!(f, "Memory stats:")?;
        writeln!(f, "  Vertices: {:.2} KiB", self.vertex_bytes as f64 / 1024.0)?;
        writeln!(f, "  Half-edges: {:.2} KiB", self.halfedge_bytes as f64 / 1024.0)?;
        write!(f, "  Polygons: {:.2} KiB", self.polygon_bytes as f64 / 1024.0)
    }
}

//! Mesh construction.
//!
//! Polygons are added one at a time, in any order. Each new polygon is stitched to
//! the polygons already present by matching its half-edges against the boundary
//! half-edges recorded at its vertices; arcs that find no partner stay on the
//! boundary until a later polygon supplies the opposite direction.

use nalgebra::Point2;

use super::halfedge::{HalfEdge, Polygon, PolygonalMesh, Vertex};
use super::index::{HalfEdgeId, MeshIndex, PolygonId, VertexId};
use crate::error::{MeshError, Result};

impl<I: MeshIndex> PolygonalMesh<I> {
    /// Add an isolated vertex to the mesh.
    ///
    /// # Errors
    /// [`MeshError::CapacityExceeded`] if the index type cannot address another vertex.
    pub fn add_vertex(&mut self, x: f64, y: f64) -> Result<VertexId<I>> {
        self.add_vertex_at(Point2::new(x, y))
    }

    /// Add an isolated vertex at the given position.
    pub fn add_vertex_at(&mut self, position: Point2<f64>) -> Result<VertexId<I>> {
        ensure_capacity::<I>("vertices", self.vertices.len())?;
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        Ok(id)
    }

    /// Add a polygon bounded by the given vertices.
    ///
    /// The vertices must be listed in a consistent winding order (counter-clockwise
    /// for positive areas and outward normals). Shared edges with existing polygons
    /// are detected and their half-edges linked as twins.
    ///
    /// The input is validated before the mesh is touched, so a failed call leaves
    /// the mesh unchanged.
    ///
    /// # Errors
    /// - [`MeshError::DegeneratePolygon`] for fewer than three vertices
    /// - [`MeshError::IndexOutOfRange`] if a vertex does not exist
    /// - [`MeshError::RepeatedVertex`] if a vertex is listed twice
    /// - [`MeshError::DuplicateDirectedEdge`] if another polygon already owns one
    ///   of the directed edges
    /// - [`MeshError::CapacityExceeded`] if the index type cannot address the new
    ///   polygon or its half-edges
    ///
    /// # Example
    /// ```
    /// use conslaw2d::mesh::PolygonalMesh;
    ///
    /// let mut mesh: PolygonalMesh = PolygonalMesh::new();
    /// let a = mesh.add_vertex(0.0, 0.0).unwrap();
    /// let b = mesh.add_vertex(1.0, 0.0).unwrap();
    /// let c = mesh.add_vertex(1.0, 1.0).unwrap();
    /// let d = mesh.add_vertex(0.0, 1.0).unwrap();
    ///
    /// mesh.add_polygon(&[a, b, c]).unwrap();
    /// mesh.add_polygon(&[a, c, d]).unwrap();
    ///
    /// let boundary = mesh.halfedge_ids().filter(|&he| mesh.is_boundary_halfedge(he)).count();
    /// assert_eq!(boundary, 4);
    /// ```
    pub fn add_polygon(&mut self, vertices: &[VertexId<I>]) -> Result<PolygonId<I>> {
        self.validate_polygon(vertices)?;

        let n = vertices.len();
        let base = self.halfedges.len();
        let pid = PolygonId::new(self.polygons.len());

        // New half-edge i runs vertices[i] -> vertices[i + 1]
        for (i, &v) in vertices.iter().enumerate() {
            self.halfedges.push(HalfEdge {
                origin: v,
                polygon: pid,
                next: HalfEdgeId::new(base + (i + 1) % n),
                twin: None,
                tag: 0,
            });
        }
        self.polygons.push(Polygon {
            halfedge: HalfEdgeId::new(base),
            sides: n,
            tag: 0,
        });

        // Stitch against boundary arcs running the other way
        for i in 0..n {
            let he = HalfEdgeId::new(base + i);
            let from = vertices[i];
            let to = vertices[(i + 1) % n];

            if let Some(opposite) = self.boundary_arc(to, from) {
                self.halfedges[he.index()].twin = Some(opposite);
                self.halfedges[opposite.index()].twin = Some(he);

                // Anchors prefer interior arcs
                let other = self.halfedges[opposite.index()].polygon;
                self.polygons[pid.index()].halfedge = he;
                self.polygons[other.index()].halfedge = opposite;
            }
        }

        for (i, &v) in vertices.iter().enumerate() {
            self.vertices[v.index()].halfedges.push(HalfEdgeId::new(base + i));
        }

        for (i, &v) in vertices.iter().enumerate() {
            self.prune_anchors(v, HalfEdgeId::new(base + i));
        }

        self.triangular &= n == 3;
        Ok(pid)
    }

    /// Find a half-edge between two vertices, in either direction.
    ///
    /// Searches the half-edges around `v1` for one whose origin or destination is
    /// `v2`.
    pub fn find_halfedge(&self, v1: VertexId<I>, v2: VertexId<I>) -> Option<HalfEdgeId<I>> {
        if self.vertex(v1).is_isolated() {
            return None;
        }
        self.vertex_halfedges(v1)
            .ok()?
            .into_iter()
            .find(|&he| self.origin(he) == v2 || self.dest(he) == v2)
    }

    /// Find the half-edge running `from -> to`, if any polygon owns it.
    pub fn find_directed_halfedge(
        &self,
        from: VertexId<I>,
        to: VertexId<I>,
    ) -> Option<HalfEdgeId<I>> {
        // Every fan at `from` is reachable from one of its anchors
        for &anchor in &self.vertex(from).halfedges {
            let mut he = anchor;
            loop {
                if self.dest(he) == to {
                    return Some(he);
                }
                match self.twin(self.prev(he)) {
                    Some(t) if t != anchor => he = t,
                    _ => break,
                }
            }
        }
        None
    }

    /// Check a vertex list before any mutation happens.
    fn validate_polygon(&self, vertices: &[VertexId<I>]) -> Result<()> {
        let n = vertices.len();
        if n < 3 {
            return Err(MeshError::DegeneratePolygon { sides: n });
        }
        ensure_capacity::<I>("polygons", self.polygons.len())?;
        ensure_capacity::<I>("half-edges", self.halfedges.len() + n - 1)?;

        for &v in vertices {
            if v.index() >= self.vertices.len() {
                return Err(MeshError::IndexOutOfRange {
                    polygon: self.polygons.len(),
                    vertex: v.index(),
                    len: self.vertices.len(),
                });
            }
        }

        for (i, &v) in vertices.iter().enumerate() {
            if vertices[i + 1..].contains(&v) {
                return Err(MeshError::RepeatedVertex { vertex: v.index() });
            }
        }

        for i in 0..n {
            let from = vertices[i];
            let to = vertices[(i + 1) % n];
            if self.find_directed_halfedge(from, to).is_some() {
                return Err(MeshError::DuplicateDirectedEdge {
                    from: from.index(),
                    to: to.index(),
                });
            }
        }

        Ok(())
    }

    /// Look up a boundary arc `from -> to` in the anchor list of `from`.
    fn boundary_arc(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex(from)
            .halfedges
            .iter()
            .copied()
            .find(|&he| self.is_boundary_halfedge(he) && self.dest(he) == to)
    }

    /// Drop anchors that are no longer boundary, keeping `fallback` if none are.
    fn prune_anchors(&mut self, v: VertexId<I>, fallback: HalfEdgeId<I>) {
        let mut anchors = std::mem::take(&mut self.vertices[v.index()].halfedges);
        anchors.retain(|&he| self.halfedges[he.index()].twin.is_none());
        if anchors.is_empty() {
            anchors.push(fallback);
        }
        if anchors.len() > 1 {
            log::debug!("vertex {} is degenerate: {} boundary fans", v, anchors.len());
        }
        self.vertices[v.index()].halfedges = anchors;
    }
}

/// Fail unless `index` can be stored in `I`.
fn ensure_capacity<I: MeshIndex>(entity: &'static str, index: usize) -> Result<()> {
    if I::fits(index) {
        Ok(())
    } else {
        Err(MeshError::CapacityExceeded {
            entity,
            max: I::MAX.to_usize().saturating_add(1),
        })
    }
}

/// Build a polygonal mesh from positions and polygon vertex lists.
///
/// # Arguments
/// * `positions` - List of vertex positions
/// * `polygons` - List of polygons, each as a list of vertex indices
///
/// # Example
/// ```
/// use conslaw2d::mesh::{build_from_polygons, PolygonalMesh};
/// use nalgebra::Point2;
///
/// let positions = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
/// ];
/// let mesh: PolygonalMesh = build_from_polygons(&positions, &[vec![0usize, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_polygons(), 1);
/// assert!(mesh.is_triangular());
/// ```
pub fn build_from_polygons<I: MeshIndex, P: AsRef<[usize]>>(
    positions: &[Point2<f64>],
    polygons: &[P],
) -> Result<PolygonalMesh<I>> {
    let mut mesh = PolygonalMesh::with_capacity(positions.len(), polygons.len());
    for &pos in positions {
        mesh.add_vertex_at(pos)?;
    }

    let mut ids: Vec<VertexId<I>> = Vec::new();
    for (pi, polygon) in polygons.iter().enumerate() {
        ids.clear();
        for &vi in polygon.as_ref() {
            if vi >= positions.len() {
                return Err(MeshError::IndexOutOfRange {
                    polygon: pi,
                    vertex: vi,
                    len: positions.len(),
                });
            }
            ids.push(VertexId::new(vi));
        }
        mesh.add_polygon(&ids)?;
    }

    Ok(mesh)
}

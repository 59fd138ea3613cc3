//! # conslaw2d
//!
//! Finite-volume solvers for 2D hyperbolic conservation laws on unstructured
//! polygonal meshes.
//!
//! The crate is built around a half-edge mesh that accepts polygons with any
//! number of sides, stitches shared edges as polygons are added and supports
//! vertices where several boundary fans meet. On top of it sit a set of
//! physical models, numerical fluxes and a first-order explicit solver.
//!
//! ## Features
//!
//! - **Polygonal half-edge mesh**: arena storage with type-safe indices
//! - **Circulators**: vertex and polygon neighbourhoods, fan by fan at degenerate vertices
//! - **Text mesh format**: reader and writer for `.msh` files with boundary tags
//! - **Models**: linear acoustics, Euler equations, shallow water
//! - **Fluxes**: Lax-Friedrichs, Godunov, Rusanov, HLL, HLLC, Roe
//!
//! ## Quick Start
//!
//! ```no_run
//! use conslaw2d::prelude::*;
//!
//! let mesh: PolygonalMesh = conslaw2d::io::load("channel.msh").unwrap();
//! println!("{}", mesh.stats());
//!
//! for p in mesh.polygon_ids() {
//!     println!("{:?}: area={}", p, mesh.polygon_area(p));
//! }
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use conslaw2d::prelude::*;
//!
//! let mut mesh: PolygonalMesh = PolygonalMesh::new();
//! let a = mesh.add_vertex(0.0, 0.0).unwrap();
//! let b = mesh.add_vertex(1.0, 0.0).unwrap();
//! let c = mesh.add_vertex(1.0, 1.0).unwrap();
//! let d = mesh.add_vertex(0.0, 1.0).unwrap();
//!
//! mesh.add_polygon(&[a, b, c]).unwrap();
//! mesh.add_polygon(&[a, c, d]).unwrap();
//!
//! assert_eq!(mesh.num_halfedges(), 6);
//! assert!(mesh.find_halfedge(a, c).is_some());
//! assert!(mesh.is_triangular());
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use conslaw2d::prelude::*;
//! # let mut mesh: PolygonalMesh = PolygonalMesh::new();
//! # let a = mesh.add_vertex(0.0, 0.0).unwrap();
//! # let b = mesh.add_vertex(1.0, 0.0).unwrap();
//! # let c = mesh.add_vertex(1.0, 1.0).unwrap();
//! # let d = mesh.add_vertex(0.0, 1.0).unwrap();
//! # mesh.add_polygon(&[a, b, c]).unwrap();
//! # mesh.add_polygon(&[a, c, d]).unwrap();
//! // Neighbours of a vertex, as an iterator
//! let neighbours: Vec<_> = mesh.vertex_vertices(a).unwrap().into_iter().collect();
//! assert_eq!(neighbours.len(), 3);
//!
//! // Or stepped by hand
//! let mut circ = mesh.polygon_vertices(PolygonId::new(0));
//! loop {
//!     println!("{:?}", circ.current());
//!     circ.advance();
//!     if circ.at_start() {
//!         break;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod flux;
pub mod io;
pub mod mesh;
pub mod model;
pub mod solver;

/// Prelude module for convenient imports.
///
/// ```
/// use conslaw2d::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::flux::NumericalFlux;
    pub use crate::mesh::{
        build_from_polygons, Circulator, HalfEdge, HalfEdgeId, MeshIndex, Polygon, PolygonId,
        PolygonalMesh, Vertex, VertexId,
    };
    pub use crate::model::{ConservationLaw, StateVector};
    pub use crate::solver::{BoundaryContext, FiniteVolume, FrameFormat, SolverOptions};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

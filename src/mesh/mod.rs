//! Core mesh data structures.
//!
//! This module provides the half-edge representation of 2D polygonal meshes with
//! boundary, their incremental construction and the circulators used to traverse
//! them.
//!
//! # Overview
//!
//! The primary type is [`PolygonalMesh`]. Polygons may have any number of sides and
//! can be added in any order; shared edges are stitched as they appear. Vertices where
//! several boundary fans meet (degenerate vertices) are supported and traversed fan by
//! fan.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`PolygonId`] - Identifies a polygon
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Meshes are typically read from a file (see [`crate::io`]) or built from
//! polygon-vertex lists:
//!
//! ```
//! use conslaw2d::mesh::{build_from_polygons, PolygonalMesh};
//! use nalgebra::Point2;
//!
//! let positions = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! let polygons = vec![vec![0usize, 1, 2, 3]];
//!
//! let mesh: PolygonalMesh = build_from_polygons(&positions, &polygons).unwrap();
//! assert_eq!(mesh.polygon_sides(conslaw2d::mesh::PolygonId::new(0)), 4);
//! ```

mod builder;
mod circulator;
mod halfedge;
mod index;

pub use builder::build_from_polygons;
pub use circulator::{
    Circulator, CirculatorIter, PolygonHalfEdgeCirculator, PolygonPolygonCirculator,
    PolygonVertexCirculator, VertexHalfEdgeCirculator, VertexPolygonCirculator,
    VertexVertexCirculator,
};
pub use halfedge::{HalfEdge, MeshStats, Polygon, PolygonalMesh, Vertex};
pub use index::{HalfEdgeId, MeshIndex, PolygonId, VertexId};

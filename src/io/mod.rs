//! Mesh file I/O.
//!
//! Meshes are stored in a sectioned plain-text format (see [`msh`]) listing the
//! vertices, the polygons with their tags and the tagged boundary edges.
//!
//! # Usage
//!
//! ```no_run
//! use conslaw2d::io::{load, load_with, save, ReaderOptions};
//! use conslaw2d::mesh::PolygonalMesh;
//!
//! // Unmatched boundary edges are logged and skipped
//! let mesh: PolygonalMesh = load("channel.msh").unwrap();
//!
//! // ... or rejected
//! let options = ReaderOptions::new().with_strict_boundary_edges(true);
//! let mesh: PolygonalMesh = load_with("channel.msh", &options).unwrap();
//!
//! save(&mesh, "copy.msh").unwrap();
//! ```

pub mod msh;

use std::path::Path;

use crate::error::Result;
use crate::mesh::{MeshIndex, PolygonalMesh};

pub use msh::ReaderOptions;

/// Load a mesh from a file with default options.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolygonalMesh<I>> {
    load_with(path, &ReaderOptions::default())
}

/// Load a mesh from a file.
pub fn load_with<P: AsRef<Path>, I: MeshIndex>(
    path: P,
    options: &ReaderOptions,
) -> Result<PolygonalMesh<I>> {
    let path = path.as_ref();
    log::debug!("loading mesh from {}", path.display());
    msh::read(path, options)
}

/// Save a mesh to a file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolygonalMesh<I>, path: P) -> Result<()> {
    msh::write(mesh, path)
}

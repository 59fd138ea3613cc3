//! Error types for conslaw2d.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building, reading, traversing or solving on a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A polygon references a vertex index that does not exist.
    #[error("polygon {polygon} references vertex index {vertex}, but the mesh has {len} vertices")]
    IndexOutOfRange {
        /// The index of the polygon being built.
        polygon: usize,
        /// The invalid vertex index.
        vertex: usize,
        /// Number of vertices available.
        len: usize,
    },

    /// The same directed edge was claimed by two polygons.
    #[error("directed edge ({from} -> {to}) is already owned by another polygon")]
    DuplicateDirectedEdge {
        /// Origin vertex index.
        from: usize,
        /// Destination vertex index.
        to: usize,
    },

    /// A declared boundary edge has no matching half-edge in the built topology.
    #[error("boundary edge ({from}, {to}) does not match any half-edge")]
    UnmatchedBoundaryEdge {
        /// First vertex index.
        from: usize,
        /// Second vertex index.
        to: usize,
    },

    /// A polygon needs at least three vertices.
    #[error("polygon has {sides} vertices, at least 3 are required")]
    DegeneratePolygon {
        /// Number of vertices supplied.
        sides: usize,
    },

    /// A polygon lists the same vertex more than once.
    #[error("vertex {vertex} appears more than once in the same polygon")]
    RepeatedVertex {
        /// The repeated vertex index.
        vertex: usize,
    },

    /// The mesh index type cannot address another element.
    #[error("too many {entity} for the mesh index type (at most {max})")]
    CapacityExceeded {
        /// The kind of element being added.
        entity: &'static str,
        /// Largest element count the index type can address.
        max: usize,
    },

    /// The right polygon of a boundary half-edge was requested.
    #[error("half-edge {halfedge} is on the boundary and has no right polygon")]
    BoundaryHasNoRightPolygon {
        /// The boundary half-edge index.
        halfedge: usize,
    },

    /// A circulator was requested around a vertex that belongs to no polygon.
    #[error("vertex {vertex} is not incident to any polygon")]
    IsolatedVertex {
        /// The isolated vertex index.
        vertex: usize,
    },

    /// A neighbour circulator was requested around a polygon with no interior edge.
    #[error("polygon {polygon} has no neighbouring polygon")]
    IsolatedPolygon {
        /// The isolated polygon index.
        polygon: usize,
    },

    /// A required section marker is missing from a mesh file.
    #[error("missing section '{section}' in mesh file")]
    MissingSection {
        /// The marker that was expected.
        section: &'static str,
    },

    /// Malformed content in a mesh file.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The solver produced a non-physical state.
    #[error("inconsistent state in polygon {polygon} at t = {time} (CFL number may be too high)")]
    InconsistentState {
        /// The polygon holding the bad state.
        polygon: usize,
        /// Simulation time at which it was detected.
        time: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a parse error for the given one-based line.
    pub(crate) fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        MeshError::Parse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = MeshError::DuplicateDirectedEdge { from: 1, to: 2 };
        assert_eq!(
            e.to_string(),
            "directed edge (1 -> 2) is already owned by another polygon"
        );

        let e = MeshError::CapacityExceeded { entity: "vertices", max: 65_536 };
        assert_eq!(
            e.to_string(),
            "too many vertices for the mesh index type (at most 65536)"
        );

        let e = MeshError::MissingSection { section: "# POINTS" };
        assert_eq!(e.to_string(), "missing section '# POINTS' in mesh file");
    }

    #[test]
    fn test_invalid_param() {
        let e = MeshError::invalid_param("cfl", 1.5, "must be in (0, 1]");
        assert!(matches!(e, MeshError::InvalidParameter { name: "cfl", .. }));
        assert!(e.to_string().contains("1.5"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let e: MeshError = io.into();
        assert!(matches!(e, MeshError::Io(_)));
    }
}

//! Explicit finite-volume solver.
//!
//! The solver advances cell averages of a [`ConservationLaw`] on a
//! [`PolygonalMesh`] with the first-order scheme
//!
//! ```text
//! q_p(t + dt) = q_p(t) + dt / |p| · (S_p - Σ_e |e| F(q_p, q_e, n_e))
//! ```
//!
//! where the sum runs over the sides of polygon `p`, `q_e` is the state across side
//! `e` (the neighbour polygon, or a ghost state from the boundary condition) and `F`
//! is a [`NumericalFlux`]. The time step follows from the CFL condition on each cell.
//!
//! # Example
//!
//! ```
//! use conslaw2d::flux::LaxFriedrichs;
//! use conslaw2d::mesh::{build_from_polygons, PolygonalMesh};
//! use conslaw2d::model::ShallowWater;
//! use conslaw2d::solver::{FiniteVolume, SolverOptions};
//! use nalgebra::{Point2, Vector3};
//!
//! let positions = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! let mesh: PolygonalMesh = build_from_polygons(&positions, &[[0usize, 1, 2], [0, 2, 3]]).unwrap();
//!
//! let mut solver = FiniteVolume::new(ShallowWater::default(), LaxFriedrichs, &mesh, |_, _, _| {
//!     Vector3::new(1.0, 0.0, 0.0)
//! })
//! .with_options(SolverOptions::default().with_cfl(0.4))
//! .unwrap();
//!
//! solver.init();
//! solver.timestep().unwrap();
//! assert!(solver.time() > 0.0);
//! ```
//!
//! [`ConservationLaw`]: crate::model::ConservationLaw
//! [`NumericalFlux`]: crate::flux::NumericalFlux
//! [`PolygonalMesh`]: crate::mesh::PolygonalMesh

mod finite_volume;
mod frame;

use nalgebra::{Point2, Vector2};

use crate::error::{MeshError, Result};
use crate::model::StateVector;

pub use finite_volume::FiniteVolume;
pub use frame::FrameFormat;

/// Options for the finite-volume solver.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// Courant number, in `(0, 1]`.
    pub cfl: f64,

    /// Whether to evaluate cell updates in parallel (default: true).
    pub parallel: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            cfl: 0.1,
            parallel: true,
        }
    }
}

impl SolverOptions {
    /// Set the Courant number.
    pub fn with_cfl(mut self, cfl: f64) -> Self {
        self.cfl = cfl;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that the options are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(MeshError::invalid_param("cfl", self.cfl, "must be in (0, 1]"));
        }
        Ok(())
    }
}

/// What a boundary condition knows about the boundary side it is applied to.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryContext {
    /// Tag of the boundary half-edge.
    pub tag: usize,
    /// Midpoint of the side.
    pub midpoint: Point2<f64>,
    /// Outward unit normal.
    pub normal: Vector2<f64>,
    /// Current simulation time.
    pub time: f64,
}

/// Boundary condition that copies the inner state: waves leave the domain freely.
pub fn transparent<S: StateVector>(_ctx: &BoundaryContext, w: &S) -> S {
    *w
}

/// Boundary condition for a solid wall.
///
/// Mirrors the velocity, held in components 1 and 2 of the primitive state,
/// across the side; every other component is copied.
pub fn reflective<S: StateVector>(ctx: &BoundaryContext, w: &S) -> S {
    let (nx, ny) = (ctx.normal.x, ctx.normal.y);
    let mut wr = *w;
    wr[1] = (ny * ny - nx * nx) * w[1] - 2.0 * nx * ny * w[2];
    wr[2] = -2.0 * nx * ny * w[1] + (nx * nx - ny * ny) * w[2];
    wr
}

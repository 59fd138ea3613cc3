//! First-order explicit finite-volume scheme.

use nalgebra::{Point2, Vector2};
use rayon::prelude::*;

use super::{transparent, BoundaryContext, SolverOptions};
use crate::error::{MeshError, Result};
use crate::flux::NumericalFlux;
use crate::mesh::{MeshIndex, PolygonId, PolygonalMesh};
use crate::model::{ConservationLaw, StateVector};

type InitialCondition<S> = Box<dyn Fn(usize, f64, f64) -> S + Send + Sync>;
type BoundaryCondition<S> = Box<dyn Fn(&BoundaryContext, &S) -> S + Send + Sync>;
type SourceTerm<S> = Box<dyn Fn(&S, usize, f64, f64, f64) -> S + Send + Sync>;

/// Cached geometry of a polygon.
#[derive(Debug, Clone, Copy)]
pub(super) struct CellGeometry {
    pub(super) area: f64,
    pub(super) diameter: f64,
    pub(super) centroid: Point2<f64>,
}

/// Cached geometry of a half-edge.
#[derive(Debug, Clone, Copy)]
struct SideGeometry {
    length: f64,
    midpoint: Point2<f64>,
    normal: Vector2<f64>,
}

/// Explicit finite-volume solver for a conservation law on a polygonal mesh.
///
/// The solver borrows the mesh and keeps one state per polygon, indexed like the
/// polygons. Conditions are given as closures:
///
/// - the initial condition maps `(polygon tag, x, y)` at each centroid to a
///   **primitive** state;
/// - the boundary condition maps a [`BoundaryContext`] and the primitive state
///   inside the domain to the primitive ghost state outside (default: transparent);
/// - the optional source term maps `(q, polygon tag, x, y, t)` to a conservative
///   source per unit area, sampled at the centroid.
pub struct FiniteVolume<'m, M, F, I = u32>
where
    M: ConservationLaw,
    F: NumericalFlux<M>,
    I: MeshIndex,
{
    pub(super) model: M,
    flux: F,
    pub(super) mesh: &'m PolygonalMesh<I>,
    options: SolverOptions,
    initial: InitialCondition<M::State>,
    boundary: BoundaryCondition<M::State>,
    source: Option<SourceTerm<M::State>>,
    pub(super) cells: Vec<CellGeometry>,
    sides: Vec<SideGeometry>,
    pub(super) sol: Vec<M::State>,
    sol0: Vec<M::State>,
    time: f64,
    dt: f64,
    h_max: f64,
}

impl<'m, M, F, I> FiniteVolume<'m, M, F, I>
where
    M: ConservationLaw,
    F: NumericalFlux<M>,
    I: MeshIndex,
{
    /// Create a solver with transparent boundaries and default options.
    pub fn new<IC>(model: M, flux: F, mesh: &'m PolygonalMesh<I>, initial: IC) -> Self
    where
        IC: Fn(usize, f64, f64) -> M::State + Send + Sync + 'static,
    {
        let cells = mesh
            .polygon_ids()
            .map(|p| CellGeometry {
                area: mesh.polygon_area(p),
                diameter: mesh.polygon_diameter(p),
                centroid: mesh.polygon_centroid(p),
            })
            .collect();
        let sides = mesh
            .halfedge_ids()
            .map(|he| SideGeometry {
                length: mesh.halfedge_length(he),
                midpoint: mesh.halfedge_midpoint(he),
                normal: mesh.halfedge_normal(he),
            })
            .collect();

        let n = mesh.num_polygons();
        Self {
            model,
            flux,
            mesh,
            options: SolverOptions::default(),
            initial: Box::new(initial),
            boundary: Box::new(transparent::<M::State>),
            source: None,
            cells,
            sides,
            sol: vec![M::State::zeros(); n],
            sol0: vec![M::State::zeros(); n],
            time: 0.0,
            dt: 0.0,
            h_max: 0.0,
        }
    }

    /// Set the solver options.
    ///
    /// Fails with [`MeshError::InvalidParameter`] if the CFL number is out of range.
    pub fn with_options(mut self, options: SolverOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Set the boundary condition.
    pub fn with_boundary_condition<BC>(mut self, boundary: BC) -> Self
    where
        BC: Fn(&BoundaryContext, &M::State) -> M::State + Send + Sync + 'static,
    {
        self.boundary = Box::new(boundary);
        self
    }

    /// Set the source term.
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: Fn(&M::State, usize, f64, f64, f64) -> M::State + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ==================== Accessors ====================

    /// The physical model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The mesh.
    pub fn mesh(&self) -> &'m PolygonalMesh<I> {
        self.mesh
    }

    /// The solver options.
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Last time step taken.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Largest polygon diameter.
    pub fn h_max(&self) -> f64 {
        self.h_max
    }

    /// Conservative states, one per polygon.
    pub fn solution(&self) -> &[M::State] {
        &self.sol
    }

    /// Conservative state of a polygon.
    pub fn state(&self, p: PolygonId<I>) -> &M::State {
        &self.sol[p.index()]
    }

    /// Primitive state of a polygon.
    pub fn primitive(&self, p: PolygonId<I>) -> M::State {
        self.model.conservative_to_primitive(&self.sol[p.index()])
    }

    /// Integral of the conservative variables over the mesh.
    pub fn integral(&self) -> M::State {
        self.sol
            .iter()
            .zip(&self.cells)
            .fold(M::State::zeros(), |acc, (q, cell)| acc + *q * cell.area)
    }

    // ==================== Time stepping ====================

    /// Evaluate the initial condition and reset the clock.
    pub fn init(&mut self) {
        self.h_max = self.cells.iter().map(|c| c.diameter).fold(0.0, f64::max);

        for (i, cell) in self.cells.iter().enumerate() {
            let tag = self.mesh.polygon(PolygonId::new(i)).tag();
            let w = (self.initial)(tag, cell.centroid.x, cell.centroid.y);
            self.sol[i] = self.model.primitive_to_conservative(&w);
        }
        self.sol0.copy_from_slice(&self.sol);
        self.time = 0.0;
        self.dt = 0.0;

        log::info!(
            "finite volume solver ready: {} cells, h_max = {:.6}, cfl = {}",
            self.cells.len(),
            self.h_max,
            self.options.cfl
        );
    }

    /// Advance the solution by one step and return the step size.
    ///
    /// Fails with [`MeshError::InconsistentState`] if a cell holds a non-physical
    /// state, typically because the CFL number is too high.
    pub fn timestep(&mut self) -> Result<f64> {
        self.sol0.copy_from_slice(&self.sol);
        if let Some(i) = self.sol0.iter().position(|q| !self.model.is_consistent(q)) {
            return Err(MeshError::InconsistentState {
                polygon: i,
                time: self.time,
            });
        }

        let dt = self.stable_dt()?;

        let n = self.cells.len();
        let rhs: Vec<M::State> = if self.options.parallel {
            (0..n)
                .into_par_iter()
                .map(|i| self.rhs(PolygonId::new(i)))
                .collect()
        } else {
            (0..n).map(|i| self.rhs(PolygonId::new(i))).collect()
        };

        for (q, (q0, r)) in self.sol.iter_mut().zip(self.sol0.iter().zip(&rhs)) {
            *q = *q0 + *r * dt;
        }

        self.dt = dt;
        self.time += dt;
        log::debug!("t = {:.6e}, dt = {:.6e}", self.time, dt);
        Ok(dt)
    }

    /// Largest step allowed by the CFL condition on every cell.
    fn stable_dt(&self) -> Result<f64> {
        let cfl = self.options.cfl;
        let dt = self
            .sol0
            .iter()
            .zip(&self.cells)
            .map(|(q, cell)| cfl * cell.diameter / self.model.max_lambda(q))
            .fold(f64::INFINITY, f64::min);

        if dt.is_finite() && dt > 0.0 {
            Ok(dt)
        } else {
            Err(MeshError::invalid_param("dt", dt, "no finite positive time step"))
        }
    }

    /// Rate of change of the cell average of `p`.
    fn rhs(&self, p: PolygonId<I>) -> M::State {
        let ql = self.sol0[p.index()];
        let mut total = M::State::zeros();

        for he in self.mesh.polygon_halfedges(p) {
            let side = &self.sides[he.index()];
            let qr = match self.mesh.twin(he) {
                Some(t) => self.sol0[self.mesh.left_polygon(t).index()],
                None => {
                    let ctx = BoundaryContext {
                        tag: self.mesh.halfedge(he).tag(),
                        midpoint: side.midpoint,
                        normal: side.normal,
                        time: self.time,
                    };
                    let wl = self.model.conservative_to_primitive(&ql);
                    let wr = (self.boundary)(&ctx, &wl);
                    self.model.primitive_to_conservative(&wr)
                }
            };
            total += self.flux.flux(&self.model, &ql, &qr, &side.normal) * side.length;
        }

        let cell = &self.cells[p.index()];
        let source = match &self.source {
            Some(s) => {
                let tag = self.mesh.polygon(p).tag();
                s(&ql, tag, cell.centroid.x, cell.centroid.y, self.time)
            }
            None => M::State::zeros(),
        };

        source - total * (1.0 / cell.area)
    }
}

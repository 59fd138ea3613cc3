//! Linear acoustics.

use nalgebra::{Vector2, Vector3};

use super::ConservationLaw;

/// Linearized acoustics around a medium at rest.
///
/// State `(p, u, v)`: pressure perturbation and velocity. Primitive and
/// conservative variables coincide.
#[derive(Debug, Clone, Copy)]
pub struct LinearAcoustics {
    rho0: f64,
    k0: f64,
    c0: f64,
    z0: f64,
}

impl LinearAcoustics {
    /// Create the model for a medium of density `rho0` and bulk modulus `k0`.
    pub fn new(rho0: f64, k0: f64) -> Self {
        let c0 = (k0 / rho0).sqrt();
        Self {
            rho0,
            k0,
            c0,
            z0: c0 * rho0,
        }
    }

    /// Density of the unperturbed medium.
    pub fn rho0(&self) -> f64 {
        self.rho0
    }

    /// Bulk modulus.
    pub fn k0(&self) -> f64 {
        self.k0
    }

    /// Speed of sound `c0 = sqrt(k0 / rho0)`.
    pub fn sound_speed(&self) -> f64 {
        self.c0
    }

    /// Impedance `z0 = rho0 c0`.
    pub fn impedance(&self) -> f64 {
        self.z0
    }
}

impl ConservationLaw for LinearAcoustics {
    type State = Vector3<f64>;
    const DIM: usize = 3;

    fn flux(&self, q: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
        let f = Vector3::new(self.k0 * q[1], q[0] / self.rho0, 0.0);
        let g = Vector3::new(self.k0 * q[2], 0.0, q[0] / self.rho0);
        (f, g)
    }

    fn primitive_to_conservative(&self, w: &Vector3<f64>) -> Vector3<f64> {
        *w
    }

    fn conservative_to_primitive(&self, q: &Vector3<f64>) -> Vector3<f64> {
        *q
    }

    fn is_consistent(&self, _q: &Vector3<f64>) -> bool {
        true
    }

    fn max_lambda(&self, _q: &Vector3<f64>) -> f64 {
        self.c0
    }

    fn eigenvalues(&self, _q: &Vector3<f64>, _n: &Vector2<f64>) -> Vector3<f64> {
        Vector3::new(-self.c0, 0.0, self.c0)
    }
}

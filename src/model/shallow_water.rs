//! Shallow water equations.

use nalgebra::{Vector2, Vector3};

use super::ConservationLaw;

/// Standard gravitational acceleration.
pub const GRAVITY: f64 = 9.81;

/// Shallow water (Saint-Venant) equations over a flat bottom.
///
/// Conservative state `(h, hu, hv)`; primitive state `(h, u, v)`.
#[derive(Debug, Clone, Copy)]
pub struct ShallowWater {
    gravity: f64,
}

impl Default for ShallowWater {
    fn default() -> Self {
        Self { gravity: GRAVITY }
    }
}

impl ShallowWater {
    /// Create the model with the given gravitational acceleration.
    pub fn new(gravity: f64) -> Self {
        Self { gravity }
    }

    /// Gravitational acceleration.
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Gravity wave celerity `sqrt(g h)`.
    #[inline]
    pub fn celerity(&self, q: &Vector3<f64>) -> f64 {
        (self.gravity * q[0]).sqrt()
    }
}

impl ConservationLaw for ShallowWater {
    type State = Vector3<f64>;
    const DIM: usize = 3;

    fn flux(&self, q: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
        let hydrostatic = 0.5 * self.gravity * q[0] * q[0];
        let u = q[1] / q[0];
        let v = q[2] / q[0];
        let f = Vector3::new(q[1], q[1] * u + hydrostatic, q[2] * u);
        let g = Vector3::new(q[2], q[1] * v, q[2] * v + hydrostatic);
        (f, g)
    }

    fn primitive_to_conservative(&self, w: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(w[0], w[0] * w[1], w[0] * w[2])
    }

    fn conservative_to_primitive(&self, q: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(q[0], q[1] / q[0], q[2] / q[0])
    }

    fn is_consistent(&self, q: &Vector3<f64>) -> bool {
        q[0] > 0.0
    }

    fn max_lambda(&self, q: &Vector3<f64>) -> f64 {
        let speed = (q[1] * q[1] + q[2] * q[2]).sqrt() / q[0];
        speed + self.celerity(q)
    }

    fn eigenvalues(&self, q: &Vector3<f64>, n: &Vector2<f64>) -> Vector3<f64> {
        let un = (q[1] * n.x + q[2] * n.y) / q[0];
        let c = self.celerity(q);
        Vector3::new(un, un - c, un + c)
    }
}

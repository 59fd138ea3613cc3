//! Compressible Euler equations for an ideal gas.

use nalgebra::{Vector2, Vector4};

use super::ConservationLaw;

/// Euler equations of gas dynamics.
///
/// Conservative state `(ρ, ρu, ρv, ρe)` with `e` the specific total energy;
/// primitive state `(ρ, u, v, p)`.
#[derive(Debug, Clone, Copy)]
pub struct Euler {
    gamma: f64,
}

impl Default for Euler {
    fn default() -> Self {
        Self { gamma: 1.4 }
    }
}

impl Euler {
    /// Create the model for a gas with ratio of specific heats `gamma`.
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// Ratio of specific heats.
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Density.
    #[inline]
    pub fn density(&self, q: &Vector4<f64>) -> f64 {
        q[0]
    }

    /// Velocity `(u, v)`.
    #[inline]
    pub fn velocity(&self, q: &Vector4<f64>) -> Vector2<f64> {
        Vector2::new(q[1] / q[0], q[2] / q[0])
    }

    /// Specific total energy.
    #[inline]
    pub fn energy(&self, q: &Vector4<f64>) -> f64 {
        q[3] / q[0]
    }

    /// Pressure `p = (γ - 1) ρ (e - |u|² / 2)`.
    #[inline]
    pub fn pressure(&self, q: &Vector4<f64>) -> f64 {
        let vel = self.velocity(q);
        (self.gamma - 1.0) * q[0] * (self.energy(q) - 0.5 * vel.norm_squared())
    }

    /// Local speed of sound.
    #[inline]
    pub fn sound_speed(&self, q: &Vector4<f64>) -> f64 {
        (self.gamma * self.pressure(q) / q[0]).sqrt()
    }

    /// Specific total enthalpy `h = e + p / ρ`.
    #[inline]
    pub fn enthalpy(&self, q: &Vector4<f64>) -> f64 {
        self.energy(q) + self.pressure(q) / q[0]
    }
}

impl ConservationLaw for Euler {
    type State = Vector4<f64>;
    const DIM: usize = 4;

    fn flux(&self, q: &Vector4<f64>) -> (Vector4<f64>, Vector4<f64>) {
        let p = self.pressure(q);
        let u = q[1] / q[0];
        let v = q[2] / q[0];
        let f = Vector4::new(q[1], q[1] * u + p, q[2] * u, (q[3] + p) * u);
        let g = Vector4::new(q[2], q[1] * v, q[2] * v + p, (q[3] + p) * v);
        (f, g)
    }

    fn primitive_to_conservative(&self, w: &Vector4<f64>) -> Vector4<f64> {
        Vector4::new(
            w[0],
            w[0] * w[1],
            w[0] * w[2],
            0.5 * w[0] * (w[1] * w[1] + w[2] * w[2]) + w[3] / (self.gamma - 1.0),
        )
    }

    fn conservative_to_primitive(&self, q: &Vector4<f64>) -> Vector4<f64> {
        let vel = self.velocity(q);
        Vector4::new(q[0], vel.x, vel.y, self.pressure(q))
    }

    fn is_consistent(&self, q: &Vector4<f64>) -> bool {
        q[0] > 0.0 && self.pressure(q) > 0.0
    }

    fn max_lambda(&self, q: &Vector4<f64>) -> f64 {
        let vel = self.velocity(q);
        vel.x.abs().max(vel.y.abs()) + self.sound_speed(q)
    }

    fn eigenvalues(&self, q: &Vector4<f64>, n: &Vector2<f64>) -> Vector4<f64> {
        let un = self.velocity(q).dot(n);
        let c = self.sound_speed(q);
        Vector4::new(un - c, un, un, un + c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_primitive_round_trip() {
        let m = Euler::new(1.4);
        let w = Vector4::new(1.2, 0.5, -0.3, 2.0);
        let q = m.primitive_to_conservative(&w);
        assert_relative_eq!(m.pressure(&q), 2.0, epsilon = 1e-12);
        assert_relative_eq!(m.conservative_to_primitive(&q), w, epsilon = 1e-12);
    }

    #[test]
    fn test_consistency() {
        let m = Euler::default();
        assert!(m.is_consistent(&m.primitive_to_conservative(&Vector4::new(1.0, 0.0, 0.0, 1.0))));
        assert!(!m.is_consistent(&Vector4::new(-1.0, 0.0, 0.0, 1.0)));
        // Kinetic energy larger than total energy
        assert!(!m.is_consistent(&Vector4::new(1.0, 2.0, 0.0, 1.0)));
    }

    #[test]
    fn test_speeds_at_rest() {
        let m = Euler::new(1.4);
        let q = m.primitive_to_conservative(&Vector4::new(1.4, 0.0, 0.0, 1.0));
        // c = sqrt(1.4 * 1 / 1.4) = 1
        assert_relative_eq!(m.sound_speed(&q), 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.max_lambda(&q), 1.0, epsilon = 1e-12);
        let eig = m.eigenvalues(&q, &Vector2::new(1.0, 0.0));
        assert_relative_eq!(eig, Vector4::new(-1.0, 0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_flux_of_state_at_rest_is_pressure() {
        let m = Euler::new(1.4);
        let q = m.primitive_to_conservative(&Vector4::new(1.0, 0.0, 0.0, 2.5));
        let f = m.normal_flux(&q, &Vector2::new(0.0, 1.0));
        assert_relative_eq!(f, Vector4::new(0.0, 0.0, 2.5, 0.0), epsilon = 1e-12);
    }
}

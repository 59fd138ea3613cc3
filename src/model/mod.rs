//! Physical models: 2D hyperbolic systems of conservation laws.
//!
//! Every model describes a system
//!
//! ```text
//! q_t + F(q)_x + G(q)_y = S
//! ```
//!
//! through the [`ConservationLaw`] trait: the exact fluxes, the change between
//! conservative and primitive variables, a physical admissibility check and the
//! characteristic speeds used for the time step restriction.
//!
//! # Available Models
//!
//! | Model | State | Primitive |
//! |-------|-------|-----------|
//! | [`LinearAcoustics`] | `(p, u, v)` | `(p, u, v)` |
//! | [`Euler`] | `(ρ, ρu, ρv, ρe)` | `(ρ, u, v, p)` |
//! | [`ShallowWater`] | `(h, hu, hv)` | `(h, u, v)` |

mod acoustics;
mod euler;
mod shallow_water;

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub, SubAssign};

use nalgebra::{SVector, Vector2};

pub use acoustics::LinearAcoustics;
pub use euler::Euler;
pub use shallow_water::ShallowWater;

/// Fixed-size state vector of a conservation law.
///
/// Implemented for every `nalgebra::SVector<f64, D>`.
pub trait StateVector:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + AddAssign
    + SubAssign
    + Index<usize, Output = f64>
    + IndexMut<usize>
    + 'static
{
    /// The zero state.
    fn zeros() -> Self;

    /// Components as a slice.
    fn as_slice(&self) -> &[f64];
}

impl<const D: usize> StateVector for SVector<f64, D> {
    #[inline]
    fn zeros() -> Self {
        SVector::<f64, D>::zeros()
    }

    #[inline]
    fn as_slice(&self) -> &[f64] {
        nalgebra::Matrix::as_slice(self)
    }
}

/// A 2D hyperbolic system of conservation laws.
pub trait ConservationLaw: Send + Sync {
    /// State vector type.
    type State: StateVector;

    /// Number of state components.
    const DIM: usize;

    /// Exact fluxes `(F(q), G(q))` in the x and y directions.
    fn flux(&self, q: &Self::State) -> (Self::State, Self::State);

    /// Exact flux through a face with unit normal `n`.
    fn normal_flux(&self, q: &Self::State, n: &Vector2<f64>) -> Self::State {
        let (f, g) = self.flux(q);
        f * n.x + g * n.y
    }

    /// Convert primitive variables to conservative ones.
    fn primitive_to_conservative(&self, w: &Self::State) -> Self::State;

    /// Convert conservative variables to primitive ones.
    fn conservative_to_primitive(&self, q: &Self::State) -> Self::State;

    /// True if the state is physically admissible.
    fn is_consistent(&self, q: &Self::State) -> bool;

    /// Largest characteristic speed in any direction, used for the CFL condition.
    fn max_lambda(&self, q: &Self::State) -> f64;

    /// Eigenvalues of the flux Jacobian in direction `n`.
    fn eigenvalues(&self, q: &Self::State, n: &Vector2<f64>) -> Self::State;
}

/// Express momentum components `(1, 2)` of a state in the frame of a face with
/// unit normal `n`: normal first, tangential second.
#[inline]
pub fn rotate_to_normal<S: StateVector>(q: &S, n: &Vector2<f64>) -> S {
    let mut r = *q;
    r[1] = q[1] * n.x + q[2] * n.y;
    r[2] = -q[1] * n.y + q[2] * n.x;
    r
}

/// Inverse of [`rotate_to_normal`].
#[inline]
pub fn rotate_from_normal<S: StateVector>(q: &S, n: &Vector2<f64>) -> S {
    let mut r = *q;
    r[1] = q[1] * n.x - q[2] * n.y;
    r[2] = q[1] * n.y + q[2] * n.x;
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    #[test]
    fn test_rotation_round_trip() {
        let n = Vector2::new(0.6, 0.8);
        let q = Vector4::new(1.0, 2.0, -3.0, 4.0);

        let r = rotate_to_normal(&q, &n);
        assert_relative_eq!(r[1], 2.0 * 0.6 - 3.0 * 0.8);
        assert_relative_eq!(r[0], 1.0);
        assert_relative_eq!(r[3], 4.0);

        let back = rotate_from_normal(&r, &n);
        assert_relative_eq!(back, q, epsilon = 1e-12);
    }

    #[test]
    fn test_state_vector_ops() {
        let a = <Vector4<f64> as StateVector>::zeros();
        assert_eq!(a.as_slice(), &[0.0; 4]);
    }
}

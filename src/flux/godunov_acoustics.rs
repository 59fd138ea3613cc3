//! Exact Godunov flux for linear acoustics.

use nalgebra::{Vector2, Vector3};

use super::NumericalFlux;
use crate::model::{ConservationLaw, LinearAcoustics};

/// Godunov flux with the Riemann problem solved exactly at `x/t = 0`.
///
/// Only the left-going wave `(-Z, n_x, n_y)` crosses the face, so the interface
/// state is `q_L + α r₁` with `α = ½ (-Δp / Z + n·Δu)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcousticGodunov;

impl NumericalFlux<LinearAcoustics> for AcousticGodunov {
    fn flux(
        &self,
        model: &LinearAcoustics,
        ql: &Vector3<f64>,
        qr: &Vector3<f64>,
        n: &Vector2<f64>,
    ) -> Vector3<f64> {
        let z = model.impedance();
        let delta = qr - ql;
        let alpha = 0.5 * (-delta[0] / z + n.x * delta[1] + n.y * delta[2]);
        let r1 = Vector3::new(-z, n.x, n.y);
        model.normal_flux(&(ql + r1 * alpha), n)
    }
}

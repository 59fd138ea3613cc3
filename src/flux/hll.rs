//! HLL flux for the Euler equations.

use nalgebra::{Vector2, Vector4};

use super::{NumericalFlux, RotatedPair};
use crate::model::{rotate_from_normal, Euler};

/// Harten-Lax-van Leer flux with Davis-Einfeldt wave speeds `u ± c` taken from
/// Roe averages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hll;

impl NumericalFlux<Euler> for Hll {
    fn flux(
        &self,
        model: &Euler,
        ql: &Vector4<f64>,
        qr: &Vector4<f64>,
        n: &Vector2<f64>,
    ) -> Vector4<f64> {
        let s = RotatedPair::new(model, ql, qr, n);
        let roe = s.roe_average(model);
        let sl = roe.u - roe.c;
        let sr = roe.u + roe.c;

        let f = if sl >= 0.0 {
            s.fl
        } else if sr >= 0.0 {
            (s.fl * sr - s.fr * sl + (s.qr - s.ql) * (sl * sr)) * (1.0 / (sr - sl))
        } else {
            s.fr
        };
        rotate_from_normal(&f, n)
    }
}

//! Rusanov flux for the Euler equations.

use nalgebra::{Vector2, Vector4};

use super::{NumericalFlux, RotatedPair};
use crate::model::{rotate_from_normal, Euler};

/// Rusanov flux: local Lax-Friedrichs in the frame of the face, with the wave
/// speed estimated from the normal velocities only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rusanov;

impl NumericalFlux<Euler> for Rusanov {
    fn flux(
        &self,
        model: &Euler,
        ql: &Vector4<f64>,
        qr: &Vector4<f64>,
        n: &Vector2<f64>,
    ) -> Vector4<f64> {
        let s = RotatedPair::new(model, ql, qr, n);
        let cl = model.sound_speed(&s.ql);
        let cr = model.sound_speed(&s.qr);
        let splus = (s.wl[1].abs() + cl).max(s.wr[1].abs() + cr);

        let f = (s.fl + s.fr) * 0.5 - (s.qr - s.ql) * (0.5 * splus);
        rotate_from_normal(&f, n)
    }
}

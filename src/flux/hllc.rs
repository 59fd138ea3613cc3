//! HLLC flux for the Euler equations.

use nalgebra::{Vector2, Vector4};

use super::{NumericalFlux, RotatedPair};
use crate::model::{rotate_from_normal, Euler};

/// HLL flux with the contact wave restored (Toro's HLLC).
#[derive(Debug, Clone, Copy, Default)]
pub struct Hllc;

/// Conservative state between an outer wave of speed `s` and the contact `s_star`.
fn star_state(model: &Euler, q: &Vector4<f64>, w: &Vector4<f64>, s: f64, s_star: f64) -> Vector4<f64> {
    let (rho, u, v, p) = (w[0], w[1], w[2], w[3]);
    let energy = model.energy(q) + (s_star - u) * (s_star + p / (rho * (s - u)));
    Vector4::new(1.0, s_star, v, energy) * (rho * (s - u) / (s - s_star))
}

impl NumericalFlux<Euler> for Hllc {
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

        let (wl, wr) = (&s.wl, &s.wr);
        let s_star = (wr[3] - wl[3] + wl[0] * wl[1] * (sl - wl[1]) - wr[0] * wr[1] * (sr - wr[1]))
            / (wl[0] * (sl - wl[1]) - wr[0] * (sr - wr[1]));

        let f = if sl >= 0.0 {
            s.fl
        } else if s_star >= 0.0 {
            s.fl + (star_state(model, &s.ql, wl, sl, s_star) - s.ql) * sl
        } else if sr >= 0.0 {
            s.fr + (star_state(model, &s.qr, wr, sr, s_star) - s.qr) * sr
        } else {
            s.fr
        };
        rotate_from_normal(&f, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::test_util;
    use crate::model::ConservationLaw;
    use approx::assert_relative_eq;

    #[test]
    fn test_properties() {
        test_util::assert_consistent(&Hllc);
        test_util::assert_conservative(&Hllc);
    }

    #[test]
    fn test_stationary_contact_is_exact() {
        // Density jump at rest with uniform pressure: no mass crosses the face
        let model = Euler::new(1.4);
        let ql = model.primitive_to_conservative(&Vector4::new(1.0, 0.0, 0.0, 1.0));
        let qr = model.primitive_to_conservative(&Vector4::new(0.1, 0.0, 0.0, 1.0));
        let n = Vector2::new(1.0, 0.0);
        let f = Hllc.flux(&model, &ql, &qr, &n);
        assert_relative_eq!(f, Vector4::new(0.0, 1.0, 0.0, 0.0), epsilon = 1e-12);
    }
}

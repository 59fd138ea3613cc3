//! Roe flux for the Euler equations.

use nalgebra::{Vector2, Vector4};

use super::{NumericalFlux, RotatedPair};
use crate::model::{rotate_from_normal, Euler};

/// Roe's linearized Riemann solver.
///
/// Sonic points inside the left or right acoustic wave get the Harten-Hyman
/// entropy fix: the wave speed on either side of the fan is estimated from the
/// intermediate Roe state and the expansion is split across the face.
#[derive(Debug, Clone, Copy, Default)]
pub struct Roe;

impl NumericalFlux<Euler> for Roe {
    fn flux(
        &self,
        model: &Euler,
        ql: &Vector4<f64>,
        qr: &Vector4<f64>,
        n: &Vector2<f64>,
    ) -> Vector4<f64> {
        let s = RotatedPair::new(model, ql, qr, n);
        let (wl, wr) = (&s.wl, &s.wr);
        let m = s.roe_average(model);
        let gamma = model.gamma();

        let lambda = [m.u - m.c, m.u, m.u, m.u + m.c];
        let k0 = Vector4::new(1.0, m.u - m.c, m.v, m.h - m.u * m.c);
        let k3 = Vector4::new(1.0, m.u + m.c, m.v, m.h + m.u * m.c);

        let dp = wr[3] - wl[3];
        let du = wr[1] - wl[1];
        let alpha0 = 0.5 / m.c2 * (dp - m.rho * m.c * du);
        let alpha3 = 0.5 / m.c2 * (dp + m.rho * m.c * du);

        let mut f = if lambda[0] >= 0.0 {
            s.fl
        } else if lambda[1] >= 0.0 {
            s.fl + k0 * (alpha0 * lambda[0])
        } else if lambda[3] >= 0.0 {
            s.fr - k3 * (alpha3 * lambda[3])
        } else {
            s.fr
        };

        // Left transonic rarefaction
        let rho_star = wl[0] + alpha0;
        let u_star = (wl[0] * wl[1] + alpha0 * (m.u - m.c)) / rho_star;
        let p_star = (gamma - 1.0)
            * (s.ql[3] + alpha0 * (m.h - m.u * m.c) - 0.5 * rho_star * u_star * u_star);
        let c_star = (gamma * p_star / rho_star).sqrt();
        let lambda_l = wl[1] - model.sound_speed(&s.ql);
        let lambda_r = u_star - c_star;
        if lambda_l < 0.0 && lambda_r > 0.0 {
            f = s.fl + k0 * (lambda_l * (lambda_r - lambda[0]) / (lambda_r - lambda_l) * alpha0);
        }

        // Right transonic rarefaction
        let rho_star = wr[0] - alpha3;
        let u_star = (wr[0] * wr[1] - alpha3 * (m.u + m.c)) / rho_star;
        let p_star = (gamma - 1.0)
            * (s.qr[3] - alpha3 * (m.h + m.u * m.c) - 0.5 * rho_star * u_star * u_star);
        let c_star = (gamma * p_star / rho_star).sqrt();
        let lambda_l = u_star + c_star;
        let lambda_r = wr[1] + model.sound_speed(&s.qr);
        if lambda_l < 0.0 && lambda_r > 0.0 {
            f = s.fr - k3 * (lambda_r * (lambda[3] - lambda_l) / (lambda_r - lambda_l) * alpha3);
        }

        rotate_from_normal(&f, n)
    }
}

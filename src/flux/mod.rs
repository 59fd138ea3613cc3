//! Numerical fluxes.
//!
//! A numerical flux approximates the flux through a face from the states on its two
//! sides. All fluxes take the unit normal of the face, pointing from the left state
//! towards the right state, and return the flux in that direction.
//!
//! # Available Fluxes
//!
//! | Flux | Models | Notes |
//! |------|--------|-------|
//! | [`LaxFriedrichs`] | any | Local Lax-Friedrichs, most diffusive |
//! | [`AcousticGodunov`] | [`LinearAcoustics`] | Exact Riemann solver |
//! | [`Rusanov`] | [`Euler`] | Edge-aligned local Lax-Friedrichs |
//! | [`Hll`] | [`Euler`] | Two-wave solver with Roe-averaged speeds |
//! | [`Hllc`] | [`Euler`] | Restores the contact wave |
//! | [`Roe`] | [`Euler`] | Linearized solver with transonic entropy fix |
//!
//! The Euler fluxes rotate both states into the frame of the face, solve a 1D
//! problem along the normal and rotate the result back.
//!
//! [`LinearAcoustics`]: crate::model::LinearAcoustics
//! [`Euler`]: crate::model::Euler

mod godunov_acoustics;
mod hll;
mod hllc;
mod lax_friedrichs;
mod roe;
mod rusanov;

use nalgebra::{Vector2, Vector4};

use crate::model::{rotate_to_normal, ConservationLaw, Euler};

pub use godunov_acoustics::AcousticGodunov;
pub use hll::Hll;
pub use hllc::Hllc;
pub use lax_friedrichs::LaxFriedrichs;
pub use roe::Roe;
pub use rusanov::Rusanov;

/// Approximate flux through a face between two states.
pub trait NumericalFlux<M: ConservationLaw>: Send + Sync {
    /// Flux from `ql` to `qr` across a face with unit normal `n`.
    fn flux(&self, model: &M, ql: &M::State, qr: &M::State, n: &Vector2<f64>) -> M::State;
}

/// Left and right Euler states in the frame of a face.
struct RotatedPair {
    ql: Vector4<f64>,
    qr: Vector4<f64>,
    wl: Vector4<f64>,
    wr: Vector4<f64>,
    fl: Vector4<f64>,
    fr: Vector4<f64>,
}

impl RotatedPair {
    fn new(model: &Euler, ql: &Vector4<f64>, qr: &Vector4<f64>, n: &Vector2<f64>) -> Self {
        let ql = rotate_to_normal(ql, n);
        let qr = rotate_to_normal(qr, n);
        Self {
            wl: model.conservative_to_primitive(&ql),
            wr: model.conservative_to_primitive(&qr),
            fl: model.flux(&ql).0,
            fr: model.flux(&qr).0,
            ql,
            qr,
        }
    }

    /// Roe-averaged normal velocity, tangential velocity, enthalpy and sound speed.
    fn roe_average(&self, model: &Euler) -> RoeAverage {
        let sl = self.wl[0].sqrt();
        let sr = self.wr[0].sqrt();
        let hl = model.enthalpy(&self.ql);
        let hr = model.enthalpy(&self.qr);

        let u = (sl * self.wl[1] + sr * self.wr[1]) / (sl + sr);
        let v = (sl * self.wl[2] + sr * self.wr[2]) / (sl + sr);
        let h = (sl * hl + sr * hr) / (sl + sr);
        let c2 = (model.gamma() - 1.0) * (h - 0.5 * (u * u + v * v));
        RoeAverage {
            rho: sl * sr,
            u,
            v,
            h,
            c2,
            c: c2.sqrt(),
        }
    }
}

struct RoeAverage {
    rho: f64,
    u: f64,
    v: f64,
    h: f64,
    c2: f64,
    c: f64,
}

#[cfg(test)]
pub(crate) mod test_util {
    use nalgebra::{Vector2, Vector4};

    use super::NumericalFlux;
    use crate::model::{ConservationLaw, Euler};

    /// A flux must reduce to the exact flux when both states agree.
    pub fn assert_consistent<F: NumericalFlux<Euler>>(flux: &F) {
        let model = Euler::new(1.4);
        let normals = [
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, -1.0),
            Vector2::new(0.6, 0.8),
        ];
        let states = [
            Vector4::new(1.0, 0.75, 0.0, 1.0),
            Vector4::new(0.125, 0.0, 0.0, 0.1),
            Vector4::new(1.4, 2.9, 0.5, 1.0),
            Vector4::new(1.0, -3.0, 0.2, 1.0),
        ];
        for w in &states {
            let q = model.primitive_to_conservative(w);
            for n in &normals {
                let exact = model.normal_flux(&q, n);
                let approx = flux.flux(&model, &q, &q, n);
                approx::assert_relative_eq!(approx, exact, epsilon = 1e-10, max_relative = 1e-10);
            }
        }
    }

    /// Swapping the states and flipping the normal must negate the flux.
    pub fn assert_conservative<F: NumericalFlux<Euler>>(flux: &F) {
        let model = Euler::new(1.4);
        let ql = model.primitive_to_conservative(&Vector4::new(1.0, 0.3, -0.2, 1.0));
        let qr = model.primitive_to_conservative(&Vector4::new(0.4, -0.1, 0.4, 0.3));
        let n = Vector2::new(0.6, -0.8);
        let forward = flux.flux(&model, &ql, &qr, &n);
        let backward = flux.flux(&model, &qr, &ql, &(-n));
        approx::assert_relative_eq!(forward, -backward, epsilon = 1e-10, max_relative = 1e-10);
    }
}

//! Local Lax-Friedrichs flux.

use nalgebra::Vector2;

use super::NumericalFlux;
use crate::model::ConservationLaw;

/// Local Lax-Friedrichs flux, usable with any model.
///
/// `½ [(F(q_L) + F(q_R))·n - σ (q_R - q_L)]` with `σ` the larger of the two
/// maximal wave speeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaxFriedrichs;

impl<M: ConservationLaw> NumericalFlux<M> for LaxFriedrichs {
    fn flux(&self, model: &M, ql: &M::State, qr: &M::State, n: &Vector2<f64>) -> M::State {
        let sigma = model.max_lambda(ql).max(model.max_lambda(qr));
        (model.normal_flux(ql, n) + model.normal_flux(qr, n) - (*qr - *ql) * sigma) * 0.5
    }
}

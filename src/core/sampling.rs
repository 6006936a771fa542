use crate::core::errors::{SimError, SimResult};
use crate::core::execution::config::FactoryParams;
use crate::core::types::SimTime;
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

/// Pre-built distributions for every random duration in the model.
///
/// Gaussian draws are floored at 0.
#[derive(Debug, Clone)]
pub struct Sampler {
    inter_arrival: Exp<f64>,
    work_time: Normal<f64>,
    repair_time: Exp<f64>,
    resupply_time: Normal<f64>,
}

impl Sampler {
    pub fn from_params(params: &FactoryParams) -> SimResult<Self> {
        Ok(Self {
            inter_arrival: exponential("arrival_mean", params.arrival_mean)?,
            work_time: gaussian("work_time_std_dev", params.work_time_mean, params.work_time_std_dev)?,
            repair_time: exponential("repair_mean", params.repair_mean)?,
            resupply_time: gaussian(
                "resupply_time_std_dev",
                params.resupply_time_mean,
                params.resupply_time_std_dev,
            )?,
        })
    }

    pub fn inter_arrival<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        self.inter_arrival.sample(rng)
    }

    pub fn work_time<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        self.work_time.sample(rng).max(0.0)
    }

    pub fn repair_time<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        self.repair_time.sample(rng)
    }

    pub fn resupply_time<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        self.resupply_time.sample(rng).max(0.0)
    }
}

fn exponential(name: &'static str, mean: f64) -> SimResult<Exp<f64>> {
    if !(mean.is_finite() && mean > 0.0) {
        return Err(SimError::InvalidParameter { name, value: mean });
    }
    Exp::new(1.0 / mean).map_err(|_| SimError::InvalidParameter { name, value: mean })
}

fn gaussian(name: &'static str, mean: f64, std_dev: f64) -> SimResult<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|_| SimError::InvalidParameter { name, value: std_dev })
}

use crate::error::SimError;
use crate::job::{Job, JobId};
use crate::traits::JobSource;
use crate::{SimTime, TIME_QUANTUM};
use rand::prelude::*;
use rand_distr::Exp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub mean_interarrival_time: f64,
    pub mean_processing_time: f64,
    pub seed: u64,
    /// Round samples down to a multiple of [`TIME_QUANTUM`] (never below one quantum).
    pub quantize: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mean_interarrival_time: 3.0,
            mean_processing_time: 100.0,
            seed: 1000,
            quantize: true,
        }
    }
}

/// Infinite Poisson arrival stream with exponential job sizes.
pub struct JobGenerator {
    pub config: GeneratorConfig,
    interarrival: Exp<f64>,
    processing: Exp<f64>,
    rng: StdRng,
    clock: SimTime,
    next_id: JobId,
}

impl JobGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, SimError> {
        let interarrival = exp_with_mean(config.mean_interarrival_time, "mean_interarrival_time")?;
        let processing = exp_with_mean(config.mean_processing_time, "mean_processing_time")?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            interarrival,
            processing,
            clock: 0.0,
            next_id: 0,
        })
    }

    pub fn with_means(
        mean_interarrival_time: f64,
        mean_processing_time: f64,
        seed: u64,
    ) -> Result<Self, SimError> {
        Self::new(GeneratorConfig {
            mean_interarrival_time,
            mean_processing_time,
            seed,
            ..GeneratorConfig::default()
        })
    }

    /// Arrival time of the next job to be produced.
    pub fn clock(&self) -> SimTime {
        self.clock
    }

    fn draw(&mut self, dist: Exp<f64>) -> f64 {
        let sample = dist.sample(&mut self.rng);
        if self.config.quantize {
            ((sample / TIME_QUANTUM).floor() * TIME_QUANTUM).max(TIME_QUANTUM)
        } else {
            sample.max(f64::MIN_POSITIVE)
        }
    }

    pub fn next_job(&mut self) -> Job {
        let processing = self.draw(self.processing);
        let job = Job::new_unchecked(self.next_id, self.clock, processing);
        self.next_id += 1;
        self.clock += self.draw(self.interarrival);
        job
    }
}

fn exp_with_mean(mean: f64, field: &str) -> Result<Exp<f64>, SimError> {
    if !(mean.is_finite() && mean > 0.0) {
        return Err(SimError::InvalidConfiguration(format!(
            "{field} must be positive and finite, got {mean}"
        )));
    }
    Exp::new(1.0 / mean)
        .map_err(|e| SimError::InvalidConfiguration(format!("{field}: {e}")))
}

impl JobSource for JobGenerator {
    fn next_job(&mut self) -> Job {
        JobGenerator::next_job(self)
    }
}

impl Iterator for JobGenerator {
    type Item = Job;

    fn next(&mut self) -> Option<Job> {
        Some(JobGenerator::next_job(self))
    }
}

use super::argmin_by;
use crate::components::server::Server;
use crate::job::Job;
use crate::traits::{DispatchPolicy, ServerId};
use crate::{DEFAULT_SLOWDOWN_ALPHA, SLOWDOWN_EPSILON};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlowdownConfig {
    /// Per-queued-job penalty; negative values are clamped to zero.
    pub alpha: f64,
}

impl Default for SlowdownConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_SLOWDOWN_ALPHA,
        }
    }
}

/// Minimizes the estimated slowdown of the arriving job:
/// `1 + work_ahead / size + alpha * queue_len`.
///
/// The queue-length term keeps small jobs from piling up behind each other
/// on a server that merely looks light by work.
#[derive(Debug)]
pub struct SlowdownPolicy {
    pub config: SlowdownConfig,
}

impl SlowdownPolicy {
    pub fn new(alpha: f64) -> Self {
        Self::from_config(SlowdownConfig { alpha })
    }

    pub fn from_config(mut config: SlowdownConfig) -> Self {
        if !(config.alpha >= 0.0) {
            log::warn!("slowdown alpha {} clamped to 0", config.alpha);
            config.alpha = 0.0;
        }
        Self { config }
    }

    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    pub fn score(&self, server: &Server, job: &Job) -> f64 {
        let size = job.processing_time_needed().max(SLOWDOWN_EPSILON);
        1.0 + server.remaining_work_in_queue() / size + self.config.alpha * server.size() as f64
    }
}

impl Default for SlowdownPolicy {
    fn default() -> Self {
        Self::from_config(SlowdownConfig::default())
    }
}

impl DispatchPolicy for SlowdownPolicy {
    fn pick_server(&mut self, job: &Job, servers: &[Server]) -> ServerId {
        argmin_by(servers, |s| self.score(s, job))
    }
    fn kind(&self) -> &str {
        "Slowdown"
    }
    fn description(&self) -> &str {
        "Minimizes estimated slowdown with a queue-length penalty"
    }
    fn encode_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}

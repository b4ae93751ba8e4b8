use crate::components::server::Server;
use crate::job::Job;
use crate::traits::{DispatchPolicy, ServerId};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RandomConfig {
    pub seed: u64,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { seed: 0 }
    }
}

/// Uniform choice over all servers.
pub struct RandomPolicy {
    pub config: RandomConfig,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self::from_config(RandomConfig { seed })
    }

    pub fn from_config(config: RandomConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::from_config(RandomConfig::default())
    }
}

impl DispatchPolicy for RandomPolicy {
    fn pick_server(&mut self, _job: &Job, servers: &[Server]) -> ServerId {
        self.rng.gen_range(0..servers.len())
    }
    fn kind(&self) -> &str {
        "Random"
    }
    fn description(&self) -> &str {
        "Uniformly random server"
    }
    fn encode_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}

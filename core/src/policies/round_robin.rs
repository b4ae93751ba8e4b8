use super::EmptyConfig;
use crate::components::server::Server;
use crate::job::Job;
use crate::traits::{DispatchPolicy, ServerId};

/// Cycles through servers in index order.
#[derive(Debug, Default)]
pub struct RoundRobinPolicy {
    pub next_rr_idx: usize,
}

impl RoundRobinPolicy {
    pub fn from_config(_config: EmptyConfig) -> Self {
        Self::default()
    }
}

impl DispatchPolicy for RoundRobinPolicy {
    fn pick_server(&mut self, _job: &Job, servers: &[Server]) -> ServerId {
        let idx = self.next_rr_idx % servers.len();
        self.next_rr_idx = (idx + 1) % servers.len();
        idx
    }
    fn kind(&self) -> &str {
        "RoundRobin"
    }
    fn description(&self) -> &str {
        "Cycles through servers in order"
    }
    fn encode_config(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

use super::{argmin_by, EmptyConfig};
use crate::components::server::Server;
use crate::job::Job;
use crate::traits::{DispatchPolicy, ServerId};

/// Fewest queued jobs wins.
#[derive(Debug, Default)]
pub struct ShortestQueuePolicy;

impl ShortestQueuePolicy {
    pub fn from_config(_config: EmptyConfig) -> Self {
        Self
    }
}

impl DispatchPolicy for ShortestQueuePolicy {
    fn pick_server(&mut self, _job: &Job, servers: &[Server]) -> ServerId {
        argmin_by(servers, |s| s.size() as f64)
    }
    fn kind(&self) -> &str {
        "ShortestQueue"
    }
    fn description(&self) -> &str {
        "Server with the fewest queued jobs"
    }
    fn encode_config(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

use super::{argmin_by, EmptyConfig};
use crate::components::server::Server;
use crate::job::Job;
use crate::traits::{DispatchPolicy, ServerId};

/// Least outstanding processing time wins.
#[derive(Debug, Default)]
pub struct LeastWorkPolicy;

impl LeastWorkPolicy {
    pub fn from_config(_config: EmptyConfig) -> Self {
        Self
    }
}

impl DispatchPolicy for LeastWorkPolicy {
    fn pick_server(&mut self, _job: &Job, servers: &[Server]) -> ServerId {
        argmin_by(servers, Server::remaining_work_in_queue)
    }
    fn kind(&self) -> &str {
        "LeastWork"
    }
    fn description(&self) -> &str {
        "Server with the least remaining work"
    }
    fn encode_config(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

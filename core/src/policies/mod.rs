use crate::components::server::Server;
use crate::traits::{DispatchPolicy, ServerId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod least_work;
pub mod random;
pub mod round_robin;
pub mod shortest_queue;
pub mod slowdown;

pub use least_work::LeastWorkPolicy;
pub use random::{RandomConfig, RandomPolicy};
pub use round_robin::RoundRobinPolicy;
pub use shortest_queue::ShortestQueuePolicy;
pub use slowdown::{SlowdownConfig, SlowdownPolicy};

/// Config of policies that have nothing to tune.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmptyConfig {}

macro_rules! register_policies {
    ($($kind:expr => $type:ty),* $(,)?) => {
        /// Build a policy by kind name; `data` overrides the policy's default config.
        pub fn create_policy(kind: &str, data: Value) -> Option<Box<dyn DispatchPolicy>> {
            match kind {
                $(
                    $kind => {
                        let mut obj: $type = Default::default();
                        if !data.is_null() {
                            match serde_json::from_value(data) {
                                Ok(cfg) => obj = <$type>::from_config(cfg),
                                Err(e) => log::warn!("ignoring bad {} config: {}", $kind, e),
                            }
                        }
                        Some(Box::new(obj))
                    }
                )*
                _ => None,
            }
        }

        /// Kind names and one-line descriptions of every registered policy.
        pub fn policy_catalog() -> Vec<(String, String)> {
            vec![
                $(
                    {
                        let tmp: $type = Default::default();
                        (tmp.kind().to_string(), tmp.description().to_string())
                    }
                ),*
            ]
        }
    };
}

register_policies!(
    "Random" => random::RandomPolicy,
    "RoundRobin" => round_robin::RoundRobinPolicy,
    "ShortestQueue" => shortest_queue::ShortestQueuePolicy,
    "LeastWork" => least_work::LeastWorkPolicy,
    "Slowdown" => slowdown::SlowdownPolicy,
);

/// Index of the server with the smallest score; ties go to the lowest index.
pub(crate) fn argmin_by<F>(servers: &[Server], mut score: F) -> ServerId
where
    F: FnMut(&Server) -> f64,
{
    let mut best = 0;
    let mut best_score = f64::INFINITY;
    for (idx, server) in servers.iter().enumerate() {
        let s = score(server);
        if s < best_score {
            best = idx;
            best_score = s;
        }
    }
    best
}

pub mod analytics;
pub mod components;
pub mod dispatcher;
pub mod error;
pub mod job;
pub mod policies;
pub mod traits;

pub use analytics::{MetricPoint, MetricsCollector, RunSummary};
pub use components::generator::{GeneratorConfig, JobGenerator};
pub use components::server::{Server, ServerConfig};
pub use dispatcher::{DispatchRecord, Dispatcher, DispatcherConfig};
pub use error::SimError;
pub use job::{Job, JobId};
pub use policies::{create_policy, policy_catalog};
pub use traits::{DispatchPolicy, JobSource, Observer, ServerId};

/// Simulated time, in arbitrary units.
pub type SimTime = f64;

/// Relative residue below which a job's remaining work counts as done.
pub const WORK_EPSILON: f64 = 1e-9;
/// Granularity of generated arrival gaps and job sizes.
pub const TIME_QUANTUM: f64 = 1.0 / 128.0;
pub const DEFAULT_SLOWDOWN_ALPHA: f64 = 0.10;
/// Floor on job size in the slowdown score.
pub const SLOWDOWN_EPSILON: f64 = 1e-9;
/// Waiting times are recorded in thousandths of a time unit.
pub const WAIT_HISTOGRAM_SCALE: f64 = 1000.0;

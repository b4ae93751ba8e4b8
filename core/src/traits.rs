use crate::components::server::Server;
use crate::dispatcher::Dispatcher;
use crate::job::Job;

/// Index of a server inside its dispatcher.
pub type ServerId = usize;

/// Routing rule for arriving jobs.
///
/// `servers` is never empty and reflects queue state as of the job's
/// arrival instant. Implementations must return an index into `servers`.
pub trait DispatchPolicy {
    fn pick_server(&mut self, job: &Job, servers: &[Server]) -> ServerId;
    fn kind(&self) -> &str;
    fn description(&self) -> &str;

    // Serialization
    fn encode_config(&self) -> serde_json::Value;
}

/// Anything that can hand out the next job of an arrival stream.
pub trait JobSource {
    fn next_job(&mut self) -> Job;
}

/// Read-only hook invoked around every placement, e.g. for rendering.
pub trait Observer {
    fn on_state_changed(&mut self, dispatcher: &Dispatcher);
}

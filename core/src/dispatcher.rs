use crate::analytics::RunSummary;
use crate::components::server::{Server, ServerConfig};
use crate::error::SimError;
use crate::job::{Job, JobId};
use crate::policies::create_policy;
use crate::traits::{DispatchPolicy, JobSource, Observer, ServerId};
use crate::SimTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    pub servers: usize,
    /// Registered policy kind, see [`crate::policy_catalog`].
    pub policy: String,
    #[serde(default)]
    pub policy_params: serde_json::Value,
    #[serde(default)]
    pub record_completions: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            servers: 34,
            policy: "LeastWork".to_string(),
            policy_params: serde_json::Value::Null,
            record_completions: false,
        }
    }
}

/// One entry of the dispatch log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    pub job_id: JobId,
    pub arrival_time: SimTime,
    /// `None` while the job is still waiting for the policy's pick.
    pub server: Option<ServerId>,
}

/// Owns the server pool and the global clock, and routes every arriving
/// job through its [`DispatchPolicy`].
pub struct Dispatcher {
    servers: Vec<Server>,
    policy: Box<dyn DispatchPolicy>,
    observer: Option<Box<dyn Observer>>,
    global_clock: SimTime,
    handled: Vec<DispatchRecord>,
    out_of_order_arrivals: u64,
}

impl Dispatcher {
    pub fn new(server_count: usize, policy: Box<dyn DispatchPolicy>) -> Result<Self, SimError> {
        Self::with_server_config(server_count, policy, ServerConfig::default())
    }

    pub fn with_server_config(
        server_count: usize,
        policy: Box<dyn DispatchPolicy>,
        server_config: ServerConfig,
    ) -> Result<Self, SimError> {
        if server_count == 0 {
            return Err(SimError::InvalidConfiguration(
                "a dispatcher needs at least one server".to_string(),
            ));
        }
        let servers = (0..server_count)
            .map(|id| Server::new(id, server_config.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "dispatcher created: {} servers, policy {}",
            server_count,
            policy.kind()
        );

        Ok(Self {
            servers,
            policy,
            observer: None,
            global_clock: 0.0,
            handled: Vec::new(),
            out_of_order_arrivals: 0,
        })
    }

    pub fn from_config(config: &DispatcherConfig) -> Result<Self, SimError> {
        let policy = create_policy(&config.policy, config.policy_params.clone()).ok_or_else(|| {
            SimError::InvalidConfiguration(format!("unknown policy {:?}", config.policy))
        })?;
        Self::with_server_config(
            config.servers,
            policy,
            ServerConfig {
                record_completions: config.record_completions,
            },
        )
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.set_observer(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn Observer>) {
        self.observer = Some(observer);
    }

    /// Route one job. Every server is brought up to the arrival instant
    /// before the policy looks at them.
    pub fn handle_job(&mut self, job: Job) {
        let job_id = job.id;
        let arrival_time = job.arrival_time();
        let slot = self.handled.len();
        self.handled.push(DispatchRecord {
            job_id,
            arrival_time,
            server: None,
        });

        self.advance_time_to(arrival_time);
        self.notify();

        let server = self.policy.pick_server(&job, &self.servers);
        debug_assert!(
            server < self.servers.len(),
            "policy {} picked server {server} out of {}",
            self.policy.kind(),
            self.servers.len()
        );
        log::trace!("t={:.4} job {} -> server {}", self.global_clock, job_id, server);

        self.handled[slot].server = Some(server);
        self.servers[server].add_job(job);
        self.notify();
    }

    pub fn handle_all<I>(&mut self, jobs: I)
    where
        I: IntoIterator<Item = Job>,
    {
        for job in jobs {
            self.handle_job(job);
        }
    }

    /// Feed `count` jobs from `source`, then drain.
    pub fn run(&mut self, source: &mut dyn JobSource, count: usize) {
        for _ in 0..count {
            self.handle_job(source.next_job());
        }
        self.finish_up();
    }

    /// Move every server and the global clock to `time`.
    ///
    /// A time earlier than the global clock is counted as an out-of-order
    /// arrival and treated as "now".
    pub fn advance_time_to(&mut self, time: SimTime) {
        let time = if time < self.global_clock {
            self.out_of_order_arrivals += 1;
            log::warn!(
                "out-of-order arrival at t={} behind global clock {}; treating as current",
                time,
                self.global_clock
            );
            self.global_clock
        } else {
            time
        };

        for server in &mut self.servers {
            server.process_to(time);
        }
        self.global_clock = self.max_server_clock().max(time);
    }

    /// Serve all queued work to completion. Calling it again does nothing.
    pub fn finish_up(&mut self) {
        let backlog: Vec<SimTime> = self
            .servers
            .iter()
            .map(Server::remaining_work_in_queue)
            .collect();
        for (server, work) in self.servers.iter_mut().zip(backlog) {
            if work > 0.0 {
                server.drain();
            }
        }
        self.global_clock = self.global_clock.max(self.max_server_clock());
        log::debug!(
            "finished up at t={:.4} after {} jobs",
            self.global_clock,
            self.handled.len()
        );
    }

    fn max_server_clock(&self) -> SimTime {
        self.servers
            .iter()
            .map(Server::local_clock)
            .fold(self.global_clock, SimTime::max)
    }

    fn notify(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.on_state_changed(self);
            self.observer = Some(observer);
        }
    }

    /// Mean time-in-queue over every handled job; 0 when none were handled.
    ///
    /// Jobs still queued contribute nothing until they finish, so the value
    /// is exact once [`Dispatcher::finish_up`] has run.
    pub fn average_waiting_time(&self) -> f64 {
        if self.handled.is_empty() {
            return 0.0;
        }
        self.total_waiting_time() / self.handled.len() as f64
    }

    pub fn total_waiting_time(&self) -> f64 {
        self.servers.iter().map(Server::total_waiting_time).sum()
    }

    pub fn num_jobs_handled(&self) -> usize {
        self.handled.len()
    }

    pub fn handled_jobs(&self) -> &[DispatchRecord] {
        &self.handled
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn global_clock(&self) -> SimTime {
        self.global_clock
    }

    pub fn out_of_order_arrivals(&self) -> u64 {
        self.out_of_order_arrivals
    }

    pub fn policy_name(&self) -> &str {
        self.policy.kind()
    }

    pub fn policy_config(&self) -> serde_json::Value {
        self.policy.encode_config()
    }

    pub fn summary(&self) -> Result<RunSummary, SimError> {
        RunSummary::from_dispatcher(self)
    }

    pub fn visual_snapshot(&self) -> serde_json::Value {
        let servers: Vec<serde_json::Value> =
            self.servers.iter().map(Server::get_visual_snapshot).collect();
        serde_json::json!({
            "time": self.global_clock,
            "jobs_handled": self.handled.len(),
            "policy": self.policy.kind(),
            "servers": servers,
        })
    }
}

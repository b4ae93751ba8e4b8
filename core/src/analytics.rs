use crate::dispatcher::Dispatcher;
use crate::error::SimError;
use crate::traits::Observer;
use crate::{SimTime, WAIT_HISTOGRAM_SCALE};
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

/// End-of-run statistics for one dispatcher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub policy: String,
    pub servers: usize,
    pub jobs_handled: usize,
    pub jobs_completed: u64,
    pub mean_wait: f64,
    pub p50_wait: f64,
    pub p99_wait: f64,
    pub max_wait: f64,
    pub makespan: SimTime,
    pub total_work: f64,
    pub completed_work: f64,
    pub remaining_work: f64,
    pub out_of_order_arrivals: u64,
}

impl RunSummary {
    pub fn from_dispatcher(dispatcher: &Dispatcher) -> Result<Self, SimError> {
        let servers = dispatcher.servers();
        let mut waits = Histogram::<u64>::new(3)?;
        for server in servers {
            waits.add(server.waiting_time_histogram())?;
        }
        let unscale = |v: u64| v as f64 / WAIT_HISTOGRAM_SCALE;

        Ok(Self {
            policy: dispatcher.policy_name().to_string(),
            servers: servers.len(),
            jobs_handled: dispatcher.num_jobs_handled(),
            jobs_completed: servers.iter().map(|s| s.jobs_completed()).sum(),
            mean_wait: dispatcher.average_waiting_time(),
            p50_wait: unscale(waits.value_at_quantile(0.5)),
            p99_wait: unscale(waits.value_at_quantile(0.99)),
            max_wait: unscale(waits.max()),
            makespan: dispatcher.global_clock(),
            total_work: servers.iter().map(|s| s.total_work_added()).sum(),
            completed_work: servers.iter().map(|s| s.completed_work()).sum(),
            remaining_work: servers.iter().map(|s| s.remaining_work_in_queue()).sum(),
            out_of_order_arrivals: dispatcher.out_of_order_arrivals(),
        })
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct MetricPoint {
    pub sim_time: SimTime,
    pub jobs_handled: usize,
    pub mean_wait: f64,
    pub queued_jobs: usize,
    pub remaining_work: f64,
}

/// Observer sampling farm load at most once per `step` of simulated time,
/// keeping the newest `max_points` samples.
pub struct MetricsCollector {
    pub history: VecDeque<MetricPoint>,
    pub max_points: usize,
    pub step: SimTime,
    last_sample_time: Option<SimTime>,
}

impl MetricsCollector {
    pub fn new(max_points: usize, step: SimTime) -> Self {
        Self {
            history: VecDeque::with_capacity(max_points),
            max_points,
            step,
            last_sample_time: None,
        }
    }

    pub fn update(&mut self, dispatcher: &Dispatcher) {
        let now = dispatcher.global_clock();
        if let Some(last) = self.last_sample_time {
            if now < last + self.step {
                return;
            }
        }

        let servers = dispatcher.servers();
        self.history.push_back(MetricPoint {
            sim_time: now,
            jobs_handled: dispatcher.num_jobs_handled(),
            mean_wait: dispatcher.average_waiting_time(),
            queued_jobs: servers.iter().map(|s| s.size()).sum(),
            remaining_work: servers.iter().map(|s| s.remaining_work_in_queue()).sum(),
        });
        if self.history.len() > self.max_points {
            self.history.pop_front();
        }
        self.last_sample_time = Some(now);
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_sample_time = None;
    }
}

impl Observer for MetricsCollector {
    fn on_state_changed(&mut self, dispatcher: &Dispatcher) {
        self.update(dispatcher);
    }
}

/// Lets callers keep a handle on an observer after boxing it into a dispatcher.
impl<O: Observer> Observer for Arc<RwLock<O>> {
    fn on_state_changed(&mut self, dispatcher: &Dispatcher) {
        let mut inner = self.write().unwrap_or_else(|poisoned| {
            log::warn!("observer lock poisoned; notifying with its last state");
            poisoned.into_inner()
        });
        inner.on_state_changed(dispatcher);
    }
}

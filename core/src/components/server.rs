use crate::error::SimError;
use crate::job::Job;
use crate::traits::ServerId;
use crate::{SimTime, WAIT_HISTOGRAM_SCALE, WORK_EPSILON};
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Keep every finished job in completion order.
    pub record_completions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { record_completions: false }
    }
}

/// A single FIFO server with its own lazily advanced clock.
///
/// `remaining_work` and `total_waiting_time` are running totals, so every
/// accessor is O(1) and `process_to` only touches jobs it actually finishes
/// plus at most one partially served head.
#[derive(Debug)]
pub struct Server {
    pub id: ServerId,
    pub config: ServerConfig,
    local_clock: SimTime,
    queue: VecDeque<Job>,
    remaining_work: SimTime,
    total_waiting_time: SimTime,
    total_work_added: SimTime,
    completed_work: SimTime,
    jobs_completed: u64,
    idle_time: SimTime,
    waits: Histogram<u64>,
    completed: Vec<Job>,
}

impl Server {
    pub fn new(id: ServerId, config: ServerConfig) -> Result<Self, SimError> {
        Ok(Self {
            id,
            config,
            local_clock: 0.0,
            queue: VecDeque::new(),
            remaining_work: 0.0,
            total_waiting_time: 0.0,
            total_work_added: 0.0,
            completed_work: 0.0,
            jobs_completed: 0,
            idle_time: 0.0,
            waits: Histogram::new(3)?,
            completed: Vec::new(),
        })
    }

    pub fn add_job(&mut self, job: Job) {
        let needed = job.processing_time_needed();
        self.remaining_work += needed;
        self.total_work_added += needed;
        self.queue.push_back(job);
    }

    /// Advance the local clock to `time`, serving queued work in FIFO order.
    ///
    /// Never moves the clock backwards: a stale `time` is a no-op.
    pub fn process_to(&mut self, time: SimTime) {
        if !(time > self.local_clock) {
            return;
        }

        let mut budget = time - self.local_clock;
        while budget > 0.0 {
            let Some(head) = self.queue.front_mut() else {
                break;
            };

            let remaining = head.processing_time_remaining();
            // A residue below the epsilon finishes the job at `time` at the latest;
            // otherwise it would be stranded forever.
            let slice = if remaining - budget <= WORK_EPSILON * head.processing_time_needed() {
                remaining
            } else {
                budget
            };

            self.local_clock = (self.local_clock + slice).min(time);
            budget = time - self.local_clock;
            self.remaining_work -= slice;
            if let Err(e) = head.process(slice, self.local_clock) {
                panic!("server {} work accounting drifted: {e}", self.id);
            }

            if head.is_finished() {
                if let Some(done) = self.queue.pop_front() {
                    self.retire(done);
                }
            }
        }

        if self.queue.is_empty() {
            self.remaining_work = 0.0;
        }
        if budget > 0.0 {
            self.idle_time += budget;
        }
        self.local_clock = time;
    }

    /// Serve everything currently queued.
    pub fn drain(&mut self) {
        let target = self.local_clock + self.remaining_work;
        self.process_to(target);
        // Rounding in the running total can leave a sliver of the last job.
        while let Some(head) = self.queue.front() {
            let target = self.local_clock + head.processing_time_remaining();
            if !(target > self.local_clock) {
                log::warn!(
                    "server {}: job {} residue {} is below clock resolution",
                    self.id,
                    head.id,
                    head.processing_time_remaining()
                );
                break;
            }
            self.process_to(target);
        }
    }

    fn retire(&mut self, job: Job) {
        let wait = job.time_in_queue().unwrap_or(0.0);
        self.total_waiting_time += wait;
        self.completed_work += job.processing_time_needed();
        self.jobs_completed += 1;
        self.waits
            .saturating_record((wait * WAIT_HISTOGRAM_SCALE).round() as u64);
        log::trace!(
            "server {} finished job {} at t={:.4} after waiting {:.4}",
            self.id,
            job.id,
            self.local_clock,
            wait
        );
        if self.config.record_completions {
            self.completed.push(job);
        }
    }

    pub fn remaining_work_in_queue(&self) -> SimTime {
        self.remaining_work
    }

    pub fn size(&self) -> usize {
        self.queue.len()
    }

    pub fn total_waiting_time(&self) -> SimTime {
        self.total_waiting_time
    }

    pub fn local_clock(&self) -> SimTime {
        self.local_clock
    }

    pub fn total_work_added(&self) -> SimTime {
        self.total_work_added
    }

    pub fn completed_work(&self) -> SimTime {
        self.completed_work
    }

    pub fn jobs_completed(&self) -> u64 {
        self.jobs_completed
    }

    pub fn idle_time(&self) -> SimTime {
        self.idle_time
    }

    pub fn queued_jobs(&self) -> impl Iterator<Item = &Job> {
        self.queue.iter()
    }

    /// Finished jobs in completion order; empty unless `record_completions` is set.
    pub fn completed_jobs(&self) -> &[Job] {
        &self.completed
    }

    pub fn waiting_time_histogram(&self) -> &Histogram<u64> {
        &self.waits
    }

    pub fn get_visual_snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "clock": self.local_clock,
            "work": self.remaining_work,
            "jobs": self.queue.len(),
            "idle": self.queue.is_empty(),
        })
    }
}

use crate::error::SimError;
use crate::SimTime;
use serde::{Deserialize, Serialize};

pub type JobId = u64;

/// A unit of work travelling through the farm.
///
/// Arrival time and processing requirement are fixed at creation. Only the
/// server holding the job mutates the rest, through [`Job::process`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    arrival_time: SimTime,
    processing_time_needed: SimTime,
    processing_time_remaining: SimTime,
    service_start_time: Option<SimTime>,
    completion_time: Option<SimTime>,
}

impl Job {
    /// Fails unless the arrival time is finite and the size is positive and finite.
    pub fn new(
        id: JobId,
        arrival_time: SimTime,
        processing_time_needed: SimTime,
    ) -> Result<Self, SimError> {
        if !arrival_time.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "job {id}: arrival time must be finite, got {arrival_time}"
            )));
        }
        if !(processing_time_needed.is_finite() && processing_time_needed > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "job {id}: processing time must be positive and finite, got {processing_time_needed}"
            )));
        }
        Ok(Self::new_unchecked(id, arrival_time, processing_time_needed))
    }

    /// For sources that already guarantee valid samples.
    pub(crate) fn new_unchecked(
        id: JobId,
        arrival_time: SimTime,
        processing_time_needed: SimTime,
    ) -> Self {
        debug_assert!(
            arrival_time.is_finite() && processing_time_needed > 0.0,
            "job {id} built from an invalid sample"
        );
        Self {
            id,
            arrival_time,
            processing_time_needed,
            processing_time_remaining: processing_time_needed,
            service_start_time: None,
            completion_time: None,
        }
    }

    pub fn arrival_time(&self) -> SimTime {
        self.arrival_time
    }

    pub fn processing_time_needed(&self) -> SimTime {
        self.processing_time_needed
    }

    pub fn processing_time_remaining(&self) -> SimTime {
        self.processing_time_remaining
    }

    pub fn service_start_time(&self) -> Option<SimTime> {
        self.service_start_time
    }

    pub fn completion_time(&self) -> Option<SimTime> {
        self.completion_time
    }

    pub fn is_finished(&self) -> bool {
        self.completion_time.is_some()
    }

    /// Consume `amount` of processing in a slice ending at `current_time`.
    ///
    /// The first call pins the service start to `current_time - amount`.
    /// Driving the remaining work to zero records the completion time.
    pub fn process(&mut self, amount: SimTime, current_time: SimTime) -> Result<(), SimError> {
        if amount.is_nan() || amount < 0.0 || amount > self.processing_time_remaining {
            return Err(SimError::InvalidAmount {
                amount,
                remaining: self.processing_time_remaining,
            });
        }

        if self.service_start_time.is_none() {
            self.service_start_time = Some(current_time - amount);
        }

        self.processing_time_remaining -= amount;
        if self.processing_time_remaining <= 0.0 {
            self.processing_time_remaining = 0.0;
            self.completion_time = Some(current_time);
        }
        Ok(())
    }

    /// Time spent waiting before service began. `None` until the job finishes.
    pub fn time_in_queue(&self) -> Option<SimTime> {
        self.completion_time
            .map(|done| (done - self.arrival_time - self.processing_time_needed).max(0.0))
    }
}

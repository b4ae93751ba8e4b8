use thiserror::Error;

/// Errors surfaced by the simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected at construction time (server count, generator means, policy name).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A job was asked to consume a negative amount or more work than it has left.
    #[error("invalid processing amount {amount} (remaining {remaining})")]
    InvalidAmount { amount: f64, remaining: f64 },

    #[error("histogram allocation failed: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),

    #[error("histogram merge failed: {0}")]
    HistogramMerge(#[from] hdrhistogram::AdditionError),
}

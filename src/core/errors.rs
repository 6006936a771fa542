use thiserror::Error;

/// Errors surfaced at the library boundary.
///
/// A running replication never fails; only configuration and the
/// aggregation/export helpers can return these.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("horizon must be a positive, finite time (got {0})")]
    InvalidHorizon(f64),

    #[error("replication count must be at least 1")]
    InvalidReplications,

    #[error("thread pool size must be at least 1")]
    InvalidThreadPoolSize,

    #[error("invalid model parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("no snapshots to aggregate")]
    EmptyBatch,

    #[error("cannot lay out {runs} runs of {days_per_run} days ending at {end_date}")]
    InvalidDateRange {
        days_per_run: u32,
        runs: usize,
        end_date: chrono::NaiveDate,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;

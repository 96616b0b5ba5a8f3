//! Id generator error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Wall clock observed behind the last issued tick
    #[error("clock moved backwards: last tick {last_tick}, observed tick {observed_tick}")]
    ClockRolledBack { last_tick: u64, observed_tick: i64 },

    /// Elapsed time no longer fits in the time field
    #[error("elapsed time exceeds the {bits}-bit time field")]
    TimeOverflow { bits: u32 },

    #[error("generator epoch {0} is ahead of the current time")]
    StartTimeAhead(String),

    #[error("machine id {0} rejected")]
    InvalidMachineId(u16),

    #[error("machine id unavailable: {0}")]
    MachineIdUnavailable(String),
}

pub type IdResult<T> = Result<T, IdError>;

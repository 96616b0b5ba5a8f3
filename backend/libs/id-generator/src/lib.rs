//! Distributed unique id generator
//!
//! Issues 63-bit, time-ordered identifiers. Every post and every content
//! document is keyed by one of these, so all three post stores share a
//! single id space.
//!
//! **Layout** (most significant first):
//! ```text
//! | 39 bits elapsed ticks | 8 bits sequence | 16 bits machine id |
//! ```
//! - A tick is 10 ms, so the time field lasts roughly 174 years from the epoch
//! - Up to 256 ids per tick per instance
//! - Up to 65 536 concurrently running instances
//!
//! **Guarantees**:
//! - Strictly increasing ids from one instance while the clock does not move back
//! - Disjoint ids across instances configured with distinct machine ids
//! - A clock observed behind the last issued tick fails with
//!   [`IdError::ClockRolledBack`] instead of reusing a past tick

mod error;
mod machine;

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{IdError, IdResult};
pub use machine::{parse_machine_id, resolve_machine_id, MACHINE_ID_ENV};

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const BITS_TIME: u32 = 39;
pub const BITS_SEQUENCE: u32 = 8;
pub const BITS_MACHINE_ID: u32 = 16;

/// Length of one tick in milliseconds
pub const TICK_MILLIS: i64 = 10;

const SEQUENCE_MASK: u16 = (1 << BITS_SEQUENCE) - 1;
const MAX_ELAPSED_TICKS: u64 = (1 << BITS_TIME) - 1;

/// Default epoch: 2024-01-01T00:00:00Z
pub fn default_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

// ============================================================================
// Generated id
// ============================================================================

/// Opaque 63-bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedId(u64);

/// The three fields packed into a [`GeneratedId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParts {
    pub elapsed_ticks: u64,
    pub sequence: u16,
    pub machine_id: u16,
}

impl GeneratedId {
    fn compose(elapsed_ticks: u64, sequence: u16, machine_id: u16) -> Self {
        Self(
            elapsed_ticks << (BITS_SEQUENCE + BITS_MACHINE_ID)
                | u64::from(sequence) << BITS_MACHINE_ID
                | u64::from(machine_id),
        )
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Always fits: the top bit is never set
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }

    pub fn decompose(self) -> IdParts {
        IdParts {
            elapsed_ticks: self.0 >> (BITS_SEQUENCE + BITS_MACHINE_ID),
            sequence: ((self.0 >> BITS_MACHINE_ID) & u64::from(SEQUENCE_MASK)) as u16,
            machine_id: (self.0 & u64::from(u16::MAX)) as u16,
        }
    }
}

impl fmt::Display for GeneratedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GeneratedId> for u64 {
    fn from(id: GeneratedId) -> Self {
        id.0
    }
}

// ============================================================================
// Configuration
// ============================================================================

pub type MachineIdCheck = Arc<dyn Fn(u16) -> bool + Send + Sync>;

/// Generator settings. The machine id is always supplied by the caller.
#[derive(Clone)]
pub struct IdGenConfig {
    pub start_time: DateTime<Utc>,
    pub machine_id: u16,
    pub check_machine_id: Option<MachineIdCheck>,
}

impl IdGenConfig {
    pub fn new(machine_id: u16) -> Self {
        Self {
            start_time: default_epoch(),
            machine_id,
            check_machine_id: None,
        }
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = start_time;
        self
    }

    /// Reject the machine id at construction if the predicate returns false
    pub fn with_machine_check<F>(mut self, check: F) -> Self
    where
        F: Fn(u16) -> bool + Send + Sync + 'static,
    {
        self.check_machine_id = Some(Arc::new(check));
        self
    }
}

impl fmt::Debug for IdGenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenConfig")
            .field("start_time", &self.start_time)
            .field("machine_id", &self.machine_id)
            .field("check_machine_id", &self.check_machine_id.is_some())
            .finish()
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Anything that can mint ids. The post orchestrator depends on this rather
/// than on the concrete generator.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> IdResult<GeneratedId>;
}

struct TickState {
    last_tick: Option<u64>,
    sequence: u16,
}

pub struct IdGenerator {
    start_time: DateTime<Utc>,
    machine_id: u16,
    clock: Arc<dyn Clock>,
    state: Mutex<TickState>,
}

impl IdGenerator {
    pub fn new(config: IdGenConfig) -> IdResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: IdGenConfig, clock: Arc<dyn Clock>) -> IdResult<Self> {
        let now = clock.now();
        if config.start_time > now {
            return Err(IdError::StartTimeAhead(config.start_time.to_rfc3339()));
        }

        if let Some(check) = &config.check_machine_id {
            if !check(config.machine_id) {
                return Err(IdError::InvalidMachineId(config.machine_id));
            }
        }

        debug!(
            machine_id = config.machine_id,
            start_time = %config.start_time,
            "Id generator created"
        );

        Ok(Self {
            start_time: config.start_time,
            machine_id: config.machine_id,
            clock,
            state: Mutex::new(TickState {
                last_tick: None,
                sequence: 0,
            }),
        })
    }

    pub fn machine_id(&self) -> u16 {
        self.machine_id
    }

    /// Mint the next id.
    ///
    /// When the sequence is exhausted within a tick the call blocks until
    /// the next tick boundary (at most one tick).
    pub fn next_id(&self) -> IdResult<GeneratedId> {
        let mut state = self.state.lock();

        // Read the clock under the lock so concurrent callers observe
        // ticks in the order they are issued.
        let now = self.clock.now();
        let observed = self.elapsed_ticks(now);

        match state.last_tick {
            Some(last) if observed < last as i64 => {
                warn!(
                    machine_id = self.machine_id,
                    last_tick = last,
                    observed_tick = observed,
                    "Clock moved backwards; refusing to issue id"
                );
                return Err(IdError::ClockRolledBack {
                    last_tick: last,
                    observed_tick: observed,
                });
            }
            Some(last) if observed == last as i64 => {
                state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
                if state.sequence == 0 {
                    let next = last + 1;
                    Self::check_time_field(next)?;
                    state.last_tick = Some(next);
                    self.wait_for_tick(next, now);
                }
            }
            _ => {
                if observed < 0 {
                    return Err(IdError::ClockRolledBack {
                        last_tick: 0,
                        observed_tick: observed,
                    });
                }
                let current = observed as u64;
                Self::check_time_field(current)?;
                state.last_tick = Some(current);
                state.sequence = 0;
            }
        }

        let tick = state.last_tick.unwrap_or_default();
        Ok(GeneratedId::compose(tick, state.sequence, self.machine_id))
    }

    fn elapsed_ticks(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_time)
            .num_milliseconds()
            .div_euclid(TICK_MILLIS)
    }

    fn check_time_field(tick: u64) -> IdResult<()> {
        if tick > MAX_ELAPSED_TICKS {
            return Err(IdError::TimeOverflow { bits: BITS_TIME });
        }
        Ok(())
    }

    fn wait_for_tick(&self, tick: u64, now: DateTime<Utc>) {
        let boundary = self.start_time + chrono::Duration::milliseconds(tick as i64 * TICK_MILLIS);
        if let Ok(wait) = (boundary - now).to_std() {
            debug!(
                machine_id = self.machine_id,
                wait_ms = wait.as_millis() as u64,
                "Sequence exhausted; waiting for next tick"
            );
            std::thread::sleep(wait);
        }
    }
}

impl IdSource for IdGenerator {
    fn next_id(&self) -> IdResult<GeneratedId> {
        IdGenerator::next_id(self)
    }
}

//! Round clock: the countdown and the day counter.
//!
//! The clock knows nothing about phases. The engine asks it to count down
//! once per tick and decides what an expired countdown means.
//!
//! The day counter is set at round start and never advanced. No daily
//! progression exists yet; the counter is carried so that score history
//! entries are stamped with it.

use crate::config::RoundConfig;

/// Errors that can occur when building a clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Invalid round configuration (e.g. a zero-length round).
    #[error("invalid round configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Result of counting down one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Time remains; the tick should process demand.
    Running {
        /// Seconds left after this tick.
        remaining: u32,
    },
    /// The countdown hit zero on this tick.
    Expired,
}

/// Countdown and day counter for a single round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundClock {
    /// Seconds in a full round.
    duration_seconds: u32,

    /// Seconds left in the current round.
    remaining_seconds: u32,

    /// Day counter value applied on every reset.
    starting_day: u32,

    /// Current day counter.
    day: u32,
}

impl RoundClock {
    /// Create a clock at the start of a round.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the round has zero duration.
    pub fn new(config: &RoundConfig) -> Result<Self, ClockError> {
        if config.duration_seconds == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "duration_seconds must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            duration_seconds: config.duration_seconds,
            remaining_seconds: config.duration_seconds,
            starting_day: config.starting_day,
            day: config.starting_day,
        })
    }

    /// Rewind to a full countdown and the starting day.
    pub const fn reset(&mut self) {
        self.remaining_seconds = self.duration_seconds;
        self.day = self.starting_day;
    }

    /// Count down one tick.
    ///
    /// A countdown at one second or less expires instead of decrementing,
    /// leaving the clock at exactly zero.
    pub const fn countdown(&mut self) -> Countdown {
        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            return Countdown::Expired;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        Countdown::Running {
            remaining: self.remaining_seconds,
        }
    }

    /// Seconds left in the current round.
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Seconds in a full round.
    pub const fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Current day counter.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Whether the countdown has reached zero.
    pub const fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }
}

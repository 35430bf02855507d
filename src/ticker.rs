//! The clock's notion of "now".
//!
//! RUNNING → SUSPENDED while narration plays → RUNNING (resynced)

use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};
use tracing::debug;

/// Source of wall-clock time.
pub trait TimeSource {
    fn now(&self) -> NaiveDateTime;
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerState {
    Running,
    Suspended,
}

impl std::fmt::Display for TickerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "RUNNING"),
            Self::Suspended => write!(f, "SUSPENDED"),
        }
    }
}

/// Held "current time" plus an optional user-set override.
#[derive(Debug, Clone)]
pub struct ClockTicker {
    held: NaiveDateTime,
    manual: Option<NaiveDateTime>,
    state: TickerState,
}

impl ClockTicker {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            held: now,
            manual: None,
            state: TickerState::Running,
        }
    }

    pub fn state(&self) -> TickerState {
        self.state
    }

    /// Periodic timer callback. Ignored while suspended.
    pub fn tick(&mut self, now: NaiveDateTime) {
        if self.state == TickerState::Running {
            self.held = now;
        }
    }

    /// Follow the narrator's speaking flag.
    ///
    /// Resuming jumps straight to `now`; ticks missed during narration are
    /// not replayed.
    pub fn sync_speaking(&mut self, speaking: bool, now: NaiveDateTime) {
        match (self.state, speaking) {
            (TickerState::Running, true) => self.state = TickerState::Suspended,
            (TickerState::Suspended, false) => {
                self.state = TickerState::Running;
                self.held = now;
            }
            _ => return,
        }
        debug!("State: → {} at {}", self.state, self.held.time());
    }

    /// The ticking instant, used by the duration calculators.
    pub fn current(&self) -> NaiveDateTime {
        self.held
    }

    /// What the dial and the narration show: the override if set.
    pub fn displayed(&self) -> NaiveDateTime {
        self.manual.unwrap_or(self.held)
    }

    pub fn manual(&self) -> Option<NaiveDateTime> {
        self.manual
    }

    pub fn set_manual(&mut self, time: NaiveDateTime) {
        self.manual = Some(time);
    }

    pub fn clear_manual(&mut self) {
        self.manual = None;
    }
}

/// Fixed-period schedule for the display timer.
#[derive(Debug, Clone, Copy)]
pub struct TickSchedule {
    period: Duration,
    last: Instant,
}

impl TickSchedule {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            last: start,
        }
    }

    /// True (and re-armed) once a full period has passed since the last fire.
    pub fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.period {
            self.last = now;
            true
        } else {
            false
        }
    }

    /// Time until the next fire, for scheduling a repaint.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.period
            .saturating_sub(now.saturating_duration_since(self.last))
    }
}

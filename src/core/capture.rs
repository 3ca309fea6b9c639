//! The capture countdown as a plain state machine.
//!
//! Nothing in here sleeps or touches storage: [`CaptureSession::tick`] is
//! called once per elapsed second by the runner in `core::tracker` and tells
//! it what to do next.

use crate::config::{Config, DEFAULT_CAPTURE_INTERVAL_SECS, DEFAULT_WARNING_LEAD_SECS};
use crate::errors::AppResult;
use crate::models::coordinates::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTiming {
    /// Seconds between two punch-ins.
    pub interval_secs: u32,
    /// Remaining seconds at which the warning is raised.
    pub warning_at_secs: u32,
}

impl Default for CaptureTiming {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_CAPTURE_INTERVAL_SECS,
            warning_at_secs: DEFAULT_WARNING_LEAD_SECS,
        }
    }
}

impl CaptureTiming {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        cfg.validate()?;
        Ok(Self {
            interval_secs: cfg.capture_interval_secs,
            warning_at_secs: cfg.warning_lead_secs,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Active,
}

/// What a one-second tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Session not active, nothing changed.
    Idle,
    Counting,
    /// The countdown just reached the warning threshold.
    Warning,
    /// The countdown expired and was reset; a capture should be taken now.
    CaptureDue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSession {
    timing: CaptureTiming,
    state: CaptureState,
    remaining_secs: u32,
    warning_shown: bool,
    last_location: Option<Coordinates>,
    capture_count: u32,
    completed_cycles: u32,
    pending_captures: u32,
}

impl CaptureSession {
    pub fn new(timing: CaptureTiming) -> Self {
        Self {
            timing,
            state: CaptureState::Idle,
            remaining_secs: timing.interval_secs,
            warning_shown: false,
            last_location: None,
            capture_count: 0,
            completed_cycles: 0,
            pending_captures: 0,
        }
    }

    pub fn timing(&self) -> CaptureTiming {
        self.timing
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == CaptureState::Active
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn warning_shown(&self) -> bool {
        self.warning_shown
    }

    pub fn last_location(&self) -> Option<Coordinates> {
        self.last_location
    }

    pub fn capture_count(&self) -> u32 {
        self.capture_count
    }

    /// Countdowns that ran to zero since activation.
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Location queries started but not answered yet.
    pub fn pending_captures(&self) -> u32 {
        self.pending_captures
    }

    /// Idle → Active. Restarts the countdown and zeroes the counters.
    /// The caller is expected to take the first capture right away.
    pub fn activate(&mut self) {
        self.state = CaptureState::Active;
        self.remaining_secs = self.timing.interval_secs;
        self.warning_shown = false;
        self.capture_count = 0;
        self.completed_cycles = 0;
        self.pending_captures = 0;
    }

    /// Active → Idle. Persisted records are not affected.
    pub fn deactivate(&mut self) {
        self.state = CaptureState::Idle;
        self.capture_count = 0;
        self.pending_captures = 0;
    }

    pub fn tick(&mut self) -> Tick {
        if !self.is_active() {
            return Tick::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        let warned = self.remaining_secs == self.timing.warning_at_secs && !self.warning_shown;
        if warned {
            self.warning_shown = true;
        }

        if self.remaining_secs == 0 {
            self.remaining_secs = self.timing.interval_secs;
            self.warning_shown = false;
            self.completed_cycles += 1;
            return Tick::CaptureDue;
        }

        if warned { Tick::Warning } else { Tick::Counting }
    }

    /// A location was acquired and persisted.
    pub fn record_capture(&mut self, coords: Coordinates) {
        self.last_location = Some(coords);
        self.capture_count += 1;
    }

    /// A capture was handed off; the countdown keeps running meanwhile.
    pub fn capture_started(&mut self) {
        self.pending_captures += 1;
    }

    /// A handed-off capture came back, with the stored fix or `None` when
    /// no location was available.
    pub fn capture_finished(&mut self, fix: Option<Coordinates>) {
        self.pending_captures = self.pending_captures.saturating_sub(1);
        if let Some(coords) = fix {
            self.record_capture(coords);
        }
    }
}

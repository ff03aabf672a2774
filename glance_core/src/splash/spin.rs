// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Rotation for the coin (eased, per frame) and the album record (constant, per millisecond).
use std::time::{Duration, Instant};

/// Speeds are in degrees per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinParams {
    pub max_speed: f32,
    pub accel: f32,
    pub decel: f32,
}

impl SpinParams {
    pub const COIN: Self = Self {
        max_speed: 8.0,
        accel: 0.25,
        decel: 0.12,
    };
}

impl Default for SpinParams {
    fn default() -> Self {
        Self::COIN
    }
}

/// Upper bound on the frames of sustained hover needed to reach full speed from rest.
pub fn frames_to_max(params: &SpinParams) -> u32 {
    (params.max_speed / params.accel).ceil() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpinState {
    /// Degrees, always in `0.0..360.0`.
    pub angle: f32,
    /// Degrees per frame, always in `0.0..=max_speed`.
    pub speed: f32,
}

impl SpinState {
    /// Advances one frame: spin up while hovered, spin down otherwise.
    pub fn step(&mut self, hovered: bool, params: &SpinParams) {
        self.speed = if hovered {
            (self.speed + params.accel).min(params.max_speed)
        } else {
            (self.speed - params.decel).max(0.0)
        };
        self.angle = (self.angle + self.speed).rem_euclid(360.0);
    }

    pub fn is_resting(&self) -> bool {
        self.speed <= 0.0
    }
}

/// The frame rate the per-frame speeds were tuned for.
pub const FRAME: Duration = Duration::from_nanos(16_666_667);
/// A long stall (window hidden, debugger) is not replayed frame by frame.
const MAX_CATCH_UP: u32 = 30;

/// Turns wall-clock time into a whole number of fixed steps, carrying the remainder.
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    step: Duration,
    carried: Duration,
    last: Option<Instant>,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(FRAME)
    }
}

impl FixedStep {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            carried: Duration::ZERO,
            last: None,
        }
    }

    /// Number of steps due since the previous call. The first call returns 0.
    pub fn advance(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last.replace(now) else {
            return 0;
        };
        self.carried += now.saturating_duration_since(last);

        let due = self.carried.as_nanos() / self.step.as_nanos().max(1);
        let due = u32::try_from(due).unwrap_or(u32::MAX);
        if due > MAX_CATCH_UP {
            self.carried = Duration::ZERO;
            return MAX_CATCH_UP;
        }
        self.carried -= self.step * due;
        due
    }
}

pub const RECORD_DEGREES_PER_MS: f32 = 0.02;

/// Constant rotation of the record, paused while the pointer is over it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordSpin {
    angle: f32,
    last: Option<Instant>,
}

impl RecordSpin {
    /// Returns the angle to draw. Time spent hovered is skipped rather than
    /// caught up, so the record never jumps when the pointer leaves.
    pub fn update(&mut self, now: Instant, hovered: bool) -> f32 {
        if !hovered && let Some(last) = self.last {
            let elapsed_ms = now.saturating_duration_since(last).as_secs_f32() * 1000.0;
            self.angle = (self.angle + elapsed_ms * RECORD_DEGREES_PER_MS).rem_euclid(360.0);
        }
        self.last = Some(now);
        self.angle
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}

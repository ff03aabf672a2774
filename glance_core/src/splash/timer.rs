// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use std::time::{Duration, Instant};

/// A one-shot deadline driven by the caller's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timer {
    #[default]
    Idle,
    Running { started: Instant, deadline: Instant },
}

impl Timer {
    /// (Re)starts the timer. A running timer is replaced.
    pub fn start(&mut self, now: Instant, duration: Duration) {
        *self = Self::Running {
            started: now,
            deadline: now + duration,
        };
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_active(&self, now: Instant) -> bool {
        matches!(self, Self::Running { deadline, .. } if now < *deadline)
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match *self {
            Self::Running { deadline, .. } if now >= deadline => {
                *self = Self::Idle;
                true
            }
            _ => false,
        }
    }

    /// Fraction of the duration elapsed, in `0.0..=1.0`, while running.
    pub fn progress(&self, now: Instant) -> Option<f32> {
        let Self::Running { started, deadline } = *self else {
            return None;
        };
        let total = deadline.saturating_duration_since(started).as_secs_f32();
        if total <= 0.0 {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(started).as_secs_f32();
        Some((elapsed / total).clamp(0.0, 1.0))
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            Self::Running { deadline, .. } => Some(*deadline),
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_400: Duration = Duration::from_millis(400);

    #[test]
    fn test_timer_fires_once() {
        let start = Instant::now();
        let mut timer = Timer::default();
        assert!(!timer.poll(start));

        timer.start(start, MS_400);
        assert!(timer.is_active(start));
        assert!(!timer.poll(start + Duration::from_millis(399)));
        assert!(timer.poll(start + MS_400));
        assert!(!timer.poll(start + MS_400));
        assert_eq!(timer, Timer::Idle);
    }

    #[test]
    fn test_timer_progress() {
        let start = Instant::now();
        let mut timer = Timer::default();
        assert_eq!(timer.progress(start), None);

        timer.start(start, MS_400);
        assert_eq!(timer.progress(start), Some(0.0));
        let quarter = timer.progress(start + Duration::from_millis(100)).unwrap();
        assert!((quarter - 0.25).abs() < 1e-6);
        assert_eq!(timer.progress(start + Duration::from_secs(5)), Some(1.0));
        assert_eq!(timer.deadline(), Some(start + MS_400));
    }

    #[test]
    fn test_restart_extends_deadline() {
        let start = Instant::now();
        let mut timer = Timer::default();
        timer.start(start, MS_400);
        timer.start(start + Duration::from_millis(300), MS_400);
        assert!(!timer.poll(start + MS_400));
        assert!(timer.is_active(start + Duration::from_millis(500)));

        timer.cancel();
        assert!(!timer.is_active(start + Duration::from_millis(500)));
    }
}

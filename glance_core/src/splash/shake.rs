// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.

/// Horizontal offset and rotation of a shaking element at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShakeFrame {
    pub dx: f32,
    pub degrees: f32,
}

/// `(progress, dx, degrees)`. Offsets are for an amplitude of 1.
const KEYFRAMES: [(f32, f32, f32); 11] = [
    (0.0, 0.0, 0.0),
    (0.1, -2.0, -2.0),
    (0.2, 4.0, 2.0),
    (0.3, -8.0, -4.0),
    (0.4, 8.0, 4.0),
    (0.5, -8.0, -4.0),
    (0.6, 8.0, 4.0),
    (0.7, -8.0, -4.0),
    (0.8, 4.0, 2.0),
    (0.9, -2.0, -2.0),
    (1.0, 0.0, 0.0),
];

/// One swing of the hover rock: tilt right while drifting left, then back.
const ROCK_KEYFRAMES: [(f32, f32, f32); 4] = [
    (0.0, 0.0, 0.0),
    (0.25, -2.0, 5.0),
    (0.75, 2.0, -5.0),
    (1.0, 0.0, 0.0),
];

pub const ROCK_PERIOD_SECS: f32 = 0.4;

/// Samples the shake at `progress` (`0.0..=1.0`), interpolating linearly
/// between keyframes. `amplitude` scales the offset but not the rotation.
pub fn shake_offset(progress: f32, amplitude: f32) -> ShakeFrame {
    let frame = sample(&KEYFRAMES, progress);
    ShakeFrame {
        dx: frame.dx * amplitude,
        ..frame
    }
}

/// Samples the endless rock played while an element is hovered,
/// `elapsed_secs` after the hover began. Every other swing runs backwards.
pub fn rock_offset(elapsed_secs: f32) -> ShakeFrame {
    let swings = elapsed_secs.max(0.0) / ROCK_PERIOD_SECS;
    let progress = if swings as u64 % 2 == 0 {
        swings.fract()
    } else {
        1.0 - swings.fract()
    };
    sample(&ROCK_KEYFRAMES, progress)
}

fn sample(keyframes: &[(f32, f32, f32)], progress: f32) -> ShakeFrame {
    let progress = progress.clamp(0.0, 1.0);
    for pair in keyframes.windows(2) {
        let (from_t, from_dx, from_deg) = pair[0];
        let (to_t, to_dx, to_deg) = pair[1];
        if progress <= to_t {
            let t = (progress - from_t) / (to_t - from_t);
            return ShakeFrame {
                dx: from_dx + (to_dx - from_dx) * t,
                degrees: from_deg + (to_deg - from_deg) * t,
            };
        }
    }
    ShakeFrame::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-4, "{actual} != {expected}");
    }

    #[test]
    fn test_shake_hits_keyframes() {
        let frame = shake_offset(0.3, 1.0);
        assert_close(frame.dx, -8.0);
        assert_close(frame.degrees, -4.0);

        let frame = shake_offset(0.6, 1.92);
        assert_close(frame.dx, 15.36);
        assert_close(frame.degrees, 4.0);
    }

    #[test]
    fn test_shake_rests_at_ends() {
        assert_eq!(shake_offset(0.0, 1.0), ShakeFrame::default());
        assert_eq!(shake_offset(1.0, 1.0), ShakeFrame::default());
        assert_eq!(shake_offset(7.0, 1.0), ShakeFrame::default());
    }

    #[test]
    fn test_shake_interpolates() {
        let frame = shake_offset(0.15, 1.0);
        assert_close(frame.dx, 1.0);
        assert_close(frame.degrees, 0.0);
    }

    #[test]
    fn test_rock_swings_both_ways() {
        let frame = rock_offset(0.1);
        assert_close(frame.degrees, 5.0);
        assert_close(frame.dx, -2.0);

        let frame = rock_offset(0.3);
        assert_close(frame.degrees, -5.0);
        assert_close(frame.dx, 2.0);

        assert_close(rock_offset(0.0).degrees, 0.0);
        assert_close(rock_offset(-1.0).degrees, 0.0);
    }

    #[test]
    fn test_rock_alternates_direction() {
        // The second swing plays backwards, so it meets -5 degrees first.
        assert_close(rock_offset(ROCK_PERIOD_SECS + 0.1).degrees, -5.0);
        assert_close(rock_offset(ROCK_PERIOD_SECS + 0.3).degrees, 5.0);
        // And the third is forwards again.
        assert_close(rock_offset(2.0 * ROCK_PERIOD_SECS + 0.1).degrees, 5.0);
    }
}

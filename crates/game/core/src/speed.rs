//! Speed and turn timing.
//!
//! Speed 0 is the baseline of [`CombatConfig::BASE_TURN_TIME`] time units
//! between turns. Negative speed adds its magnitude to that interval; positive
//! speed shrinks it hyperbolically, approaching but never reaching zero.
//!
//! Formulas:
//! - speed = 0: 100
//! - speed < 0: 100 − speed
//! - speed > 0: 100² / (speed + 100)

use crate::config::CombatConfig;

/// Time units between two turns of a character moving at `speed`.
///
/// # Examples
/// - speed 0: 100
/// - speed −20: 120
/// - speed 100: 50
pub fn time_from_speed(speed: f64) -> f64 {
    let base = CombatConfig::BASE_TURN_TIME;
    if speed == 0.0 {
        base
    } else if speed < 0.0 {
        base - speed
    } else {
        base * base / (speed + base)
    }
}

/// Rescales a pending countdown after a speed change.
///
/// The fraction of the turn cycle still remaining is preserved rather than the
/// absolute time. An unchanged speed returns `next_turn` exactly.
pub fn change_next_turn(next_turn: f64, old_speed: f64, new_speed: f64) -> f64 {
    if old_speed == new_speed {
        return next_turn;
    }
    let old_time = time_from_speed(old_speed);
    let new_time = time_from_speed(new_speed);
    next_turn * new_time / old_time
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_speed_takes_one_hundred_units() {
        assert_eq!(time_from_speed(0.0), 100.0);
    }

    #[test]
    fn positive_speed_shortens_the_interval() {
        for speed in [0.001, 1.0, 10.0, 15.0, 100.0, 1e6] {
            let time = time_from_speed(speed);
            assert!(time < 100.0, "speed {speed}");
            assert!(time > 0.0, "speed {speed}");
        }
        assert_eq!(time_from_speed(100.0), 50.0);
    }

    #[test]
    fn negative_speed_lengthens_the_interval() {
        for speed in [-0.001, -1.0, -20.0, -500.0] {
            assert!(time_from_speed(speed) > 100.0, "speed {speed}");
        }
        assert_eq!(time_from_speed(-20.0), 120.0);
    }

    #[test]
    fn interval_is_monotonically_decreasing_in_speed() {
        let speeds = [-300.0, -50.0, -1.0, 0.0, 1.0, 50.0, 300.0];
        for pair in speeds.windows(2) {
            assert!(time_from_speed(pair[0]) > time_from_speed(pair[1]));
        }
    }

    #[test]
    fn unchanged_speed_keeps_the_countdown() {
        for speed in [-40.0, 0.0, 10.0, 250.0] {
            for next_turn in [0.0, 12.5, 99.0] {
                assert_eq!(change_next_turn(next_turn, speed, speed), next_turn);
            }
        }
    }

    #[test]
    fn speeding_up_preserves_remaining_fraction() {
        // Half of a 100-unit cycle left; at speed 100 the cycle is 50 units.
        assert_eq!(change_next_turn(50.0, 0.0, 100.0), 25.0);
    }
}

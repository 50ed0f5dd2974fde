//! Vector helpers for placing and moving things relative to the camera.
//!
//! These functions only take plain `glam` vectors so they can be exercised
//! without an ECS world.
use glam::{Vec2, Vec3};

/// Returns the point a hand held out in front of the camera would occupy.
///
/// The point sits `reach` along `forward` and `drop` below the camera.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use punchline::motion::hand_position;
/// let hand = hand_position(Vec3::ZERO, Vec3::NEG_Z, 0.5, 0.2);
/// assert!((hand - Vec3::new(0.0, -0.2, -0.5)).length() < 1e-6);
/// ```
#[must_use]
pub fn hand_position(camera: Vec3, forward: Vec3, reach: f32, drop: f32) -> Vec3 {
    camera + forward * reach + Vec3::new(0.0, -drop, 0.0)
}

/// Returns the spawn point `distance` in front of the camera, shifted by
/// `jitter` in world X/Y. Depth is never jittered.
///
/// # Examples
/// ```
/// use glam::{Vec2, Vec3};
/// use punchline::motion::spawn_position;
/// let at = spawn_position(Vec3::ZERO, Vec3::NEG_Z, 2.0, Vec2::new(0.5, 1.0));
/// assert!((at - Vec3::new(0.5, 1.0, -2.0)).length() < 1e-6);
/// ```
#[must_use]
pub fn spawn_position(camera: Vec3, forward: Vec3, distance: f32, jitter: Vec2) -> Vec3 {
    camera + forward * distance + jitter.extend(0.0)
}

/// Moves `position` toward `goal` by `speed` of the remaining distance.
///
/// Repeated calls approach `goal` exponentially rather than at a constant
/// velocity.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use punchline::motion::approach;
/// let next = approach(Vec3::new(0.0, 0.0, -2.0), Vec3::ZERO, 0.5);
/// assert!((next.z + 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn approach(position: Vec3, goal: Vec3, speed: f32) -> Vec3 {
    position.lerp(goal, speed)
}

/// Number of [`approach`] steps needed before `start_distance` shrinks below
/// `threshold`, or `None` if the distance never shrinks.
#[must_use]
pub fn steps_to_reach(start_distance: f32, threshold: f32, speed: f32) -> Option<u32> {
    if !(0.0..1.0).contains(&(1.0 - speed)) || threshold <= 0.0 {
        return None;
    }
    let mut distance = start_distance;
    let mut steps = 0_u32;
    while distance >= threshold {
        distance *= 1.0 - speed;
        steps = steps.checked_add(1)?;
    }
    Some(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn hand_tracks_camera_orientation() {
        let hand = hand_position(Vec3::new(1.0, 1.6, 0.0), Vec3::X, 0.5, 0.2);
        assert_relative_eq!(hand.x, 1.5);
        assert_relative_eq!(hand.y, 1.4);
        assert_relative_eq!(hand.z, 0.0);
    }

    #[rstest]
    fn spawn_keeps_depth_unjittered() {
        let at = spawn_position(Vec3::ZERO, Vec3::NEG_Z, 2.0, Vec2::new(-0.75, 1.5));
        assert_relative_eq!(at.z, -2.0);
        assert_relative_eq!(at.x, -0.75);
        assert_relative_eq!(at.y, 1.5);
    }

    #[rstest]
    #[case(0.02)]
    #[case(0.015)]
    #[case(0.025)]
    fn approach_shrinks_distance_by_speed(#[case] speed: f32) {
        let start = Vec3::new(0.0, 0.0, -2.0);
        let next = approach(start, Vec3::ZERO, speed);
        assert_relative_eq!(next.length(), 2.0 * (1.0 - speed), epsilon = 1e-6);
    }

    #[rstest]
    #[case::regular(0.02, 94)]
    #[case::danger(0.025, 75)]
    fn steps_match_closed_form(#[case] speed: f32, #[case] expected: u32) {
        assert_eq!(steps_to_reach(2.0, 0.3, speed), Some(expected));
    }

    #[rstest]
    fn steps_reject_non_converging_speed() {
        assert_eq!(steps_to_reach(2.0, 0.3, 0.0), None);
        assert_eq!(steps_to_reach(2.0, 0.0, 0.5), None);
    }
}

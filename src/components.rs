//! ECS component types used by the game.
//! Includes the target record, its spin state and the camera marker shared between systems.
use std::time::Duration;

use bevy::prelude::*;

use crate::archetype::{Archetype, TargetShape};

/// A live target drifting toward the player.
///
/// Point value, speed and scale come from [`Archetype::profile`].
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct Target {
    /// Which kind of target this is.
    pub archetype: Archetype,
    /// Session clock reading when the target spawned.
    pub spawned_at: Duration,
    /// Monotonic spawn counter; higher values spawned later.
    pub sequence: u64,
}

impl Target {
    /// Time the target has been alive at session time `now`.
    #[must_use]
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawned_at)
    }
}

/// Accumulated Euler rotation of a target, in radians.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component, Default)]
pub struct Spin {
    /// Rotation about the X axis.
    pub x: f32,
    /// Rotation about the Y axis.
    pub y: f32,
}

impl Spin {
    /// Adds one tick of rotation and returns the resulting orientation.
    pub fn advance(&mut self, dx: f32, dy: f32) -> Quat {
        self.x += dx;
        self.y += dy;
        self.rotation()
    }

    /// Orientation for the accumulated angles, applied X then Y.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, 0.0)
    }
}

/// Marker for the camera whose pose the AR runtime drives.
///
/// Targets spawn in front of it and move toward it; the hand proxy hangs
/// off it. There is exactly one such entity.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct XrCamera;

/// Bundle of components for a freshly spawned target.
#[derive(Bundle)]
pub struct TargetBundle {
    /// Gameplay record.
    pub target: Target,
    /// Visual spin.
    pub spin: Spin,
    /// World-space placement, scaled by the archetype.
    pub transform: Transform,
    /// Human-readable name for debugging.
    pub name: Name,
}

impl TargetBundle {
    /// Creates a target bundle at `position`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use bevy::prelude::*;
    /// use punchline::{Archetype, TargetBundle};
    ///
    /// let bundle = TargetBundle::new(Archetype::Explosive, Vec3::new(0.0, 0.5, -2.0), Duration::ZERO, 3);
    /// assert_eq!(bundle.name.as_str(), "Explosive#3");
    /// assert!((bundle.transform.scale.x - 1.2).abs() < f32::EPSILON);
    /// ```
    #[must_use]
    pub fn new(archetype: Archetype, position: Vec3, spawned_at: Duration, sequence: u64) -> Self {
        let profile = archetype.profile();
        let scale = match profile.shape {
            TargetShape::Sphere => profile.scale,
            TargetShape::Ring => 1.0,
        };
        Self {
            target: Target {
                archetype,
                spawned_at,
                sequence,
            },
            spin: Spin::default(),
            transform: Transform::from_translation(position)
                .with_scale(Vec3::splat(scale)),
            name: Name::new(format!("{}#{sequence}", archetype.label())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn age_saturates_before_spawn() {
        let target = Target {
            archetype: Archetype::Regular,
            spawned_at: Duration::from_secs(5),
            sequence: 0,
        };
        assert_eq!(target.age(Duration::from_secs(2)), Duration::ZERO);
        assert_eq!(target.age(Duration::from_secs(7)), Duration::from_secs(2));
    }

    #[rstest]
    fn spin_accumulates_per_tick() {
        let mut spin = Spin::default();
        spin.advance(0.02, 0.03);
        spin.advance(0.02, 0.03);
        assert!((spin.x - 0.04).abs() < 1e-6);
        assert!((spin.y - 0.06).abs() < 1e-6);
    }

    #[rstest]
    fn regular_bundle_keeps_unit_scale() {
        let bundle = TargetBundle::new(Archetype::Regular, Vec3::ZERO, Duration::ZERO, 0);
        assert_eq!(bundle.transform.scale, Vec3::ONE);
    }

    #[rstest]
    fn ring_bundle_is_unscaled() {
        let bundle = TargetBundle::new(Archetype::Bonus, Vec3::ZERO, Duration::ZERO, 0);
        assert_eq!(bundle.transform.scale, Vec3::ONE);
    }

    #[rstest]
    fn sphere_bundle_takes_archetype_scale() {
        let bundle = TargetBundle::new(Archetype::Danger, Vec3::ZERO, Duration::ZERO, 0);
        assert_eq!(bundle.transform.scale, Vec3::splat(1.1));
    }
}

//! Simulated hand tracking and the punch gate.
//!
//! The hand proxy stands in for real hand tracking: it hangs a fixed
//! distance in front of and below the camera. Punching samples that point,
//! subject to a cooldown, and announces it as a [`Punch`] event. The proxy
//! never looks at targets; whoever observes [`Punch`] decides what was hit.

use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::debug;

use crate::components::XrCamera;
use crate::motion::hand_position;
use crate::session::{Session, SessionReset};
use crate::settings::GameSettings;

/// A punch that passed the cooldown gate.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Punch {
    /// Hand position at the moment of the punch.
    pub position: Vec3,
}

/// The player pressed the screen (or mouse button).
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerDown;

/// Tracks the simulated hand and rate-limits punches.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HandProxy {
    position: Vec3,
    last_punch: Option<Duration>,
    cooldown: Duration,
    reach: f32,
    drop: f32,
}

impl Default for HandProxy {
    fn default() -> Self {
        Self::from_settings(&GameSettings::default())
    }
}

impl HandProxy {
    /// Builds a proxy using the reach, drop and cooldown from `settings`.
    #[must_use]
    pub const fn from_settings(settings: &GameSettings) -> Self {
        Self {
            position: Vec3::ZERO,
            last_punch: None,
            cooldown: settings.punch_cooldown(),
            reach: settings.hand_reach,
            drop: settings.hand_drop,
        }
    }

    /// Current hand position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Time of the last successful punch, if any.
    #[must_use]
    pub const fn last_punch(&self) -> Option<Duration> {
        self.last_punch
    }

    /// Recomputes the hand position from the camera pose.
    pub fn update(&mut self, camera: &Transform) {
        self.position = hand_position(
            camera.translation,
            *camera.forward(),
            self.reach,
            self.drop,
        );
    }

    /// Attempts a punch at time `now`.
    ///
    /// Succeeds when no punch has landed yet or at least the cooldown has
    /// passed since the last successful one. A refused punch does not reset
    /// the cooldown.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use punchline::HandProxy;
    ///
    /// let mut hand = HandProxy::default();
    /// assert!(hand.punch(Duration::from_millis(1_000)).is_some());
    /// assert!(hand.punch(Duration::from_millis(1_299)).is_none());
    /// assert!(hand.punch(Duration::from_millis(1_300)).is_some());
    /// ```
    pub fn punch(&mut self, now: Duration) -> Option<Punch> {
        if let Some(last) = self.last_punch {
            if now.saturating_sub(last) < self.cooldown {
                return None;
            }
        }
        self.last_punch = Some(now);
        Some(Punch {
            position: self.position,
        })
    }

    /// Forgets the last punch so the next attempt always succeeds.
    pub fn reset(&mut self) {
        self.last_punch = None;
    }
}

/// Recomputes the hand position once per frame from the XR camera.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Query` by value."
)]
pub fn update_hand_proxy_system(
    mut hand: ResMut<HandProxy>,
    camera: Query<&Transform, With<XrCamera>>,
) {
    let Ok(transform) = camera.single() else {
        return;
    };
    hand.update(transform);
}

/// Turns pointer presses into punches while a session is running.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub(crate) fn punch_on_pointer_down(
    _event: On<PointerDown>,
    mut commands: Commands,
    mut hand: ResMut<HandProxy>,
    session: Res<Session>,
    time: Res<Time>,
) {
    if !session.is_active() {
        return;
    }
    match hand.punch(time.elapsed()) {
        Some(punch) => {
            debug!("punch at {:?}", punch.position);
            commands.trigger(punch);
        }
        None => debug!("punch ignored: still cooling down"),
    }
}

pub(crate) fn reset_hand_on_session_reset(_event: On<SessionReset>, mut hand: ResMut<HandProxy>) {
    hand.reset();
}

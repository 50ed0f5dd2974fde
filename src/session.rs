//! Session state and the game controller flow.
//!
//! A session runs from a successful AR start until game over or restart.
//! [`Session`] holds the score, the session clock and the current phase;
//! the observers here react to start, restart, score and game-over events.

use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, error, info};

use crate::constants::AR_UNAVAILABLE_NOTICE;
use crate::settings::GameSettings;
use crate::xr::{SessionRequest, XrRuntime};

/// Lifecycle phase of the game.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the player to start an AR session.
    #[default]
    Idle,
    /// Targets spawn and the clock runs.
    Running,
    /// A danger target got through; the final score is on display.
    GameOver,
}

/// Score, clock and phase of the current session.
#[derive(Resource, Reflect, Debug, Clone, Default, PartialEq, Eq)]
#[reflect(Resource, Default)]
pub struct Session {
    score: u32,
    elapsed: Duration,
    phase: SessionPhase,
}

impl Session {
    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Session clock: time played so far, advanced one tick at a time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the game is being played.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Clears score and clock and enters [`SessionPhase::Running`].
    pub fn begin(&mut self) {
        *self = Self {
            phase: SessionPhase::Running,
            ..Self::default()
        };
    }

    /// Clears score and clock and returns to [`SessionPhase::Idle`].
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advances the session clock by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Adds `delta` to the score, clamping at zero. Returns the new score.
    ///
    /// # Examples
    ///
    /// ```
    /// use punchline::Session;
    ///
    /// let mut session = Session::default();
    /// assert_eq!(session.apply_score(10), 10);
    /// assert_eq!(session.apply_score(-20), 0);
    /// ```
    pub fn apply_score(&mut self, delta: i32) -> u32 {
        let next = i64::from(self.score).saturating_add(i64::from(delta)).max(0);
        self.score = u32::try_from(next).unwrap_or(u32::MAX);
        self.score
    }

    /// Ends a running session. Returns `false` if it was not running, so
    /// repeated game-over signals have no further effect.
    pub fn end(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = SessionPhase::GameOver;
        true
    }
}

/// Score delta produced by a punch or a blast.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChanged {
    /// Points to add; negative values subtract.
    pub delta: i32,
}

/// A danger target reached the player.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOver;

/// The player pressed the start control.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartRequested;

/// The player pressed restart on the game-over overlay.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestartRequested;

/// Score and clock were cleared; per-session state elsewhere should follow.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionReset;

/// A message the player needs to see, such as a failed AR start.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SessionNotice {
    /// Text to show.
    pub message: String,
}

/// Run condition: the game is being played.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy run conditions take `Res<T>` by value."
)]
#[must_use]
pub fn session_running(session: Res<Session>) -> bool {
    session.is_active()
}

/// Advances the session clock by one tick.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn advance_session_clock(mut session: ResMut<Session>, settings: Res<GameSettings>) {
    session.advance(settings.tick_interval());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub(crate) fn apply_score_change(event: On<ScoreChanged>, mut session: ResMut<Session>) {
    let delta = event.event().delta;
    let score = session.apply_score(delta);
    debug!("score {delta:+} -> {score}");
}

pub(crate) fn end_on_game_over(_event: On<GameOver>, mut session: ResMut<Session>) {
    if session.end() {
        info!(
            "game over after {:.1}s with score {}",
            session.elapsed().as_secs_f32(),
            session.score()
        );
    } else {
        debug!("game over ignored: session already ended");
    }
}

pub(crate) fn start_on_request(
    _event: On<StartRequested>,
    mut commands: Commands,
    mut runtime: ResMut<XrRuntime>,
    mut session: ResMut<Session>,
) {
    if session.phase() != SessionPhase::Idle {
        debug!("start ignored: session is {:?}", session.phase());
        return;
    }

    match runtime.start(&SessionRequest::immersive_ar()) {
        Ok(xr) => {
            info!(
                "AR session started (features: {})",
                xr.enabled_features.join(", ")
            );
            session.begin();
            commands.trigger(SessionReset);
        }
        Err(err) => {
            error!("failed to start AR session: {err}");
            commands.trigger(SessionNotice {
                message: AR_UNAVAILABLE_NOTICE.to_owned(),
            });
        }
    }
}

pub(crate) fn restart_on_request(
    _event: On<RestartRequested>,
    mut commands: Commands,
    mut runtime: ResMut<XrRuntime>,
    mut session: ResMut<Session>,
) {
    if session.is_active() {
        debug!("restart ignored: session is {:?}", session.phase());
        return;
    }
    runtime.end();
    session.reset();
    info!("session restarted");
    commands.trigger(SessionReset);
}

//! Headless model of the heads-up display.
//!
//! [`HudState`] is what the player should see: score and timer text, which
//! overlay is up, and any notice. It is rebuilt from [`Session`] every
//! frame, so the presentation layer only copies strings and flags.

use bevy::ecs::prelude::On;
use bevy::prelude::*;

use crate::session::{Session, SessionNotice, SessionPhase, SessionReset};

/// Text and visibility of every HUD element.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct HudState {
    /// Running score, e.g. `SCORE: 40`.
    pub score_text: String,
    /// Session clock with one decimal, e.g. `TIME: 12.3s`.
    pub timer_text: String,
    /// Whether the start control is shown.
    pub start_visible: bool,
    /// Whether the game-over overlay is shown.
    pub game_over_visible: bool,
    /// Final score on the game-over overlay.
    pub final_score_text: String,
    /// Message for the player, such as a failed AR start.
    pub notice: Option<String>,
}

impl Default for HudState {
    fn default() -> Self {
        let mut hud = Self {
            score_text: String::new(),
            timer_text: String::new(),
            start_visible: true,
            game_over_visible: false,
            final_score_text: String::new(),
            notice: None,
        };
        hud.sync(&Session::default());
        hud
    }
}

impl HudState {
    /// Refreshes every element from `session`. The notice is left alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use punchline::{HudState, Session};
    ///
    /// let mut session = Session::default();
    /// session.begin();
    /// session.apply_score(40);
    /// let mut hud = HudState::default();
    /// hud.sync(&session);
    /// assert_eq!(hud.score_text, "SCORE: 40");
    /// assert_eq!(hud.timer_text, "TIME: 0.0s");
    /// assert!(!hud.start_visible);
    /// ```
    pub fn sync(&mut self, session: &Session) {
        self.score_text = format!("SCORE: {}", session.score());
        self.timer_text = format!("TIME: {:.1}s", session.elapsed().as_secs_f32());
        self.start_visible = session.phase() == SessionPhase::Idle;
        self.game_over_visible = session.phase() == SessionPhase::GameOver;
        self.final_score_text = session.score().to_string();
    }
}

/// Rebuilds [`HudState`] when the session changed.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn sync_hud_system(session: Res<Session>, mut hud: ResMut<HudState>) {
    if session.is_changed() {
        hud.sync(&session);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub(crate) fn show_notice(event: On<SessionNotice>, mut hud: ResMut<HudState>) {
    hud.notice = Some(event.event().message.clone());
}

pub(crate) fn clear_notice_on_reset(_event: On<SessionReset>, mut hud: ResMut<HudState>) {
    hud.notice = None;
}

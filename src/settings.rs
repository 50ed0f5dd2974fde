//! Runtime configuration for the game.
//!
//! `GameSettings` carries every tunable the systems read. Defaults come from
//! [`crate::constants`]; a JSON file may override any subset of fields.

use std::path::Path;
use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    BLAST_POINTS, BLAST_RADIUS, CAMERA_PROXIMITY, HAND_DROP, HAND_REACH, HIT_RADIUS,
    PUNCH_COOLDOWN_MS, SPAWN_CHANCE, SPAWN_DISTANCE, SPAWN_HORIZONTAL_SPREAD, SPAWN_RATE_FLOOR,
    SPAWN_RATE_RAMP, SPAWN_RATE_START, SPAWN_VERTICAL_SPREAD, SPIN_X_PER_TICK, SPIN_Y_PER_TICK,
    TARGET_LIFETIME_MS, TICK_INTERVAL_MS,
};

/// Errors raised while loading or validating [`GameSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The settings document is not valid JSON for [`GameSettings`].
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the game cannot run with.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Tunable parameters for the tick, hand proxy and targets.
///
/// # Examples
///
/// ```
/// use punchline::settings::GameSettings;
///
/// let settings = GameSettings::from_json(r#"{ "seed": 42 }"#).unwrap();
/// assert_eq!(settings.seed, Some(42));
/// assert_eq!(settings.punch_cooldown_ms, 300);
/// ```
#[derive(Resource, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameSettings {
    /// Milliseconds between game ticks.
    pub tick_interval_ms: u64,
    /// Milliseconds a punch must wait after the previous successful one.
    pub punch_cooldown_ms: u64,
    /// Distance of the hand proxy in front of the camera.
    pub hand_reach: f32,
    /// Downward offset of the hand proxy.
    pub hand_drop: f32,
    /// Distance of freshly spawned targets in front of the camera.
    pub spawn_distance: f32,
    /// Width of the horizontal spawn jitter.
    pub spawn_horizontal_spread: f32,
    /// Height of the vertical spawn jitter.
    pub spawn_vertical_spread: f32,
    /// Radius within which a punch hits a target.
    pub hit_radius: f32,
    /// Distance to the camera at which a target expires.
    pub camera_proximity: f32,
    /// Milliseconds a target may live.
    pub target_lifetime_ms: u64,
    /// Radius cleared by an explosive target.
    pub blast_radius: f32,
    /// Score per target caught in a blast.
    pub blast_points: i32,
    /// Rotation about X per tick, in radians.
    pub spin_x_per_tick: f32,
    /// Rotation about Y per tick, in radians.
    pub spin_y_per_tick: f32,
    /// Spawn rate at the start of a session.
    pub spawn_rate_start: f32,
    /// Spawn rate reduction per elapsed second.
    pub spawn_rate_ramp: f32,
    /// Lower bound of the spawn rate.
    pub spawn_rate_floor: f32,
    /// Numerator of the per-tick spawn probability.
    pub spawn_chance: f32,
    /// Seed for target draws. `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            punch_cooldown_ms: PUNCH_COOLDOWN_MS,
            hand_reach: HAND_REACH,
            hand_drop: HAND_DROP,
            spawn_distance: SPAWN_DISTANCE,
            spawn_horizontal_spread: SPAWN_HORIZONTAL_SPREAD,
            spawn_vertical_spread: SPAWN_VERTICAL_SPREAD,
            hit_radius: HIT_RADIUS,
            camera_proximity: CAMERA_PROXIMITY,
            target_lifetime_ms: TARGET_LIFETIME_MS,
            blast_radius: BLAST_RADIUS,
            blast_points: BLAST_POINTS,
            spin_x_per_tick: SPIN_X_PER_TICK,
            spin_y_per_tick: SPIN_Y_PER_TICK,
            spawn_rate_start: SPAWN_RATE_START,
            spawn_rate_ramp: SPAWN_RATE_RAMP,
            spawn_rate_floor: SPAWN_RATE_FLOOR,
            spawn_chance: SPAWN_CHANCE,
            seed: None,
        }
    }
}

impl GameSettings {
    /// Parses settings from a JSON document and validates them.
    ///
    /// Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`SettingsError::Parse`] for malformed JSON or unknown fields
    /// and [`SettingsError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads and validates settings from a JSON file.
    ///
    /// # Errors
    /// Returns [`SettingsError::Read`] if the file cannot be read, otherwise
    /// the errors of [`GameSettings::from_json`].
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks that every value keeps the game well defined.
    ///
    /// # Errors
    /// Returns [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be positive"));
        }
        if self.target_lifetime_ms == 0 {
            return Err(invalid("target_lifetime_ms", "must be positive"));
        }
        for (field, value) in [
            ("hit_radius", self.hit_radius),
            ("camera_proximity", self.camera_proximity),
            ("blast_radius", self.blast_radius),
            ("spawn_distance", self.spawn_distance),
            ("spawn_rate_floor", self.spawn_rate_floor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, "must be a positive number"));
            }
        }
        for (field, value) in [
            ("hand_reach", self.hand_reach),
            ("hand_drop", self.hand_drop),
            ("spawn_horizontal_spread", self.spawn_horizontal_spread),
            ("spawn_vertical_spread", self.spawn_vertical_spread),
            ("spawn_rate_ramp", self.spawn_rate_ramp),
            ("spawn_chance", self.spawn_chance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if self.spawn_rate_start < self.spawn_rate_floor {
            return Err(invalid(
                "spawn_rate_start",
                "must not be below spawn_rate_floor",
            ));
        }
        Ok(())
    }

    /// Interval between ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Cooldown between punches.
    #[must_use]
    pub const fn punch_cooldown(&self) -> Duration {
        Duration::from_millis(self.punch_cooldown_ms)
    }

    /// Maximum target age.
    #[must_use]
    pub const fn target_lifetime(&self) -> Duration {
        Duration::from_millis(self.target_lifetime_ms)
    }

    /// Probability that a tick spawns a target after `elapsed` of play.
    ///
    /// The spawn rate falls linearly with time down to the floor, so the
    /// probability rises until the floor is reached.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use punchline::settings::GameSettings;
    ///
    /// let settings = GameSettings::default();
    /// let early = settings.spawn_probability(Duration::ZERO);
    /// let late = settings.spawn_probability(Duration::from_secs(600));
    /// assert!((early - 0.05).abs() < 1e-6);
    /// assert!((late - 0.1 / 0.3).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn spawn_probability(&self, elapsed: Duration) -> f32 {
        let rate = (self.spawn_rate_start - elapsed.as_secs_f32() * self.spawn_rate_ramp)
            .max(self.spawn_rate_floor);
        self.spawn_chance / rate
    }
}

const fn invalid(field: &'static str, reason: &'static str) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

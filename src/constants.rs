//! Game tuning constants used across systems.
//!
//! These are the defaults behind [`crate::settings::GameSettings`]. Distances
//! are in metres, durations in milliseconds.

/// Interval between game ticks.
pub const TICK_INTERVAL_MS: u64 = 100;
/// Minimum time between two successful punches.
pub const PUNCH_COOLDOWN_MS: u64 = 300;
/// Distance in front of the camera at which the hand proxy sits.
pub const HAND_REACH: f32 = 0.5;
/// Downward offset applied to the hand proxy.
pub const HAND_DROP: f32 = 0.2;
/// Distance in front of the camera at which targets spawn.
pub const SPAWN_DISTANCE: f32 = 2.0;
/// Full width of the horizontal spawn jitter, centred on the view axis.
pub const SPAWN_HORIZONTAL_SPREAD: f32 = 1.5;
/// Height of the vertical spawn jitter, measured upward from the view axis.
pub const SPAWN_VERTICAL_SPREAD: f32 = 1.5;
/// Radius within which a punch connects with a target.
pub const HIT_RADIUS: f32 = 0.3;
/// Distance to the camera below which a target expires.
pub const CAMERA_PROXIMITY: f32 = 0.3;
/// Age after which a target expires without effect.
pub const TARGET_LIFETIME_MS: u64 = 10_000;
/// Radius cleared when an explosive target is punched.
pub const BLAST_RADIUS: f32 = 0.8;
/// Flat score awarded for every target caught in a blast.
pub const BLAST_POINTS: i32 = 10;
/// Per-tick rotation about the X axis, in radians.
pub const SPIN_X_PER_TICK: f32 = 0.02;
/// Per-tick rotation about the Y axis, in radians.
pub const SPIN_Y_PER_TICK: f32 = 0.03;
/// Spawn rate at the start of a session.
pub const SPAWN_RATE_START: f32 = 2.0;
/// Reduction of the spawn rate per elapsed second.
pub const SPAWN_RATE_RAMP: f32 = 0.02;
/// Lowest spawn rate reached as the session goes on.
pub const SPAWN_RATE_FLOOR: f32 = 0.3;
/// Numerator of the per-tick spawn probability.
pub const SPAWN_CHANCE: f32 = 0.1;
/// Message shown when no AR session can be obtained.
pub const AR_UNAVAILABLE_NOTICE: &str = "AR not supported on this device.";

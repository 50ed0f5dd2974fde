//! Target archetypes and their fixed gameplay parameters.
//!
//! Every target is one of four kinds. The kind decides how the target looks,
//! how fast it closes in on the player and what it is worth when punched.

use bevy::prelude::*;

/// Geometry used to draw a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    /// A sphere scaled by the archetype's scale factor.
    Sphere,
    /// A flat ring of fixed size, used for bonus targets.
    Ring,
}

/// Fixed parameters attached to an [`Archetype`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    /// sRGB colour as `0xRRGGBB`.
    pub color: u32,
    /// Score delta applied when the target is punched. May be negative.
    pub points: i32,
    /// Fraction of the remaining distance to the camera covered per tick.
    pub speed: f32,
    /// Uniform scale multiplier of the target mesh. Rings ignore it.
    pub scale: f32,
    /// Mesh shape.
    pub shape: TargetShape,
}

/// The four kinds of target.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Common target worth a small reward.
    Regular,
    /// Slow, large target worth a big reward.
    Bonus,
    /// Penalises the player when punched and ends the game when missed.
    Danger,
    /// Clears nearby targets when punched.
    Explosive,
}

const REGULAR: ArchetypeProfile = ArchetypeProfile {
    color: 0x00B4FF,
    points: 10,
    speed: 0.02,
    scale: 1.0,
    shape: TargetShape::Sphere,
};

const BONUS: ArchetypeProfile = ArchetypeProfile {
    color: 0xFFD700,
    points: 50,
    speed: 0.015,
    scale: 1.3,
    shape: TargetShape::Ring,
};

const DANGER: ArchetypeProfile = ArchetypeProfile {
    color: 0xFF2D00,
    points: -20,
    speed: 0.025,
    scale: 1.1,
    shape: TargetShape::Sphere,
};

const EXPLOSIVE: ArchetypeProfile = ArchetypeProfile {
    color: 0xFF8C00,
    points: 30,
    speed: 0.02,
    scale: 1.2,
    shape: TargetShape::Sphere,
};

/// Upper bounds of the cumulative draw ranges, in roll order.
const ROLL_TABLE: [(f32, Archetype); 3] = [
    (0.10, Archetype::Bonus),
    (0.15, Archetype::Danger),
    (0.20, Archetype::Explosive),
];

impl Archetype {
    /// All archetypes, in declaration order.
    pub const ALL: [Self; 4] = [Self::Regular, Self::Bonus, Self::Danger, Self::Explosive];

    /// Returns the fixed parameters of this archetype.
    #[must_use]
    pub const fn profile(self) -> &'static ArchetypeProfile {
        match self {
            Self::Regular => &REGULAR,
            Self::Bonus => &BONUS,
            Self::Danger => &DANGER,
            Self::Explosive => &EXPLOSIVE,
        }
    }

    /// Maps a uniform draw in `[0, 1)` to an archetype.
    ///
    /// Bonus covers `[0, 0.10)`, Danger `[0.10, 0.15)`, Explosive
    /// `[0.15, 0.20)` and Regular the rest.
    ///
    /// # Examples
    ///
    /// ```
    /// use punchline::Archetype;
    ///
    /// assert_eq!(Archetype::from_roll(0.05), Archetype::Bonus);
    /// assert_eq!(Archetype::from_roll(0.12), Archetype::Danger);
    /// assert_eq!(Archetype::from_roll(0.15), Archetype::Explosive);
    /// assert_eq!(Archetype::from_roll(0.2), Archetype::Regular);
    /// ```
    #[must_use]
    pub fn from_roll(roll: f32) -> Self {
        ROLL_TABLE
            .iter()
            .find(|(upper, _)| roll < *upper)
            .map_or(Self::Regular, |(_, archetype)| *archetype)
    }

    /// Human-readable name used for entity names and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Bonus => "Bonus",
            Self::Danger => "Danger",
            Self::Explosive => "Explosive",
        }
    }
}

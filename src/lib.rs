#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the Punchline game logic.
//!
//! Targets spawn in front of the AR camera and drift toward the player, who
//! punches them with a hand proxy hanging below the view. Regular, bonus and
//! explosive targets score; a danger target reaching the player ends the
//! session. [`PunchlinePlugin`] installs the headless game; the `render`
//! feature adds [`presentation::PresentationPlugin`] for meshes, input and UI.
pub mod archetype;
pub mod components;
pub mod constants;
pub mod hand;
pub mod hud;
pub mod logging;
pub mod motion;
pub mod plugin;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod session;
pub mod settings;
pub mod targets;
pub mod xr;
pub use constants::*;

// Re-export commonly used items
pub use archetype::{Archetype, ArchetypeProfile, TargetShape};
pub use components::{Spin, Target, TargetBundle, XrCamera};
pub use hand::{HandProxy, PointerDown, Punch};
pub use hud::HudState;
pub use logging::init as init_logging;
pub use plugin::{PunchlinePlugin, TickSet};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use session::{
    GameOver, RestartRequested, ScoreChanged, Session, SessionNotice, SessionPhase, SessionReset,
    StartRequested,
};
pub use settings::{GameSettings, SettingsError};
pub use targets::{Hit, SpawnSequence, SpawnTarget, TargetManager, TargetRng, UpdateReport};
pub use xr::{SimulatedXr, UnavailableXr, XrError, XrRuntime, XrSessionProvider};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use punchline::prelude::*;
    //! ```

    pub use crate::Archetype;
    pub use crate::GameSettings;
    pub use crate::HandProxy;
    pub use crate::PunchlinePlugin;
    pub use crate::Session;
    pub use crate::SpawnTarget;
    pub use crate::TargetManager;
    pub use crate::XrRuntime;
}

//! Logger bootstrap for the game binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages such as target spawns and
/// removals are printed. Otherwise only info level and above are shown.
/// `RUST_LOG` takes precedence over both.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    #[expect(
        clippy::let_underscore_must_use,
        reason = "A second logger installation is harmless and expected in tests."
    )]
    let _ = builder.try_init();
}

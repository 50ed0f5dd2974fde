use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use log::info;
use punchline::{
    init_logging, GameSettings, PresentationPlugin, PunchlinePlugin, UnavailableXr, XrRuntime,
};

/// An augmented-reality target punching arcade game
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file overriding the default game settings
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Seed for target spawning, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Behave like a device without AR support
    #[arg(long)]
    no_xr: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = match &args.settings {
        Some(path) => GameSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => GameSettings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    info!("starting punchline (seed: {:?})", settings.seed);

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .insert_resource(settings);
    if args.no_xr {
        app.insert_resource(XrRuntime::new(UnavailableXr));
    }
    app.add_plugins((PunchlinePlugin, PresentationPlugin)).run();
    Ok(())
}

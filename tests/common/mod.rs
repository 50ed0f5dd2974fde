//! Shared headless harness for game integration tests.
//!
//! The harness builds an `App` with only `PunchlinePlugin` and runs its
//! schedules by hand, so ticks, frames and the punch clock advance exactly
//! when a test says so.

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use punchline::{
    Archetype, GameOver, GameSettings, HandProxy, HudState, PointerDown, PunchlinePlugin,
    RestartRequested, ScoreChanged, Session, SessionNotice, SpawnTarget, StartRequested, Target,
    TargetRng, XrRuntime,
};

/// Score deltas, game-over signals and notices seen so far.
#[derive(Resource, Default, Debug)]
pub struct CapturedEvents {
    pub score_deltas: Vec<i32>,
    pub game_overs: usize,
    pub notices: Vec<String>,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_score(event: On<ScoreChanged>, mut captured: ResMut<CapturedEvents>) {
    captured.score_deltas.push(event.event().delta);
}

fn record_game_over(_event: On<GameOver>, mut captured: ResMut<CapturedEvents>) {
    captured.game_overs += 1;
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_notice(event: On<SessionNotice>, mut captured: ResMut<CapturedEvents>) {
    captured.notices.push(event.event().message.clone());
}

/// Settings with random spawning switched off and a fixed seed.
#[must_use]
pub fn quiet_settings() -> GameSettings {
    GameSettings {
        spawn_chance: 0.0,
        seed: Some(7),
        ..GameSettings::default()
    }
}

/// Builder for test `App` instances running the game headlessly.
pub struct GameHarnessBuilder {
    app: App,
}

impl GameHarnessBuilder {
    /// Starts from [`quiet_settings`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(quiet_settings())
    }

    /// Starts from `settings`; the target RNG is seeded from them.
    #[must_use]
    pub fn with_settings(settings: GameSettings) -> Self {
        let mut app = App::new();
        app.insert_resource(settings);
        Self { app }
    }

    /// Replaces the AR runtime.
    #[must_use]
    pub fn with_xr(mut self, runtime: XrRuntime) -> Self {
        self.app.insert_resource(runtime);
        self
    }

    /// Installs the plugin and event capture, then runs startup.
    #[must_use]
    pub fn build(mut self) -> GameHarness {
        if let Some(seed) = self.app.world().resource::<GameSettings>().seed {
            self.app.insert_resource(TargetRng::seeded(seed));
        }
        self.app.add_plugins(PunchlinePlugin);
        self.app.init_resource::<CapturedEvents>();
        self.app.add_observer(record_score);
        self.app.add_observer(record_game_over);
        self.app.add_observer(record_notice);
        self.app.world_mut().run_schedule(Startup);
        GameHarness { app: self.app }
    }
}

impl Default for GameHarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A headless game driven one schedule at a time.
pub struct GameHarness {
    app: App,
}

impl GameHarness {
    /// Harness with [`quiet_settings`].
    #[must_use]
    pub fn quiet() -> Self {
        GameHarnessBuilder::new().build()
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Presses the start control and runs one frame so the hand follows the
    /// camera.
    pub fn start(&mut self) {
        let world = self.app.world_mut();
        world.trigger(StartRequested);
        world.flush();
        self.frame();
    }

    /// Presses restart and runs one frame.
    pub fn restart(&mut self) {
        let world = self.app.world_mut();
        world.trigger(RestartRequested);
        world.flush();
        self.frame();
    }

    /// Runs one per-frame pass: pose sync, hand update and HUD refresh.
    pub fn frame(&mut self) {
        let world = self.app.world_mut();
        world.run_schedule(Update);
        world.run_schedule(PostUpdate);
    }

    /// Runs one game tick followed by the HUD refresh.
    pub fn tick(&mut self) {
        let world = self.app.world_mut();
        world.run_schedule(FixedUpdate);
        world.run_schedule(PostUpdate);
    }

    /// Runs `count` ticks.
    pub fn ticks(&mut self, count: usize) {
        for _ in 0..count {
            self.tick();
        }
    }

    /// Ticks until the session stops or `limit` ticks pass. Returns how many
    /// ticks ran.
    pub fn tick_until_over(&mut self, limit: usize) -> usize {
        for ran in 1..=limit {
            self.tick();
            if !self.session().is_active() {
                return ran;
            }
        }
        limit
    }

    /// Spawns an `archetype` target through the spawn request event.
    pub fn spawn(&mut self, archetype: Archetype, jitter: Vec2) -> Entity {
        let world = self.app.world_mut();
        world.trigger(SpawnTarget::exact(archetype, jitter));
        world.flush();
        self.newest_target()
            .unwrap_or_else(|| panic!("spawn request produced no target"))
    }

    /// Spawns a target whose kind and jitter are drawn from the seeded RNG.
    pub fn spawn_random(&mut self) -> Entity {
        let world = self.app.world_mut();
        world.trigger(SpawnTarget::default());
        world.flush();
        self.newest_target()
            .unwrap_or_else(|| panic!("spawn request produced no target"))
    }

    /// Spawns an `archetype` target and moves it to `position`.
    pub fn spawn_at(&mut self, archetype: Archetype, position: Vec3) -> Entity {
        let entity = self.spawn(archetype, Vec2::ZERO);
        let mut transform = self
            .world_mut()
            .get_mut::<Transform>(entity)
            .unwrap_or_else(|| panic!("target {entity:?} has no transform"));
        transform.translation = position;
        entity
    }

    /// Presses the pointer with the punch clock at `at`.
    pub fn press_at(&mut self, at: Duration) {
        let world = self.app.world_mut();
        world.resource_mut::<Time>().advance_to(at);
        world.trigger(PointerDown);
        world.flush();
    }

    pub fn hand_position(&self) -> Vec3 {
        self.world().resource::<HandProxy>().position()
    }

    pub fn session(&self) -> &Session {
        self.world().resource::<Session>()
    }

    pub fn hud(&self) -> &HudState {
        self.world().resource::<HudState>()
    }

    pub fn captured(&self) -> &CapturedEvents {
        self.world().resource::<CapturedEvents>()
    }

    pub fn xr_bound(&self) -> bool {
        self.world().resource::<XrRuntime>().is_bound()
    }

    /// Live targets as `(entity, archetype, sequence)`, newest first.
    pub fn targets(&mut self) -> Vec<(Entity, Archetype, u64)> {
        let world = self.world_mut();
        let mut live: Vec<_> = world
            .query::<(Entity, &Target)>()
            .iter(world)
            .map(|(entity, target)| (entity, target.archetype, target.sequence))
            .collect();
        live.sort_unstable_by(|a, b| b.2.cmp(&a.2));
        live
    }

    pub fn target_count(&mut self) -> usize {
        self.targets().len()
    }

    pub fn newest_target(&mut self) -> Option<Entity> {
        self.targets().first().map(|(entity, ..)| *entity)
    }

    pub fn is_live(&self, entity: Entity) -> bool {
        self.world().get::<Target>(entity).is_some()
    }
}

/// Assertion helpers for common game state checks.
pub struct GameAssertions;

impl GameAssertions {
    /// Assert the score equals `expected`.
    pub fn assert_score(harness: &GameHarness, expected: u32) -> Result<()> {
        let score = harness.session().score();
        ensure!(score == expected, "Expected score {expected}, got {score}");
        Ok(())
    }

    /// Assert the exact sequence of score deltas.
    pub fn assert_score_deltas(harness: &GameHarness, expected: &[i32]) -> Result<()> {
        let deltas = &harness.captured().score_deltas;
        ensure!(
            deltas == expected,
            "Expected score deltas {expected:?}, got {deltas:?}"
        );
        Ok(())
    }

    /// Position of a live target.
    pub fn target_position(harness: &GameHarness, entity: Entity) -> Result<Vec3> {
        harness
            .world()
            .get::<Transform>(entity)
            .map(|transform| transform.translation)
            .context("target has no transform")
    }
}

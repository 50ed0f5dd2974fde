//! Wires the game into a Bevy [`App`].
//!
//! [`PunchlinePlugin`] is headless: it needs nothing beyond Bevy's core
//! schedules, so tests can build an [`App`] with it alone and run the
//! schedules by hand. Rendering and input live in
//! `presentation::PresentationPlugin` behind the `render` feature.

use bevy::prelude::*;
use log::debug;

use crate::components::{Spin, Target, XrCamera};
use crate::hand::{
    punch_on_pointer_down, reset_hand_on_session_reset, update_hand_proxy_system, HandProxy,
};
use crate::hud::{clear_notice_on_reset, show_notice, sync_hud_system, HudState};
use crate::session::{
    advance_session_clock, apply_score_change, end_on_game_over, restart_on_request,
    session_running, start_on_request, Session,
};
use crate::settings::GameSettings;
use crate::targets::{
    clear_on_reset, resolve_punch, spawn_on_request, spawn_roll_system, update_targets_system,
    SpawnSequence, TargetRng,
};
use crate::xr::{sync_viewer_pose_system, xr_session_bound, XrRuntime};

/// System sets for the per-tick game loop, in execution order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Advance the session clock.
    Clock,
    /// Roll for a new target.
    Spawn,
    /// Move, spin and retire targets.
    Advance,
}

/// Registers game resources, observers and systems.
///
/// Resources already present when the plugin builds are kept, so callers
/// can pre-insert [`GameSettings`], a seeded [`TargetRng`] or an
/// [`XrRuntime`] with a different provider.
#[derive(Debug, Default)]
pub struct PunchlinePlugin;

impl Plugin for PunchlinePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Target>()
            .register_type::<Spin>()
            .register_type::<XrCamera>()
            .register_type::<Session>();

        app.init_resource::<GameSettings>();
        let settings = app.world().resource::<GameSettings>().clone();
        debug!("game settings: {settings:?}");

        app.insert_resource(Time::<Fixed>::from_duration(settings.tick_interval()));
        app.init_resource::<Time>();
        if !app.world().contains_resource::<HandProxy>() {
            app.insert_resource(HandProxy::from_settings(&settings));
        }
        if !app.world().contains_resource::<TargetRng>() {
            app.insert_resource(TargetRng::from_settings(&settings));
        }
        app.init_resource::<SpawnSequence>()
            .init_resource::<Session>()
            .init_resource::<HudState>()
            .init_resource::<XrRuntime>();

        app.add_observer(apply_score_change)
            .add_observer(end_on_game_over)
            .add_observer(start_on_request)
            .add_observer(restart_on_request)
            .add_observer(punch_on_pointer_down)
            .add_observer(resolve_punch)
            .add_observer(spawn_on_request)
            .add_observer(clear_on_reset)
            .add_observer(reset_hand_on_session_reset)
            .add_observer(show_notice)
            .add_observer(clear_notice_on_reset);

        app.add_systems(Startup, spawn_xr_camera);
        app.configure_sets(
            FixedUpdate,
            (TickSet::Clock, TickSet::Spawn, TickSet::Advance)
                .chain()
                .run_if(session_running),
        );
        app.add_systems(
            FixedUpdate,
            (
                advance_session_clock.in_set(TickSet::Clock),
                spawn_roll_system.in_set(TickSet::Spawn),
                update_targets_system.in_set(TickSet::Advance),
            )
                .chain(),
        );
        app.add_systems(
            Update,
            (sync_viewer_pose_system, update_hand_proxy_system)
                .chain()
                .run_if(xr_session_bound),
        );
        app.add_systems(PostUpdate, sync_hud_system);
    }
}

/// Spawns the XR camera unless the host app already provides one.
fn spawn_xr_camera(mut commands: Commands, cameras: Query<(), With<XrCamera>>) {
    if cameras.is_empty() {
        commands.spawn((XrCamera, Transform::default(), Name::new("XrCamera")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn build_app(settings: GameSettings) -> App {
        let mut app = App::new();
        app.insert_resource(settings);
        app.add_plugins(PunchlinePlugin);
        app
    }

    #[rstest]
    fn fixed_timestep_follows_settings() {
        let app = build_app(GameSettings {
            tick_interval_ms: 50,
            ..GameSettings::default()
        });
        let fixed = app.world().resource::<Time<Fixed>>();
        assert_eq!(fixed.timestep(), std::time::Duration::from_millis(50));
    }

    #[rstest]
    fn preinserted_rng_is_kept() {
        let mut app = App::new();
        app.insert_resource(TargetRng::seeded(1));
        app.add_plugins(PunchlinePlugin);
        let mut expected = TargetRng::seeded(1);
        let draw = app.world_mut().resource_mut::<TargetRng>().unit();
        assert_eq!(draw.to_bits(), expected.unit().to_bits());
    }

    #[rstest]
    fn startup_spawns_single_camera() {
        let mut app = build_app(GameSettings::default());
        app.world_mut().run_schedule(Startup);
        app.world_mut().run_schedule(Startup);
        let world = app.world_mut();
        let cameras = world.query::<&XrCamera>().iter(world).count();
        assert_eq!(cameras, 1);
    }

    #[rstest]
    fn fixed_tick_is_gated_on_running_session() {
        let mut app = build_app(GameSettings::default());
        app.world_mut().run_schedule(FixedUpdate);
        assert_eq!(
            app.world().resource::<Session>().elapsed(),
            std::time::Duration::ZERO
        );

        app.world_mut().resource_mut::<Session>().begin();
        app.world_mut().run_schedule(FixedUpdate);
        assert_eq!(
            app.world().resource::<Session>().elapsed(),
            std::time::Duration::from_millis(100)
        );
    }
}

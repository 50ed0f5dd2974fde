//! Target lifecycle: spawning, drifting, expiry, punches and blasts.
//!
//! Targets are entities carrying [`Target`], [`Spin`] and a [`Transform`].
//! Spawning one adds it to the scene; despawning removes it from both the
//! scene and the live set. [`TargetManager`] bundles the queries and
//! resources every target operation needs.
//!
//! Operations that walk the live set do so in descending spawn sequence, so
//! when several targets qualify for a punch the most recent one wins.

use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::archetype::Archetype;
use crate::components::{Spin, Target, TargetBundle, XrCamera};
use crate::hand::Punch;
use crate::motion::{approach, spawn_position};
use crate::session::{GameOver, ScoreChanged, Session, SessionReset};
use crate::settings::GameSettings;

/// Random source for archetype and placement draws.
#[derive(Resource, Debug, Clone)]
pub struct TargetRng(StdRng);

impl TargetRng {
    /// Deterministic source for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from `settings.seed`, or from system entropy when unset.
    #[must_use]
    pub fn from_settings(settings: &GameSettings) -> Self {
        settings
            .seed
            .map_or_else(|| Self(StdRng::from_entropy()), Self::seeded)
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.0.gen::<f32>()
    }
}

impl Default for TargetRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Next spawn sequence number.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSequence(pub u64);

impl SpawnSequence {
    fn next(&mut self) -> u64 {
        let current = self.0;
        self.0 = self.0.wrapping_add(1);
        current
    }
}

/// Request to spawn a target outside the tick's random roll.
///
/// Fields left as `None` are drawn from [`TargetRng`] as usual.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnTarget {
    /// Forced archetype.
    pub archetype: Option<Archetype>,
    /// Forced X/Y offset from the point straight ahead of the camera.
    pub jitter: Option<Vec2>,
}

impl SpawnTarget {
    /// Spawn an `archetype` target at `jitter` from the view axis.
    #[must_use]
    pub const fn exact(archetype: Archetype, jitter: Vec2) -> Self {
        Self {
            archetype: Some(archetype),
            jitter: Some(jitter),
        }
    }
}

/// Outcome of a punch that connected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The punched target.
    pub entity: Entity,
    /// Its archetype.
    pub archetype: Archetype,
    /// Its position when punched.
    pub position: Vec3,
    /// Other targets removed by the resulting blast.
    pub blasted: usize,
}

/// Summary of one [`TargetManager::update`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Targets still live after the pass.
    pub advanced: usize,
    /// Targets removed for reaching the camera.
    pub reached_camera: usize,
    /// Targets removed for exceeding their lifetime.
    pub expired: usize,
    /// Whether a danger target reached the camera.
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy)]
struct LiveTarget {
    entity: Entity,
    target: Target,
    position: Vec3,
}

/// Owner of all target operations.
#[derive(SystemParam)]
pub struct TargetManager<'w, 's> {
    commands: Commands<'w, 's>,
    targets: Query<
        'w,
        's,
        (
            Entity,
            &'static Target,
            &'static mut Transform,
            &'static mut Spin,
        ),
        Without<XrCamera>,
    >,
    camera: Query<'w, 's, &'static Transform, (With<XrCamera>, Without<Target>)>,
    rng: ResMut<'w, TargetRng>,
    sequence: ResMut<'w, SpawnSequence>,
    settings: Res<'w, GameSettings>,
}

impl TargetManager<'_, '_> {
    /// Number of live targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.iter().count()
    }

    /// Whether no target is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn camera_pose(&self) -> Option<(Vec3, Vec3)> {
        self.camera
            .single()
            .ok()
            .map(|transform| (transform.translation, *transform.forward()))
    }

    /// Live targets, most recently spawned first.
    fn live(&self) -> Vec<LiveTarget> {
        let mut live: Vec<LiveTarget> = self
            .targets
            .iter()
            .map(|(entity, target, transform, _)| LiveTarget {
                entity,
                target: *target,
                position: transform.translation,
            })
            .collect();
        live.sort_unstable_by(|a, b| b.target.sequence.cmp(&a.target.sequence));
        live
    }

    /// Rolls the per-tick spawn chance for session time `now` and spawns a
    /// random target when it succeeds.
    pub fn roll_spawn(&mut self, now: Duration) -> Option<Entity> {
        let probability = self.settings.spawn_probability(now);
        if self.rng.unit() < probability {
            self.spawn_target(now)
        } else {
            None
        }
    }

    /// Spawns a target of random archetype at a random offset in front of
    /// the camera.
    ///
    /// Returns `None` when there is no camera to spawn in front of.
    pub fn spawn_target(&mut self, now: Duration) -> Option<Entity> {
        let archetype = Archetype::from_roll(self.rng.unit());
        let jitter = self.draw_jitter();
        self.spawn_target_with(archetype, jitter, now)
    }

    fn draw_jitter(&mut self) -> Vec2 {
        let x = (self.rng.unit() - 0.5) * self.settings.spawn_horizontal_spread;
        let y = self.rng.unit() * self.settings.spawn_vertical_spread;
        Vec2::new(x, y)
    }

    /// Spawns an `archetype` target offset by `jitter` from the point
    /// straight ahead of the camera.
    pub fn spawn_target_with(
        &mut self,
        archetype: Archetype,
        jitter: Vec2,
        now: Duration,
    ) -> Option<Entity> {
        let Some((camera, forward)) = self.camera_pose() else {
            debug!("no XR camera; skipping {} spawn", archetype.label());
            return None;
        };
        let position = spawn_position(camera, forward, self.settings.spawn_distance, jitter);
        let sequence = self.sequence.next();
        let entity = self
            .commands
            .spawn(TargetBundle::new(archetype, position, now, sequence))
            .id();
        debug!(
            "spawned {} target #{sequence} at {position:?} -> {entity:?}",
            archetype.label()
        );
        Some(entity)
    }

    /// Advances every target by one tick at session time `now`.
    ///
    /// Each target closes in on the camera by its archetype's speed and
    /// spins. A target that ends up within the proximity threshold is
    /// removed, ending the game if it is a danger target; otherwise a target
    /// older than the lifetime is removed silently.
    pub fn update(&mut self, now: Duration) -> UpdateReport {
        let mut report = UpdateReport::default();
        let Some((camera, _)) = self.camera_pose() else {
            return report;
        };
        let proximity = self.settings.camera_proximity;
        let lifetime = self.settings.target_lifetime();
        let (spin_x, spin_y) = (self.settings.spin_x_per_tick, self.settings.spin_y_per_tick);

        for live in self.live() {
            let Ok((_, _, mut transform, mut spin)) = self.targets.get_mut(live.entity) else {
                continue;
            };
            let speed = live.target.archetype.profile().speed;
            transform.translation = approach(transform.translation, camera, speed);
            transform.rotation = spin.advance(spin_x, spin_y);
            let distance = transform.translation.distance(camera);

            if distance < proximity {
                if live.target.archetype == Archetype::Danger && !report.game_over {
                    report.game_over = true;
                    self.commands.trigger(GameOver);
                }
                report.reached_camera += 1;
                self.remove_target(live.entity);
            } else if live.target.age(now) > lifetime {
                report.expired += 1;
                self.remove_target(live.entity);
            } else {
                report.advanced += 1;
            }
        }
        report
    }

    /// Resolves a punch at `punch`.
    ///
    /// The most recently spawned target within the hit radius is scored and
    /// removed; an explosive one also blasts its neighbours. At most one
    /// target is hit per punch.
    pub fn check_collision(&mut self, punch: Vec3) -> Option<Hit> {
        let radius = self.settings.hit_radius;
        let struck = self
            .live()
            .into_iter()
            .find(|live| live.position.distance(punch) < radius)?;

        let archetype = struck.target.archetype;
        self.commands.trigger(ScoreChanged {
            delta: archetype.profile().points,
        });
        let blasted = if archetype == Archetype::Explosive {
            self.explode_nearby(struck.position, self.settings.blast_radius)
        } else {
            0
        };
        self.remove_target(struck.entity);

        Some(Hit {
            entity: struck.entity,
            archetype,
            position: struck.position,
            blasted,
        })
    }

    /// Removes every non-explosive target within `radius` of `center`,
    /// scoring a flat blast bonus for each. Returns how many were removed.
    ///
    /// Explosive targets are left alone so one blast cannot chain into
    /// another.
    pub fn explode_nearby(&mut self, center: Vec3, radius: f32) -> usize {
        let points = self.settings.blast_points;
        let caught: Vec<Entity> = self
            .live()
            .into_iter()
            .filter(|live| {
                live.target.archetype != Archetype::Explosive
                    && live.position.distance(center) < radius
            })
            .map(|live| live.entity)
            .collect();
        for entity in &caught {
            self.commands.trigger(ScoreChanged { delta: points });
            self.remove_target(*entity);
        }
        caught.len()
    }

    /// Detaches a target from the scene and the live set.
    pub fn remove_target(&mut self, entity: Entity) {
        trace!("removing target {entity:?}");
        self.commands.entity(entity).try_despawn();
    }

    /// Removes every live target. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let entities: Vec<Entity> = self.targets.iter().map(|(entity, ..)| entity).collect();
        for entity in &entities {
            self.remove_target(*entity);
        }
        entities.len()
    }
}

/// Rolls the spawn chance for this tick.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn spawn_roll_system(session: Res<Session>, mut targets: TargetManager) {
    targets.roll_spawn(session.elapsed());
}

/// Advances all targets by one tick.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn update_targets_system(session: Res<Session>, mut targets: TargetManager) {
    let report = targets.update(session.elapsed());
    if report.reached_camera > 0 || report.expired > 0 {
        debug!(
            "tick at {:.1}s: {} reached camera, {} expired, {} live",
            session.elapsed().as_secs_f32(),
            report.reached_camera,
            report.expired,
            report.advanced
        );
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub(crate) fn resolve_punch(event: On<Punch>, mut targets: TargetManager) {
    let punch = event.event().position;
    match targets.check_collision(punch) {
        Some(hit) => debug!(
            "punch hit {} target at {:?} ({} blasted)",
            hit.archetype.label(),
            hit.position,
            hit.blasted
        ),
        None => trace!("punch at {punch:?} hit nothing"),
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
pub(crate) fn spawn_on_request(
    event: On<SpawnTarget>,
    session: Res<Session>,
    mut targets: TargetManager,
) {
    let request = *event.event();
    let now = session.elapsed();
    match (request.archetype, request.jitter) {
        (Some(archetype), Some(jitter)) => targets.spawn_target_with(archetype, jitter, now),
        (Some(archetype), None) => {
            let jitter = targets.draw_jitter();
            targets.spawn_target_with(archetype, jitter, now)
        }
        (None, jitter) => {
            let archetype = Archetype::from_roll(targets.rng.unit());
            let jitter = jitter.unwrap_or_else(|| targets.draw_jitter());
            targets.spawn_target_with(archetype, jitter, now)
        }
    };
}

pub(crate) fn clear_on_reset(_event: On<SessionReset>, mut targets: TargetManager) {
    let removed = targets.clear();
    if removed > 0 {
        debug!("cleared {removed} targets");
    }
}

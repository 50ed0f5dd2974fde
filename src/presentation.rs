//! Presentation layer: 3D view, target meshes, pointer input and HUD nodes.
//!
//! `PresentationPlugin` is a passive mirror of game state. It turns the XR
//! camera into a rendering camera, dresses new targets with meshes, copies
//! [`HudState`] into UI nodes and reports pointer presses as
//! [`PointerDown`]. Everything it shows is decided by [`PunchlinePlugin`].
//!
//! [`PunchlinePlugin`]: crate::PunchlinePlugin

use bevy::input::touch::Touches;
use bevy::input::InputSystems;
use bevy::prelude::*;

use crate::archetype::{Archetype, TargetShape};
use crate::components::{Target, XrCamera};
use crate::hand::PointerDown;
use crate::hud::HudState;
use crate::session::{RestartRequested, StartRequested};

/// Radius of a sphere target mesh before archetype scaling.
const SPHERE_RADIUS: f32 = 0.1;
/// Ring target mesh radii. Rings are never scaled.
const RING_INNER_RADIUS: f32 = 0.1;
const RING_OUTER_RADIUS: f32 = 0.15;
/// Emissive multiplier giving targets a self-lit look against passthrough.
const EMISSIVE_STRENGTH: f32 = 0.5;

/// HUD text element a UI node mirrors.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudText {
    /// The running score.
    Score,
    /// The session clock.
    Timer,
    /// The final score on the game-over overlay.
    FinalScore,
    /// The player notice line.
    Notice,
}

/// HUD control a button node represents.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudButton {
    /// Starts an AR session.
    Start,
    /// Restarts after game over.
    Restart,
}

/// Root node of the game-over overlay.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct GameOverOverlay;

/// Converts a `0xRRGGBB` colour to an sRGB [`Color`].
///
/// # Examples
///
/// ```
/// use bevy::prelude::*;
/// use punchline::presentation::hex_color;
///
/// assert_eq!(hex_color(0x00B4FF), Color::srgb_u8(0x00, 0xB4, 0xFF));
/// ```
#[must_use]
pub fn hex_color(rgb: u32) -> Color {
    let [_, r, g, b] = rgb.to_be_bytes();
    Color::srgb_u8(r, g, b)
}

/// Visibility for a HUD element that should be `shown`.
#[must_use]
pub const fn visibility_for(shown: bool) -> Visibility {
    if shown {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Plugin owning rendering, input and the on-screen HUD.
///
/// Add it after [`PunchlinePlugin`](crate::PunchlinePlugin) and Bevy's
/// `DefaultPlugins`.
#[derive(Debug, Default)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PostStartup, (attach_camera, spawn_light, spawn_hud));
        app.add_systems(PreUpdate, pointer_input_system.after(InputSystems));
        app.add_systems(
            Update,
            (attach_target_meshes, hud_button_system, sync_hud_nodes),
        );
    }
}

/// Makes the XR camera render unless a 3D camera already exists.
fn attach_camera(
    mut commands: Commands,
    xr_cameras: Query<Entity, (With<XrCamera>, Without<Camera3d>)>,
    existing: Query<(), With<Camera3d>>,
) {
    if !existing.is_empty() {
        return;
    }
    for entity in &xr_cameras {
        commands.entity(entity).insert(Camera3d::default());
    }
}

fn spawn_light(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(1.0, 3.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("KeyLight"),
    ));
}

fn target_mesh(archetype: Archetype) -> Mesh {
    match archetype.profile().shape {
        TargetShape::Sphere => Sphere::new(SPHERE_RADIUS).into(),
        TargetShape::Ring => Torus::new(RING_INNER_RADIUS, RING_OUTER_RADIUS).into(),
    }
}

fn target_material(archetype: Archetype) -> StandardMaterial {
    let color = hex_color(archetype.profile().color);
    StandardMaterial {
        base_color: color,
        emissive: color.to_linear() * EMISSIVE_STRENGTH,
        ..default()
    }
}

/// Gives newly spawned targets a mesh and material.
fn attach_target_meshes(
    mut commands: Commands,
    added: Query<(Entity, &Target), Added<Target>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, target) in &added {
        let mesh = meshes.add(target_mesh(target.archetype));
        let material = materials.add(target_material(target.archetype));
        commands
            .entity(entity)
            .insert((Mesh3d(mesh), MeshMaterial3d(material)));
    }
}

/// Reports a left click, a new touch or the space bar as [`PointerDown`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn pointer_input_system(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
) {
    if mouse.just_pressed(MouseButton::Left)
        || keys.just_pressed(KeyCode::Space)
        || touches.any_just_pressed()
    {
        commands.trigger(PointerDown);
    }
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            Name::new("Hud"),
        ))
        .with_children(|root| {
            root.spawn(Node {
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            })
            .with_children(|bar| {
                bar.spawn((Text::default(), HudText::Score));
                bar.spawn((Text::default(), HudText::Timer));
            });
            root.spawn((Text::default(), HudText::Notice));
            root.spawn((Button, Node::default(), HudButton::Start))
                .with_child(Text::new("START AR"));
            root.spawn((Node::default(), GameOverOverlay, Visibility::Hidden))
                .with_children(|overlay| {
                    overlay.spawn(Text::new("GAME OVER  "));
                    overlay.spawn((Text::default(), HudText::FinalScore));
                    overlay
                        .spawn((Button, Node::default(), HudButton::Restart))
                        .with_child(Text::new("  RESTART"));
                });
        });
}

/// Copies [`HudState`] into the UI nodes when it changes.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn sync_hud_nodes(
    hud: Res<HudState>,
    mut texts: Query<(&mut Text, &HudText)>,
    mut buttons: Query<(&mut Visibility, &HudButton), Without<GameOverOverlay>>,
    mut overlay: Query<&mut Visibility, (With<GameOverOverlay>, Without<HudButton>)>,
) {
    if !hud.is_changed() {
        return;
    }
    for (mut text, kind) in &mut texts {
        let value = match kind {
            HudText::Score => hud.score_text.as_str(),
            HudText::Timer => hud.timer_text.as_str(),
            HudText::FinalScore => hud.final_score_text.as_str(),
            HudText::Notice => hud.notice.as_deref().unwrap_or_default(),
        };
        value.clone_into(&mut **text);
    }
    for (mut visibility, button) in &mut buttons {
        if *button == HudButton::Start {
            *visibility = visibility_for(hud.start_visible);
        }
    }
    for mut visibility in &mut overlay {
        *visibility = visibility_for(hud.game_over_visible);
    }
}

/// Turns HUD button presses into controller requests.
fn hud_button_system(
    mut commands: Commands,
    pressed: Query<(&Interaction, &HudButton), Changed<Interaction>>,
) {
    for (interaction, button) in &pressed {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            HudButton::Start => commands.trigger(StartRequested),
            HudButton::Restart => commands.trigger(RestartRequested),
        }
    }
}

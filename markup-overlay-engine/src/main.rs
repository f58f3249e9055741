use bevy::asset::AssetMetaCheck;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use bevy::window::PresentMode;

use constants::render_settings::OVERLAY_LAYER;
use markup_overlay_engine::markup::{
    HostSelection, MarkupOverlay, MarkupOverlayPlugin, MarkupToolCommand,
};

fn main() {
    create_app().run();
}

/// Demo host: stands in for the production viewer runtime — window,
/// render loop, camera, and a bit of scene to annotate.
fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(MarkupOverlayPlugin)
        .init_resource::<OrbitCamera>()
        .add_systems(Startup, (setup_scene, activate_markup_tool))
        .add_systems(
            Update,
            (
                orbit_camera_controller,
                markup_tool_shortcut,
                host_selection_input,
            ),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(Window {
            title: "markup overlay engine".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // The camera renders the model layer plus the markup overlay layer.
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(40.0, 30.0, 60.0).looking_at(Vec3::new(0.0, 5.0, 0.0), Vec3::Y),
        RenderLayers::from_layers(&[0, OVERLAY_LAYER]),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(200.0, 200.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.37, 0.4),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::default(),
    ));
}

fn activate_markup_tool(mut commands: EventWriter<MarkupToolCommand>) {
    commands.send(MarkupToolCommand::Activate);
}

/// `M` toggles the markup tool, exercising the activation protocol.
fn markup_tool_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    overlay: Res<MarkupOverlay>,
    mut commands: EventWriter<MarkupToolCommand>,
) {
    if keyboard.just_pressed(KeyCode::KeyM) {
        if overlay.active {
            commands.send(MarkupToolCommand::Deactivate);
        } else {
            commands.send(MarkupToolCommand::Activate);
        }
    }
}

/// Stand-in for the host scene's multi-object selection: digit keys pick
/// object ids, `C` clears. A markup click also clears it.
fn host_selection_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut host_selection: ResMut<HostSelection>,
) {
    let digits = [
        (KeyCode::Digit1, 10),
        (KeyCode::Digit2, 11),
        (KeyCode::Digit3, 12),
    ];
    for (key, id) in digits {
        if keyboard.just_pressed(key) {
            host_selection.selected_ids.clear();
            host_selection.selected_ids.push(id);
            info!("host selection set to object {id}");
        }
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        host_selection.selected_ids.clear();
    }
}

#[derive(Resource)]
struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    focus: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: -0.5,
            distance: 80.0,
            focus: Vec3::new(0.0, 5.0, 0.0),
        }
    }
}

/// Right-drag orbits, scroll wheel dollies.
fn orbit_camera_controller(
    mut orbit: ResMut<OrbitCamera>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
) {
    let delta: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    if mouse_button.pressed(MouseButton::Right) && delta != Vec2::ZERO {
        orbit.yaw -= delta.x * 0.0035;
        orbit.pitch = (orbit.pitch - delta.y * 0.0030).clamp(-1.55, -0.05);
    }

    let mut scroll = 0.0;
    for event in scroll_events.read() {
        scroll += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.05,
        };
    }
    if scroll.abs() > f32::EPSILON {
        orbit.distance = (orbit.distance * (1.0 - scroll * 0.1)).clamp(5.0, 500.0);
    }

    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, orbit.pitch, 0.0);
    *transform = Transform::from_translation(orbit.focus + rotation * Vec3::new(0.0, 0.0, orbit.distance))
        .looking_at(orbit.focus, Vec3::Y);
}

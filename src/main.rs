use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::light::GlobalAmbientLight;
use bevy::picking::prelude::*;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};

use bevy_feathers::FeathersPlugins;
use bevy_feathers::dark_theme::create_dark_theme;
use bevy_feathers::palette;
use bevy_feathers::theme::UiTheme;
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

#[cfg(feature = "dev")]
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;

mod bodies;
mod config;
mod core;
mod hover;
mod orbital;
mod selection;
mod starfield;
mod ui;

use bodies::BodiesPlugin;
use config::{ConfigPlugin, SceneConfig};
use crate::core::{CorePlugin, MainCamera};
use hover::HoverPlugin;
use orbital::OrbitalPlugin;
use selection::SelectionPlugin;
use starfield::StarfieldPlugin;
use ui::UiPlugin;

// Camera and lights. Bodies are spawned by `BodiesPlugin`.
fn setup(mut commands: Commands, config: Res<SceneConfig>) {
    commands.insert_resource(GlobalAmbientLight {
        brightness: 250.0,
        ..default()
    });

    // Refined from the viewport aspect on the first frame.
    let initial_distance = config.camera.initial_distance;

    let pan_orbit = PanOrbitCamera {
        focus: Vec3::ZERO,
        radius: Some(initial_distance),
        yaw: Some(0.0),
        pitch: Some(0.25),
        force_update: true,
        ..default()
    };

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_deg.to_radians(),
            near: 0.1,
            far: 2_000.0,
            ..default()
        }),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        pan_orbit,
        MainCamera,
        Tonemapping::TonyMcMapface,
        Transform::from_xyz(0.0, 0.0, initial_distance).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 6_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(40.0, 25.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Orbit Scene".to_string(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    #[cfg(feature = "dev")]
    app.add_plugins(FpsOverlayPlugin::default());

    // Feathers initializes `UiTheme` but does not populate it by default.
    let mut theme = UiTheme(create_dark_theme());
    theme.set_color("feathers.text.main", palette::LIGHT_GRAY_1);
    theme.set_color("feathers.text.dim", palette::LIGHT_GRAY_2);
    theme.set_color("feathers.focus", palette::ACCENT);
    app.insert_resource(theme);
    app.add_plugins(FeathersPlugins);

    app.add_plugins(PanOrbitCameraPlugin);
    app.add_plugins(MeshPickingPlugin);

    // Config first: later plugins read it while building.
    app.add_plugins(ConfigPlugin);
    app.add_plugins(CorePlugin);
    app.add_plugins(OrbitalPlugin);
    app.add_plugins(BodiesPlugin);
    app.add_plugins(SelectionPlugin);
    app.add_plugins(HoverPlugin);
    app.add_plugins(UiPlugin);
    app.add_plugins(StarfieldPlugin);
    app.add_systems(Startup, setup);

    app.run();
}

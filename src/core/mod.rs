//! Shared scheduling and math helpers.

use bevy::prelude::*;

pub mod easing;
pub mod schedule;

/// Per-frame ordering. Motion strictly precedes orientation, which strictly
/// precedes camera following, so both read this frame's positions.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SceneSet {
    Input,
    Motion,
    Orientation,
    Camera,
    Presentation,
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SceneSet::Input,
                SceneSet::Motion,
                SceneSet::Orientation,
                SceneSet::Camera,
                SceneSet::Presentation,
            )
                .chain(),
        );
    }
}

/// Marker for the scene camera.
#[derive(Component)]
pub struct MainCamera;

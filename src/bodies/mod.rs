//! Orbiting body management module
//!
//! Spawns the central object and the orbiting bodies, keeps the entity
//! table, and applies per-body presentation effects.

use bevy::prelude::*;

use crate::core::SceneSet;

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{BodyId, OrbitingBody};
pub use resources::BodyRegistry;
pub use systems::{apply_hover_highlight, resolve_body, spawn_scene_bodies};

/// Plugin for orbiting body spawning and presentation
pub struct BodiesPlugin;

impl Plugin for BodiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BodyRegistry>()
            .add_systems(Startup, spawn_scene_bodies)
            .add_systems(Update, apply_hover_highlight.in_set(SceneSet::Presentation));
    }
}

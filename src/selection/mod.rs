//! Selection and camera-follow module
//!
//! Clicks select or deselect bodies; the camera follows the selection and
//! hands control back to PanOrbit when the selection clears.

use bevy::prelude::*;

use crate::core::SceneSet;

pub mod camera;
pub mod state;
pub mod systems;

pub use state::{CameraFollow, SelectionChange, SelectionRequest};
pub use systems::{
    PointerDrag, apply_selection_requests, detect_manual_camera, fit_initial_camera_distance,
    read_pointer_clicks, read_selection_keys, update_camera_follow,
};

/// Plugin for selection handling and the follow camera
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraFollow>()
            .init_resource::<PointerDrag>()
            .add_message::<SelectionRequest>()
            .add_message::<SelectionChange>()
            .add_systems(
                Update,
                (
                    fit_initial_camera_distance,
                    detect_manual_camera,
                    read_pointer_clicks,
                    read_selection_keys,
                    apply_selection_requests,
                )
                    .chain()
                    .in_set(SceneSet::Input),
            )
            .add_systems(Update, update_camera_follow.in_set(SceneSet::Camera));
    }
}

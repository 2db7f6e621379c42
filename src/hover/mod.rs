//! Hover label module
//!
//! Each body carries a label callout that fades in while pointed at and
//! hides after a delay once the pointer leaves.

use bevy::prelude::*;
use bevy::transform::TransformSystems;
use bevy::ui::UiSystems;
use bevy_panorbit_camera::PanOrbitCameraSystemSet;

use crate::core::SceneSet;
use crate::selection::apply_selection_requests;

pub mod state;
pub mod systems;

pub use state::{HoverEnded, HoverLabel};
pub use systems::{
    attach_hover_labels, hide_label_on_selection, read_pointer_hover, update_hover_labels,
};

/// Plugin for hover labels
pub struct HoverPlugin;

impl Plugin for HoverPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<HoverEnded>()
            .add_systems(
                Update,
                (
                    attach_hover_labels,
                    read_pointer_hover,
                    hide_label_on_selection.after(apply_selection_requests),
                )
                    .in_set(SceneSet::Input),
            )
            // PanOrbit writes the free camera's transform in PostUpdate; place
            // labels after it and before UI layout.
            .add_systems(
                PostUpdate,
                update_hover_labels
                    .after(PanOrbitCameraSystemSet)
                    .before(TransformSystems::Propagate)
                    .before(UiSystems::Layout),
            );
    }
}

//! User interface module
//!
//! Content lookup, the detail panel lifecycle, and the startup loading
//! overlay.

use bevy::prelude::*;

use crate::config::SceneConfig;
use crate::core::SceneSet;
use crate::selection::{apply_selection_requests, read_pointer_clicks};

pub mod content;
pub mod loading;
pub mod panel;
pub mod systems;

pub use content::ContentLibrary;
pub use loading::{LoadingSequencer, advance_loading, animate_loading_overlay};
pub use panel::DetailPanel;
pub use systems::{
    apply_selection_changes, log_panel_signals, spawn_detail_panel, sync_detail_panel,
    tick_detail_panel,
};

/// Font shared by labels, the panel and the loading title.
#[derive(Resource, Debug, Default)]
pub struct UiFont(Option<Handle<Font>>);

impl UiFont {
    pub fn handle(&self) -> Handle<Font> {
        self.0.clone().unwrap_or_default()
    }
}

fn load_ui_font(mut commands: Commands, config: Res<SceneConfig>, asset_server: Res<AssetServer>) {
    let font = config.hover.font.as_ref().map(|path| {
        info!("Using UI font {}", path);
        asset_server.load(path.clone())
    });
    commands.insert_resource(UiFont(font));
}

/// Plugin for user interface management
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        let sequencer = match app.world().get_resource::<SceneConfig>() {
            Some(config) => LoadingSequencer::new(&config.loading),
            None => LoadingSequencer::new(&SceneConfig::default().loading),
        };

        app.insert_resource(ContentLibrary::load_or_default())
            .insert_resource(sequencer)
            .init_resource::<DetailPanel>()
            .init_resource::<UiFont>()
            .add_systems(PreStartup, load_ui_font)
            .add_systems(Startup, (loading::spawn_loading_overlay, spawn_detail_panel))
            .add_systems(
                Update,
                (
                    advance_loading.before(read_pointer_clicks),
                    apply_selection_changes.after(apply_selection_requests),
                    tick_detail_panel.after(apply_selection_changes),
                )
                    .in_set(SceneSet::Input),
            )
            .add_systems(
                Update,
                (animate_loading_overlay, sync_detail_panel, log_panel_signals)
                    .in_set(SceneSet::Presentation),
            );
    }
}

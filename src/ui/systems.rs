//! Detail panel UI systems

use bevy::prelude::*;
use bevy_feathers::palette;

use crate::bodies::BodyId;
use crate::config::SceneConfig;
use crate::selection::SelectionChange;
use crate::ui::UiFont;
use crate::ui::content::ContentLibrary;
use crate::ui::panel::DetailPanel;

#[derive(Component)]
pub struct DetailPanelRoot;

#[derive(Component)]
pub struct PanelTitle;

#[derive(Component)]
pub struct PanelBody;

const PANEL_BACKGROUND: Color = Color::srgba(0.04, 0.08, 0.12, 0.9);
const PANEL_BORDER: Color = Color::srgba(0.18, 0.7, 0.8, 0.7);

pub fn spawn_detail_panel(mut commands: Commands, config: Res<SceneConfig>, font: Res<UiFont>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Px(config.panel.width_px),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                padding: UiRect::all(Val::Px(20.0)),
                border: UiRect::left(Val::Px(1.0)),
                display: Display::None,
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            BorderColor::all(PANEL_BORDER),
            DetailPanelRoot,
            Name::new("Detail panel"),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(""),
                TextFont {
                    font: font.handle(),
                    font_size: 28.0,
                    ..default()
                },
                TextColor(palette::LIGHT_GRAY_1),
                PanelTitle,
            ));
            panel.spawn((
                Text::new(""),
                TextFont {
                    font: font.handle(),
                    font_size: 15.0,
                    ..default()
                },
                TextColor(palette::LIGHT_GRAY_2),
                PanelBody,
            ));
        });
}

/// Open or start closing the panel as selection changes.
pub fn apply_selection_changes(
    mut changes: MessageReader<SelectionChange>,
    config: Res<SceneConfig>,
    mut panel: ResMut<DetailPanel>,
) {
    for change in changes.read() {
        panel.apply(*change, config.panel.close_duration());
    }
}

pub fn tick_detail_panel(time: Res<Time>, mut panel: ResMut<DetailPanel>) {
    if panel.tick(time.delta()) {
        debug!("Detail panel closed");
    }
}

/// Log the `selectedObject` / `isClosing` pair whenever it changes.
pub fn log_panel_signals(panel: Res<DetailPanel>, mut last: Local<(Option<BodyId>, bool)>) {
    let signals = (panel.selected_object(), panel.is_closing());
    if signals == *last {
        return;
    }
    debug!(
        "Panel signals: selected {:?}, closing {} ({:?})",
        signals.0,
        signals.1,
        panel.closing_object()
    );
    *last = signals;
}

/// Mirror the panel state onto its UI nodes.
pub fn sync_detail_panel(
    panel: Res<DetailPanel>,
    content: Res<ContentLibrary>,
    mut shown: Local<Option<BodyId>>,
    mut root: Query<(&mut Node, &mut BackgroundColor, &mut BorderColor), With<DetailPanelRoot>>,
    mut title: Query<(&mut Text, &mut TextColor), (With<PanelTitle>, Without<PanelBody>)>,
    mut body: Query<(&mut Text, &mut TextColor), (With<PanelBody>, Without<PanelTitle>)>,
) {
    let Ok((mut node, mut background, mut border)) = root.single_mut() else {
        return;
    };

    let Some(displayed) = panel.displayed_body() else {
        node.display = Display::None;
        *shown = None;
        return;
    };
    node.display = Display::Flex;

    let alpha = panel.opacity();
    background.0 = PANEL_BACKGROUND.with_alpha(PANEL_BACKGROUND.alpha() * alpha);
    *border = BorderColor::all(PANEL_BORDER.with_alpha(PANEL_BORDER.alpha() * alpha));

    let refresh = *shown != Some(displayed);
    *shown = Some(displayed);
    let entry = refresh.then(|| content.lookup(displayed));

    if let Ok((mut text, mut color)) = title.single_mut() {
        if let Some(entry) = &entry {
            text.0 = entry.label.clone();
        }
        color.0 = palette::LIGHT_GRAY_1.with_alpha(alpha);
    }
    if let Ok((mut text, mut color)) = body.single_mut() {
        if let Some(entry) = entry {
            text.0 = entry.body;
        }
        color.0 = palette::LIGHT_GRAY_2.with_alpha(alpha);
    }
}

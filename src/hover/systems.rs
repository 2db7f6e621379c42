//! Hover label systems: pointer tracking, fades, and screen placement

use bevy::picking::Pickable;
use bevy::picking::events::{Out, Over, Pointer};
use bevy::prelude::*;

use crate::bodies::{BodyRegistry, OrbitingBody, resolve_body};
use crate::config::SceneConfig;
use crate::core::MainCamera;
use crate::hover::state::{FadeRates, HoverEnded, HoverLabel, label_anchor};
use crate::selection::{CameraFollow, SelectionChange};
use crate::ui::{ContentLibrary, LoadingSequencer, UiFont};

/// Links a body to its on-screen label node.
#[derive(Component, Clone, Copy, Debug)]
pub struct LabelNode(pub Entity);

const LABEL_TEXT_COLOR: Color = Color::srgb(0.85, 0.95, 1.0);

/// Give every newly spawned body a hover state and a label node.
pub fn attach_hover_labels(
    mut commands: Commands,
    added: Query<(Entity, &OrbitingBody), Added<OrbitingBody>>,
    content: Res<ContentLibrary>,
    font: Res<UiFont>,
    config: Res<SceneConfig>,
) {
    for (entity, body) in added.iter() {
        let label_text = content.lookup(body.id).label;
        let node = commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(0.0),
                    top: Val::Px(0.0),
                    padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
                    ..default()
                },
                Text::new(label_text),
                TextFont {
                    font: font.handle(),
                    font_size: config.hover.font_size,
                    ..default()
                },
                TextColor(LABEL_TEXT_COLOR.with_alpha(0.0)),
                Visibility::Hidden,
                Pickable::IGNORE,
                Name::new(format!("Label: {}", body.id)),
            ))
            .id();

        commands
            .entity(entity)
            .insert((HoverLabel::default(), LabelNode(node)));
    }
}

/// Feed pointer over/out messages into the hover state machines.
pub fn read_pointer_hover(
    mut overs: MessageReader<Pointer<Over>>,
    mut outs: MessageReader<Pointer<Out>>,
    bodies: Query<&OrbitingBody>,
    parents: Query<&ChildOf>,
    registry: Res<BodyRegistry>,
    follow: Res<CameraFollow>,
    loading: Res<LoadingSequencer>,
    config: Res<SceneConfig>,
    mut labels: Query<&mut HoverLabel>,
) {
    if !loading.is_interactive() {
        overs.clear();
        outs.clear();
        return;
    }

    let selected = follow.selected_body();
    let hide_delay = config.hover.hide_delay();

    // Outs first: moving between meshes of one model yields Out + Over in the
    // same frame, and the Over must win.
    for ev in outs.read() {
        let Some(id) = resolve_body(ev.entity, &bodies, &parents) else {
            continue;
        };
        let Some(mut label) = registry.get(id).and_then(|e| labels.get_mut(e).ok()) else {
            continue;
        };
        label.pointer_leave(hide_delay);
    }

    for ev in overs.read() {
        let Some(id) = resolve_body(ev.entity, &bodies, &parents) else {
            continue;
        };
        let Some(mut label) = registry.get(id).and_then(|e| labels.get_mut(e).ok()) else {
            continue;
        };
        label.pointer_enter(selected == Some(id));
    }
}

/// Advance label fades and timers, then place each label on screen.
pub fn update_hover_labels(
    time: Res<Time>,
    config: Res<SceneConfig>,
    follow: Res<CameraFollow>,
    mut bodies: Query<(&OrbitingBody, &Transform, &mut HoverLabel, &LabelNode)>,
    camera: Query<(&Camera, &Transform), With<MainCamera>>,
    mut nodes: Query<(&mut Node, &mut TextColor, &mut Visibility, &ComputedNode)>,
    mut ended: MessageWriter<HoverEnded>,
) {
    let rates = FadeRates {
        rise: config.hover.rise_rate,
        fall: config.hover.fall_rate,
    };
    let selected = follow.selected_body();
    // Runs before transform propagation, so project through the local
    // transform (the camera has no parent).
    let camera = camera
        .single()
        .ok()
        .map(|(camera, transform)| (camera, GlobalTransform::from(*transform)));

    for (body, transform, mut label, label_node) in bodies.iter_mut() {
        if label.tick(time.delta(), selected == Some(body.id), rates) {
            ended.write(HoverEnded { body: body.id });
        }

        let Ok((mut node, mut color, mut visibility, computed)) = nodes.get_mut(label_node.0)
        else {
            continue;
        };

        let anchor = label_anchor(transform.translation, config.hover.label_standoff);
        let screen = camera
            .as_ref()
            .and_then(|(camera, cam_global)| camera.world_to_viewport(cam_global, anchor).ok());

        match screen {
            Some(pos) if label.is_visible() => {
                let size = computed.size() * computed.inverse_scale_factor();
                node.left = Val::Px(pos.x - size.x / 2.0);
                node.top = Val::Px(pos.y - size.y);
                color.0 = LABEL_TEXT_COLOR.with_alpha(label.opacity());
                *visibility = Visibility::Inherited;
            }
            _ => {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

/// A newly selected body drops its label at once, even mid-fade.
pub fn hide_label_on_selection(
    mut changes: MessageReader<SelectionChange>,
    registry: Res<BodyRegistry>,
    mut labels: Query<&mut HoverLabel>,
    mut ended: MessageWriter<HoverEnded>,
) {
    for change in changes.read() {
        let SelectionChange::Selected(id) = *change else {
            continue;
        };
        let Some(mut label) = registry.get(id).and_then(|e| labels.get_mut(e).ok()) else {
            continue;
        };
        if label.force_hide() {
            ended.write(HoverEnded { body: id });
        }
    }
}

//! Systems turning pointer input into selection and driving the camera

use bevy::input::mouse::AccumulatedMouseScroll;
use bevy::picking::events::{Click, Pointer};
use bevy::picking::pointer::PointerButton;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::bodies::{BodyId, BodyRegistry, OrbitingBody, resolve_body};
use crate::config::SceneConfig;
use crate::core::MainCamera;
use crate::selection::camera::{
    CameraPose, camera_rotation, initial_camera_distance, orbit_angles, responsive_look_offset,
};
use crate::selection::state::{CameraFollow, CameraMode, SelectionChange, SelectionRequest};
use crate::ui::LoadingSequencer;

/// Pointer drag bookkeeping for the manual-camera signal.
#[derive(Resource, Default, Debug)]
pub struct PointerDrag {
    /// Cursor travel in logical pixels since the button went down.
    travel_px: f32,
    last_cursor: Option<Vec2>,
    dragging: bool,
    /// Set on the release frame of a drag so the trailing click is ignored.
    suppress_click: bool,
}

impl PointerDrag {
    fn press(&mut self, cursor: Option<Vec2>) {
        self.travel_px = 0.0;
        self.last_cursor = cursor;
        self.dragging = false;
    }

    /// Accumulate cursor travel while held. Returns true on the frame the
    /// travel first exceeds `threshold`. Frames with the cursor outside the
    /// window add nothing.
    fn track(&mut self, cursor: Option<Vec2>, threshold: f32) -> bool {
        if let (Some(last), Some(now)) = (self.last_cursor, cursor) {
            self.travel_px += last.distance(now);
        }
        if cursor.is_some() {
            self.last_cursor = cursor;
        }
        if !self.dragging && self.travel_px > threshold {
            self.dragging = true;
            return true;
        }
        false
    }

    fn release(&mut self) {
        self.suppress_click = self.dragging;
        self.dragging = false;
        self.travel_px = 0.0;
        self.last_cursor = None;
    }
}

const DRAG_BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Raise `ManualCamera` when the user drags or scrolls the free camera.
pub fn detect_manual_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    scroll: Res<AccumulatedMouseScroll>,
    window: Single<&Window, With<PrimaryWindow>>,
    config: Res<SceneConfig>,
    mut drag: ResMut<PointerDrag>,
    mut requests: MessageWriter<SelectionRequest>,
) {
    drag.suppress_click = false;
    let cursor = window.cursor_position();

    if buttons.any_just_pressed(DRAG_BUTTONS) && !drag.dragging {
        drag.press(cursor);
    }

    if buttons.any_pressed(DRAG_BUTTONS) && drag.track(cursor, config.camera.drag_threshold_px) {
        requests.write(SelectionRequest::ManualCamera);
    }

    if buttons.any_just_released(DRAG_BUTTONS) && !buttons.any_pressed(DRAG_BUTTONS) {
        drag.release();
    }

    if scroll.delta != Vec2::ZERO {
        requests.write(SelectionRequest::ManualCamera);
    }
}

/// Translate primary clicks into selection requests. Clicks on the window
/// background or the central body deselect; clicks on UI nodes are ignored.
pub fn read_pointer_clicks(
    mut clicks: MessageReader<Pointer<Click>>,
    bodies: Query<&OrbitingBody>,
    parents: Query<&ChildOf>,
    ui_nodes: Query<(), With<Node>>,
    drag: Res<PointerDrag>,
    loading: Res<LoadingSequencer>,
    mut requests: MessageWriter<SelectionRequest>,
) {
    for ev in clicks.read() {
        if ev.button != PointerButton::Primary || drag.suppress_click {
            continue;
        }
        if !loading.is_interactive() || ui_nodes.contains(ev.entity) {
            continue;
        }
        let body = resolve_body(ev.entity, &bodies, &parents);
        requests.write(SelectionRequest::Click(body));
    }
}

/// Keyboard shortcut for a selection request: digits pick a body in
/// registry order, Escape clears the selection.
fn key_request(keys: &ButtonInput<KeyCode>) -> Option<SelectionRequest> {
    if keys.just_pressed(KeyCode::Escape) {
        return Some(SelectionRequest::Deselect);
    }
    const DIGITS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
    DIGITS
        .iter()
        .zip(BodyId::ALL)
        .find(|(key, _)| keys.just_pressed(**key))
        .map(|(_, body)| SelectionRequest::Select(body))
}

pub fn read_selection_keys(
    keys: Res<ButtonInput<KeyCode>>,
    loading: Res<LoadingSequencer>,
    mut requests: MessageWriter<SelectionRequest>,
) {
    if !loading.is_interactive() {
        return;
    }
    if let Some(request) = key_request(&keys) {
        requests.write(request);
    }
}

/// Apply queued selection requests against the camera's current pose.
pub fn apply_selection_requests(
    mut requests: MessageReader<SelectionRequest>,
    mut follow: ResMut<CameraFollow>,
    mut changes: MessageWriter<SelectionChange>,
    mut camera: Query<(&Transform, &mut PanOrbitCamera), With<MainCamera>>,
) {
    let Ok((transform, mut pan_orbit)) = camera.single_mut() else {
        // Drain so stale requests don't replay once the camera exists.
        requests.clear();
        return;
    };

    for request in requests.read() {
        let look_at = match follow.mode {
            CameraMode::Following { .. } => follow.look_at,
            CameraMode::Idle | CameraMode::Returning { .. } => pan_orbit.focus,
        };
        let current = CameraPose {
            position: transform.translation,
            look_at,
        };

        let was_following = follow.mode.is_following();
        let Some(change) = follow.apply(*request, current) else {
            continue;
        };

        match (was_following, follow.mode.is_following()) {
            (false, true) => freeze_pan_orbit(&mut pan_orbit),
            (true, false) => hand_back_to_pan_orbit(&mut pan_orbit, current),
            _ => {}
        }

        match change {
            SelectionChange::Selected(body) => info!("Selected {}", body),
            SelectionChange::Deselected(body) => info!("Deselected {} ({:?})", body, request),
        }
        changes.write(change);
    }
}

/// Stop PanOrbit from touching the camera while following: input is gated
/// by `enabled`, and pending smoothing is settled by pinning every target to
/// its current value.
fn freeze_pan_orbit(pan_orbit: &mut PanOrbitCamera) {
    pan_orbit.enabled = false;
    pan_orbit.target_focus = pan_orbit.focus;
    if let Some(radius) = pan_orbit.radius {
        pan_orbit.target_radius = radius;
    }
    if let Some(yaw) = pan_orbit.yaw {
        pan_orbit.target_yaw = yaw;
    }
    if let Some(pitch) = pan_orbit.pitch {
        pan_orbit.target_pitch = pitch;
    }
    pan_orbit.force_update = false;
}

/// Reseed PanOrbit from the camera's pose so manual control resumes in place.
fn hand_back_to_pan_orbit(pan_orbit: &mut PanOrbitCamera, pose: CameraPose) {
    let (radius, yaw, pitch) = orbit_angles(pose.position - pose.look_at);

    pan_orbit.focus = pose.look_at;
    pan_orbit.target_focus = pose.look_at;
    pan_orbit.radius = Some(radius);
    pan_orbit.target_radius = radius;
    pan_orbit.yaw = Some(yaw);
    pan_orbit.target_yaw = yaw;
    pan_orbit.pitch = Some(pitch);
    pan_orbit.target_pitch = pitch;
    pan_orbit.force_update = true;
}

/// Third stage of the frame ordering: follow the selected body, or ease the
/// free camera's focus home after a deselection.
pub fn update_camera_follow(
    time: Res<Time>,
    config: Res<SceneConfig>,
    registry: Res<BodyRegistry>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut follow: ResMut<CameraFollow>,
    bodies: Query<&Transform, (With<OrbitingBody>, Without<MainCamera>)>,
    mut camera: Query<(&mut Transform, &mut PanOrbitCamera), With<MainCamera>>,
) {
    let Ok((mut cam_transform, mut pan_orbit)) = camera.single_mut() else {
        return;
    };
    let dt = time.delta_secs();
    let cam_cfg = &config.camera;

    match follow.mode {
        CameraMode::Following { body, .. } => {
            pan_orbit.enabled = false;

            // Not yet attached: hold this frame.
            let Some(body_pos) = registry
                .get(body)
                .and_then(|entity| bodies.get(entity).ok())
                .map(|t| t.translation)
            else {
                return;
            };

            let look_offset = responsive_look_offset(window.width(), cam_cfg);
            let Some(pose) = follow.step_following(
                dt,
                cam_cfg.follow_rate,
                body_pos,
                cam_cfg.follow_standoff,
                look_offset,
            ) else {
                return;
            };

            cam_transform.translation = pose.position;
            if let Some(rotation) = camera_rotation(pose, cam_cfg.up_alignment_threshold) {
                cam_transform.rotation = rotation;
            }
        }
        CameraMode::Returning { .. } => {
            pan_orbit.enabled = true;
            if let Some(focus) = follow.step_returning(dt, cam_cfg.return_rate) {
                pan_orbit.focus = focus;
                pan_orbit.target_focus = focus;
                pan_orbit.force_update = true;
            }
        }
        CameraMode::Idle => {
            pan_orbit.enabled = true;
        }
    }
}

/// Set the starting camera distance once, from the first frame's viewport.
pub fn fit_initial_camera_distance(
    mut done: Local<bool>,
    config: Res<SceneConfig>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut camera: Query<&mut PanOrbitCamera, With<MainCamera>>,
) {
    if *done {
        return;
    }
    let Ok(mut pan_orbit) = camera.single_mut() else {
        return;
    };
    let distance = initial_camera_distance(window.width(), window.height(), &config.camera);
    pan_orbit.radius = Some(distance);
    pan_orbit.target_radius = distance;
    pan_orbit.force_update = true;
    *done = true;
    info!(
        "Initial camera distance {:.1} for {}x{} viewport",
        distance,
        window.width(),
        window.height()
    );
}

//! Selection and camera-follow state machine
//!
//! `Idle` leaves the camera to PanOrbit. `Following` computes the camera pose
//! from the selected body every frame, eased in from the pose captured when
//! the selection happened. `Returning` eases the PanOrbit focus back to the
//! origin after a deselection, then settles in `Idle`.

use bevy::prelude::*;

use crate::bodies::BodyId;
use crate::core::easing::{advance_progress, smoothstep};
use crate::selection::camera::{CameraPose, follow_target};

/// Interpolation record for an in-flight camera transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransition {
    pub start: CameraPose,
    /// Raw progress in `[0, 1]`; eased with smoothstep when applied.
    pub progress: f32,
}

impl CameraTransition {
    pub fn from_pose(start: CameraPose) -> Self {
        Self {
            start,
            progress: 0.0,
        }
    }

    fn advance(&mut self, delta_secs: f32, rate: f32) -> f32 {
        self.progress = advance_progress(self.progress, delta_secs, rate);
        smoothstep(self.progress)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraMode {
    Idle,
    Following {
        body: BodyId,
        transition: CameraTransition,
    },
    Returning {
        transition: CameraTransition,
    },
}

/// Inputs that drive selection.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionRequest {
    /// Pointer click. `None` is the background or the central body.
    Click(Option<BodyId>),
    /// Keyboard selection; never toggles off.
    Select(BodyId),
    Deselect,
    /// The user started dragging or zooming the free camera.
    ManualCamera,
}

/// Emitted whenever the selected body changes.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    Selected(BodyId),
    Deselected(BodyId),
}

impl CameraMode {
    pub fn selected_body(&self) -> Option<BodyId> {
        match self {
            CameraMode::Following { body, .. } => Some(*body),
            _ => None,
        }
    }

    pub fn is_following(&self) -> bool {
        matches!(self, CameraMode::Following { .. })
    }

    /// Transition function. `current` is the camera pose at the instant the
    /// request is handled; it becomes the start of any new transition.
    pub fn transition(
        self,
        request: SelectionRequest,
        current: CameraPose,
    ) -> (CameraMode, Option<SelectionChange>) {
        let target = match request {
            SelectionRequest::Click(Some(body)) if self.selected_body() == Some(body) => None,
            SelectionRequest::Click(Some(body)) | SelectionRequest::Select(body) => Some(body),
            SelectionRequest::Click(None)
            | SelectionRequest::Deselect
            | SelectionRequest::ManualCamera => None,
        };

        match (self, target) {
            (CameraMode::Following { body: current_body, .. }, Some(body))
                if current_body == body =>
            {
                // Programmatic re-selection of the followed body keeps the
                // transition running.
                (self, None)
            }
            (_, Some(body)) => (
                CameraMode::Following {
                    body,
                    transition: CameraTransition::from_pose(current),
                },
                Some(SelectionChange::Selected(body)),
            ),
            (CameraMode::Following { body, .. }, None) => (
                CameraMode::Returning {
                    transition: CameraTransition::from_pose(current),
                },
                Some(SelectionChange::Deselected(body)),
            ),
            (mode, None) => (mode, None),
        }
    }
}

/// Selection state plus the last look-at point the follow camera used.
#[derive(Resource, Debug)]
pub struct CameraFollow {
    pub mode: CameraMode,
    pub look_at: Vec3,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            mode: CameraMode::Idle,
            look_at: Vec3::ZERO,
        }
    }
}

impl CameraFollow {
    pub fn selected_body(&self) -> Option<BodyId> {
        self.mode.selected_body()
    }

    pub fn apply(&mut self, request: SelectionRequest, current: CameraPose) -> Option<SelectionChange> {
        let (mode, change) = self.mode.transition(request, current);
        self.mode = mode;
        change
    }

    /// Per-frame update while following. Returns the camera pose to apply.
    ///
    /// The target moves with the body, so after the transition completes the
    /// pose keeps tracking it rather than settling at a fixed point.
    pub fn step_following(
        &mut self,
        delta_secs: f32,
        rate: f32,
        body_pos: Vec3,
        standoff: f32,
        look_offset: Vec2,
    ) -> Option<CameraPose> {
        let CameraMode::Following { transition, .. } = &mut self.mode else {
            return None;
        };
        let eased = transition.advance(delta_secs, rate);
        let target = follow_target(body_pos, standoff, look_offset);
        let pose = transition.start.lerp(target, eased);
        self.look_at = pose.look_at;
        Some(pose)
    }

    /// Per-frame update while returning. Returns the focus point for the
    /// free camera; moves to `Idle` once the transition completes.
    pub fn step_returning(&mut self, delta_secs: f32, rate: f32) -> Option<Vec3> {
        let CameraMode::Returning { transition } = &mut self.mode else {
            return None;
        };
        let eased = transition.advance(delta_secs, rate);
        let focus = transition.start.look_at.lerp(Vec3::ZERO, eased);
        self.look_at = focus;
        if transition.progress >= 1.0 {
            self.mode = CameraMode::Idle;
        }
        Some(focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn pose(x: f32) -> CameraPose {
        CameraPose {
            position: Vec3::new(x, 0.0, 40.0),
            look_at: Vec3::ZERO,
        }
    }

    fn follow(follow: &mut CameraFollow, body_pos: Vec3, frames: usize) -> CameraPose {
        let mut last = None;
        for _ in 0..frames {
            last = follow.step_following(1.0 / 60.0, 0.8, body_pos, 5.0, Vec2::ZERO);
        }
        last.unwrap()
    }

    #[test]
    fn test_click_body_from_idle_starts_following() {
        let mut state = CameraFollow::default();
        let change = state.apply(SelectionRequest::Click(Some(BodyId::Moon)), pose(0.0));
        assert_eq!(change, Some(SelectionChange::Selected(BodyId::Moon)));
        match state.mode {
            CameraMode::Following { body, transition } => {
                assert_eq!(body, BodyId::Moon);
                assert_eq!(transition.start, pose(0.0));
                assert_eq!(transition.progress, 0.0);
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_retarget_captures_current_camera_position() {
        let mut state = CameraFollow::default();
        state.apply(SelectionRequest::Click(Some(BodyId::Satellite)), pose(0.0));
        let mid_flight = follow(&mut state, Vec3::new(10.0, 0.0, 0.0), 30);

        let change = state.apply(SelectionRequest::Click(Some(BodyId::Shuttle)), mid_flight);
        assert_eq!(change, Some(SelectionChange::Selected(BodyId::Shuttle)));
        match state.mode {
            CameraMode::Following { body, transition } => {
                assert_eq!(body, BodyId::Shuttle);
                assert_eq!(transition.start.position, mid_flight.position);
                assert_eq!(transition.progress, 0.0);
                // Not the previous body's final target.
                let old_target = follow_target(Vec3::new(10.0, 0.0, 0.0), 5.0, Vec2::ZERO);
                assert!((transition.start.position - old_target.position).length() > 1.0);
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_deselect_paths_all_return() {
        for request in [
            SelectionRequest::Click(None),
            SelectionRequest::Click(Some(BodyId::Moon)),
            SelectionRequest::Deselect,
            SelectionRequest::ManualCamera,
        ] {
            let mut state = CameraFollow::default();
            state.apply(SelectionRequest::Select(BodyId::Moon), pose(0.0));
            let change = state.apply(request, pose(3.0));
            assert_eq!(change, Some(SelectionChange::Deselected(BodyId::Moon)), "{request:?}");
            assert!(matches!(state.mode, CameraMode::Returning { .. }), "{request:?}");
        }
    }

    #[test]
    fn test_deselect_while_idle_is_noop() {
        let mut state = CameraFollow::default();
        assert_eq!(state.apply(SelectionRequest::Click(None), pose(0.0)), None);
        assert_eq!(state.apply(SelectionRequest::ManualCamera, pose(0.0)), None);
        assert_eq!(state.mode, CameraMode::Idle);
    }

    #[test]
    fn test_programmatic_select_does_not_toggle() {
        let mut state = CameraFollow::default();
        state.apply(SelectionRequest::Select(BodyId::Shuttle), pose(0.0));
        follow(&mut state, Vec3::new(0.0, 0.0, 12.0), 10);
        let before = state.mode;
        assert_eq!(state.apply(SelectionRequest::Select(BodyId::Shuttle), pose(9.0)), None);
        assert_eq!(state.mode, before);
    }

    #[test]
    fn test_following_eases_then_tracks_moving_target() {
        let mut state = CameraFollow::default();
        let start = pose(0.0);
        state.apply(SelectionRequest::Select(BodyId::Satellite), start);

        let body = Vec3::new(10.0, 0.0, 0.0);
        let first = state
            .step_following(1.0 / 60.0, 0.8, body, 5.0, Vec2::ZERO)
            .unwrap();
        // Smoothstep starts slowly: barely moved after one frame.
        assert!((first.position - start.position).length() < 0.1);

        // After the transition completes the pose sits on the moving target.
        follow(&mut state, body, 120);
        let moved = Vec3::new(0.0, 0.0, 10.0);
        let tracked = state
            .step_following(1.0 / 60.0, 0.8, moved, 5.0, Vec2::ZERO)
            .unwrap();
        assert!((tracked.position - Vec3::new(0.0, 0.0, 15.0)).length() < EPSILON);
        assert!((state.look_at - moved).length() < EPSILON);
    }

    #[test]
    fn test_returning_eases_focus_to_origin_then_idles() {
        let mut state = CameraFollow::default();
        state.apply(SelectionRequest::Select(BodyId::Moon), pose(0.0));
        let followed = follow(&mut state, Vec3::new(0.0, 0.0, 20.0), 120);
        state.apply(SelectionRequest::Click(None), followed);

        let first = state.step_returning(0.1, 0.8).unwrap();
        assert!(first.length() > 0.0);
        assert!(first.length() < followed.look_at.length());

        let mut last = first;
        for _ in 0..30 {
            if let Some(focus) = state.step_returning(0.1, 0.8) {
                last = focus;
            }
        }
        assert!(last.length() < EPSILON);
        assert_eq!(state.mode, CameraMode::Idle);
        assert_eq!(state.step_returning(0.1, 0.8), None);
    }

    #[test]
    fn test_reselect_during_return_resumes_without_snapping() {
        let mut state = CameraFollow::default();
        state.apply(SelectionRequest::Select(BodyId::Moon), pose(0.0));
        let body = Vec3::new(0.0, 0.0, 20.0);
        let followed = follow(&mut state, body, 120);

        state.apply(SelectionRequest::Click(None), followed);
        state.step_returning(0.1, 0.8);
        assert!(matches!(state.mode, CameraMode::Returning { .. }));

        let current = CameraPose {
            position: followed.position,
            look_at: state.look_at,
        };
        let change = state.apply(SelectionRequest::Click(Some(BodyId::Moon)), current);
        assert_eq!(change, Some(SelectionChange::Selected(BodyId::Moon)));
        assert!(state.mode.is_following());

        let next = state
            .step_following(1.0 / 60.0, 0.8, body, 5.0, Vec2::ZERO)
            .unwrap();
        assert!((next.look_at - current.look_at).length() < 0.05);
        assert!((next.position - current.position).length() < 0.05);
    }
}

//! Camera framing math for following a body and handing back to PanOrbit.

use bevy::prelude::*;

use crate::config::CameraConfig;
use crate::core::easing::inverse_lerp_clamped;

/// Up axis blended in when the view direction nears world-up.
const ALTERNATE_UP: Vec3 = Vec3::Z;

/// Camera position plus the point it looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn lerp(self, target: CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(target.position, t),
            look_at: self.look_at.lerp(target.look_at, t),
        }
    }
}

/// Target pose for following a body at `body_pos`.
///
/// The camera sits `standoff` beyond the body on the ray from the origin.
/// The look-at point is shifted along the body's local right/up axes by
/// `look_offset` so the body sits off-center in frame.
pub fn follow_target(body_pos: Vec3, standoff: f32, look_offset: Vec2) -> CameraPose {
    let radial = body_pos.try_normalize().unwrap_or(Vec3::Z);
    let right = Vec3::Y.cross(radial).try_normalize().unwrap_or(Vec3::X);
    let up = radial.cross(right);

    CameraPose {
        position: body_pos + radial * standoff,
        look_at: body_pos + right * look_offset.x + up * look_offset.y,
    }
}

/// Look-at offset for the current viewport width, interpolated between the
/// narrow and wide settings.
pub fn responsive_look_offset(viewport_width: f32, config: &CameraConfig) -> Vec2 {
    let t = inverse_lerp_clamped(config.narrow_width, config.wide_width, viewport_width);
    Vec2::from(config.look_offset_narrow).lerp(Vec2::from(config.look_offset_wide), t)
}

/// Up vector for a camera looking along `forward`.
///
/// Past `threshold` alignment with world-up, blends toward an alternate axis
/// in proportion to how close to parallel the two are.
pub fn stabilized_up(forward: Vec3, threshold: f32) -> Vec3 {
    let alignment = forward.dot(Vec3::Y).abs();
    if alignment <= threshold || threshold >= 1.0 {
        return Vec3::Y;
    }
    let blend = ((alignment - threshold) / (1.0 - threshold)).clamp(0.0, 1.0);
    Vec3::Y.lerp(ALTERNATE_UP, blend).normalize()
}

/// Rotation for a camera at `pose.position` facing `pose.look_at`.
pub fn camera_rotation(pose: CameraPose, up_threshold: f32) -> Option<Quat> {
    let forward = (pose.look_at - pose.position).try_normalize()?;
    let up = stabilized_up(forward, up_threshold);
    Some(
        Transform::from_translation(pose.position)
            .looking_at(pose.look_at, up)
            .rotation,
    )
}

/// PanOrbit parameters (radius, yaw, pitch) for a camera at `offset` from
/// its focus.
pub fn orbit_angles(offset: Vec3) -> (f32, f32, f32) {
    let radius = offset.length();
    let Some(direction) = offset.try_normalize() else {
        return (radius, 0.0, 0.0);
    };
    let pitch = direction.y.clamp(-1.0, 1.0).asin();
    let yaw = direction.x.atan2(direction.z);
    (radius, yaw, pitch)
}

/// One-time initial camera distance from the viewport aspect ratio.
///
/// Viewports narrower than the reference aspect move the camera back so the
/// scene still fits horizontally.
pub fn initial_camera_distance(width: f32, height: f32, config: &CameraConfig) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        return config.initial_distance;
    }
    let aspect = width / height;
    config.initial_distance * (config.reference_aspect / aspect).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_follow_target_stands_off_radially() {
        let body = Vec3::new(10.0, 0.0, 0.0);
        let pose = follow_target(body, 5.0, Vec2::ZERO);
        assert!((pose.position - Vec3::new(15.0, 0.0, 0.0)).length() < EPSILON);
        assert!((pose.look_at - body).length() < EPSILON);
    }

    #[test]
    fn test_follow_target_offsets_look_at_sideways() {
        let body = Vec3::new(0.0, 0.0, 10.0);
        let pose = follow_target(body, 4.0, Vec2::new(2.0, 1.0));
        let offset = pose.look_at - body;

        // Offset is perpendicular to the radial direction.
        assert!(offset.dot(body.normalize()).abs() < EPSILON);
        assert!((offset.length() - 5.0_f32.sqrt()).abs() < EPSILON);
        assert!((offset.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_follow_target_above_pole_uses_fallback_axes() {
        let pose = follow_target(Vec3::new(0.0, 8.0, 0.0), 2.0, Vec2::new(1.0, 0.0));
        assert!(pose.position.is_finite());
        assert!(pose.look_at.is_finite());
        assert!((pose.position - Vec3::new(0.0, 10.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_responsive_offset_shrinks_on_narrow_viewports() {
        let config = CameraConfig::default();
        let wide = responsive_look_offset(1920.0, &config);
        let narrow = responsive_look_offset(320.0, &config);
        assert_eq!(wide, Vec2::from(config.look_offset_wide));
        assert_eq!(narrow, Vec2::from(config.look_offset_narrow));

        let mid_width = (config.narrow_width + config.wide_width) / 2.0;
        let mid = responsive_look_offset(mid_width, &config);
        let expected = (wide + narrow) / 2.0;
        assert!((mid - expected).length() < EPSILON);
    }

    #[test]
    fn test_stabilized_up_below_threshold_is_world_up() {
        let forward = Vec3::new(1.0, 0.5, 0.0).normalize();
        assert_eq!(stabilized_up(forward, 0.9), Vec3::Y);
    }

    #[test]
    fn test_stabilized_up_blends_continuously_near_pole() {
        let mut last = Vec3::Y;
        for step in 0..=20 {
            let tilt = 0.45 - step as f32 * 0.02;
            let forward = Vec3::new(tilt.sin(), -tilt.cos(), 0.0).normalize();
            let up = stabilized_up(forward, 0.9);
            assert!((up.length() - 1.0).abs() < EPSILON);
            // No sudden flips between adjacent samples.
            assert!(up.dot(last) > 0.9);
            last = up;
        }
        let straight_down = stabilized_up(Vec3::NEG_Y, 0.9);
        assert!((straight_down - ALTERNATE_UP).length() < EPSILON);
    }

    #[test]
    fn test_camera_rotation_faces_look_at() {
        let pose = CameraPose {
            position: Vec3::new(0.0, 0.0, 20.0),
            look_at: Vec3::ZERO,
        };
        let rotation = camera_rotation(pose, 0.9).unwrap();
        let forward = rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < EPSILON);

        let overhead = CameraPose {
            position: Vec3::new(0.0, 20.0, 0.0),
            look_at: Vec3::ZERO,
        };
        let rotation = camera_rotation(overhead, 0.9).unwrap();
        assert!(rotation.is_finite());
        assert!(((rotation * Vec3::NEG_Z) - Vec3::NEG_Y).length() < EPSILON);
    }

    #[test]
    fn test_camera_rotation_degenerate_pose() {
        let pose = CameraPose {
            position: Vec3::ONE,
            look_at: Vec3::ONE,
        };
        assert!(camera_rotation(pose, 0.9).is_none());
    }

    #[test]
    fn test_orbit_angles_reconstruct_position() {
        let offset = Vec3::new(3.0, 4.0, -12.0);
        let (radius, yaw, pitch) = orbit_angles(offset);
        let rebuilt = Vec3::new(
            radius * pitch.cos() * yaw.sin(),
            radius * pitch.sin(),
            radius * pitch.cos() * yaw.cos(),
        );
        assert!((rebuilt - offset).length() < EPSILON);
    }

    #[test]
    fn test_initial_distance_grows_on_portrait_viewports() {
        let config = CameraConfig::default();
        let landscape = initial_camera_distance(1920.0, 1080.0, &config);
        let portrait = initial_camera_distance(390.0, 844.0, &config);
        assert!((landscape - config.initial_distance).abs() < 1e-3);
        assert!(portrait > landscape);
        assert_eq!(initial_camera_distance(0.0, 0.0, &config), config.initial_distance);
    }
}

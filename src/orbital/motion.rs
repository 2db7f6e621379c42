//! Fixed-tilt circular orbit motion.
//!
//! Bodies move on a circle of fixed radius in the XZ-plane. The tilt is
//! applied as a rotation about X by reprojecting the raw Z component:
//! `y = sin(tilt) · z_raw`, `z = cos(tilt) · z_raw`.

use bevy::prelude::*;

/// Orbital parameters for one body. Angles in radians.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct OrbitParams {
    pub radius: f32,
    /// Radians per second. Negative values orbit clockwise.
    pub angular_speed: f32,
    pub tilt: f32,
    pub phase: f32,
}

/// Accumulated orbit angle, advanced every frame by `angular_speed · delta`.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitAngle(pub f32);

impl OrbitParams {
    pub fn initial_angle(&self) -> OrbitAngle {
        OrbitAngle(self.phase)
    }

    /// Position on the tilted circle for the given accumulated angle.
    pub fn position(&self, angle: f32) -> Vec3 {
        let x = self.radius * angle.cos();
        let z_raw = self.radius * angle.sin();
        Vec3::new(x, self.tilt.sin() * z_raw, self.tilt.cos() * z_raw)
    }

    /// Unit direction of travel at `angle`, from the analytic derivative of
    /// [`Self::position`] with respect to the angle.
    pub fn velocity_direction(&self, angle: f32) -> Vec3 {
        let dx = -angle.sin();
        let dz_raw = angle.cos();
        let tangent = Vec3::new(dx, self.tilt.sin() * dz_raw, self.tilt.cos() * dz_raw);
        if self.angular_speed < 0.0 {
            -tangent
        } else {
            tangent
        }
    }

    /// Normal of the tilted orbital plane.
    pub fn plane_normal(&self) -> Vec3 {
        Vec3::new(0.0, self.tilt.cos(), -self.tilt.sin())
    }
}

impl OrbitAngle {
    /// Advance by one frame. The angle wraps to keep `f32` precision stable
    /// over long sessions.
    pub fn advance(&mut self, params: &OrbitParams, delta_secs: f32) {
        self.0 = (self.0 + params.angular_speed * delta_secs).rem_euclid(std::f32::consts::TAU);
    }
}

/// Per-frame orbit update; the first stage of the frame ordering.
pub fn advance_orbits(
    time: Res<Time>,
    mut query: Query<(&OrbitParams, &mut OrbitAngle, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (params, mut angle, mut transform) in query.iter_mut() {
        angle.advance(params, dt);
        transform.translation = params.position(angle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPSILON: f32 = 1e-4;

    fn params(tilt: f32) -> OrbitParams {
        OrbitParams {
            radius: 10.0,
            angular_speed: 1.0,
            tilt,
            phase: 0.0,
        }
    }

    fn angle_after(params: &OrbitParams, elapsed: f32, frames: usize) -> f32 {
        let mut angle = params.initial_angle();
        let dt = elapsed / frames as f32;
        for _ in 0..frames {
            angle.advance(params, dt);
        }
        angle.0
    }

    #[test]
    fn test_quarter_and_half_orbit_positions() {
        let p = params(0.0);

        let quarter = p.position(angle_after(&p, FRAC_PI_2, 60));
        assert!((quarter - Vec3::new(0.0, 0.0, 10.0)).length() < EPSILON);

        let half = p.position(angle_after(&p, PI, 120));
        assert!((half - Vec3::new(-10.0, 0.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_distance_in_untilted_plane_equals_radius() {
        for tilt in [0.0, 0.3, FRAC_PI_4, 1.2] {
            let p = params(tilt);
            for step in 0..64 {
                let angle = step as f32 * 0.37;
                let pos = p.position(angle);
                // Undo the tilt reprojection to recover the raw XZ point.
                let z_raw = pos.z * tilt.cos() + pos.y * tilt.sin();
                let planar = Vec2::new(pos.x, z_raw).length();
                assert!((planar - 10.0).abs() < EPSILON, "tilt {tilt} angle {angle}");
                assert!((pos.length() - 10.0).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_tilt_lifts_orbit_out_of_xz_plane() {
        let p = params(FRAC_PI_2 / 3.0);
        let pos = p.position(FRAC_PI_2);
        assert!((pos.y - 10.0 * (FRAC_PI_2 / 3.0).sin()).abs() < EPSILON);
        assert!(pos.dot(p.plane_normal()).abs() < EPSILON);
    }

    #[test]
    fn test_velocity_direction_is_unit_tangent() {
        let p = params(0.4);
        for step in 0..32 {
            let angle = step as f32 * 0.2;
            let v = p.velocity_direction(angle);
            assert!((v.length() - 1.0).abs() < EPSILON);
            assert!(v.dot(p.position(angle)).abs() < 1e-3);

            // Matches the finite-difference direction of travel.
            let ahead = p.position(angle + 1e-3) - p.position(angle);
            assert!(v.dot(ahead.normalize()) > 0.999);
        }
    }

    #[test]
    fn test_retrograde_velocity_is_reversed() {
        let mut p = params(0.0);
        p.angular_speed = -0.5;
        let v = p.velocity_direction(0.0);
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < EPSILON);
    }

    #[test]
    fn test_angle_wraps() {
        let p = params(0.0);
        let mut angle = OrbitAngle(6.0);
        angle.advance(&p, 1.0);
        assert!(angle.0 >= 0.0 && angle.0 < std::f32::consts::TAU);
        assert!((angle.0 - (7.0 - std::f32::consts::TAU)).abs() < EPSILON);
    }
}

//! Orbital motion module
//!
//! Fixed-tilt circular orbits and the attitude models that ride on them.

use bevy::prelude::*;

use crate::core::SceneSet;

pub mod motion;
pub mod nadir;

pub use motion::{OrbitParams, advance_orbits};
pub use nadir::{Attitude, orient_bodies};

/// Plugin for per-frame orbit motion and attitude updates
pub struct OrbitalPlugin;

impl Plugin for OrbitalPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_orbits.in_set(SceneSet::Motion))
            .add_systems(Update, orient_bodies.in_set(SceneSet::Orientation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use crate::core::CorePlugin;
    use crate::orbital::motion::OrbitAngle;
    use crate::orbital::nadir::nadir_rotation;

    #[test]
    fn test_orientation_follows_this_frames_angle() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(250)))
            .add_plugins((CorePlugin, OrbitalPlugin));

        let params = OrbitParams {
            radius: 10.0,
            angular_speed: 2.0,
            tilt: 0.5,
            phase: 0.0,
        };
        let body = app
            .world_mut()
            .spawn((
                params,
                params.initial_angle(),
                Attitude::FacesOrigin { blend: 1.0 },
                Transform::default(),
            ))
            .id();

        app.update();
        let previous = app.world().get::<OrbitAngle>(body).unwrap().0;
        app.update();
        let current = app.world().get::<OrbitAngle>(body).unwrap().0;
        assert!((current - previous - 0.5).abs() < 1e-4);

        let transform = app.world().get::<Transform>(body).unwrap();
        let expected = nadir_rotation(&params, current).unwrap();
        let stale = nadir_rotation(&params, previous).unwrap();
        assert!(transform.rotation.angle_between(expected) < 1e-3);
        assert!(transform.rotation.angle_between(stale) > 0.1);
        assert!(transform.translation.distance(params.position(current)) < 1e-4);
    }
}

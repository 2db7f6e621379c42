//! Attitude models: nadir pointing and free spin.
//!
//! A nadir-pointing body keeps its local -Y axis on the direction to the
//! origin and its local -Z axis along the direction of travel. The target
//! attitude is approached by a fixed-factor slerp each frame.

use bevy::prelude::*;

use crate::orbital::motion::{OrbitAngle, OrbitParams};

/// Below this length the `forward × up` cross product is treated as degenerate.
pub const DEGENERATE_CROSS_LEN: f32 = 1e-3;

/// A fallback axis is rejected if it can come this close to parallel with the
/// nadir direction somewhere on the orbit (|cos| of the smallest angle).
pub const FALLBACK_MAX_ALIGNMENT: f32 = 0.95;

/// How a body's rotation evolves each frame.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum Attitude {
    /// Track the nadir attitude, blending by `blend` per frame.
    FacesOrigin { blend: f32 },
    /// Accumulating spin about local Y.
    Spin { speed: f32, angle: f32 },
}

/// Orthonormal nadir basis for a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NadirBasis {
    pub right: Vec3,
    /// Away from the origin; local +Y.
    pub up: Vec3,
    /// Opposite the direction of travel; local +Z.
    pub back: Vec3,
    /// True when the fallback axis replaced a degenerate right vector.
    pub used_fallback: bool,
}

impl NadirBasis {
    pub fn rotation(&self) -> Quat {
        Quat::from_mat3(&Mat3::from_cols(self.right, self.up, self.back)).normalize()
    }
}

/// Fixed world axis substituted for `right` when the basis degenerates.
///
/// Nadir directions sweep the orbital plane, so the axis is chosen per tilt:
/// world Y for orbits closer to equatorial, world Z otherwise.
pub fn fallback_axis(params: &OrbitParams) -> Vec3 {
    if params.tilt.cos().abs() >= params.tilt.sin().abs() {
        Vec3::Y
    } else {
        Vec3::Z
    }
}

/// Largest |cos| between the fallback axis and any nadir direction on the
/// orbit. The nadir direction spans the orbital plane, so this is the length
/// of the axis' projection onto that plane.
pub fn fallback_alignment(params: &OrbitParams) -> f32 {
    let axis = fallback_axis(params);
    let along_normal = axis.dot(params.plane_normal());
    (1.0 - along_normal * along_normal).max(0.0).sqrt()
}

/// Build the nadir basis from position and direction of travel.
///
/// Returns `None` when the body sits at the origin and no nadir exists.
pub fn nadir_basis(position: Vec3, velocity_dir: Vec3, fallback: Vec3) -> Option<NadirBasis> {
    let up = position.try_normalize()?;
    let down = -up;

    // Direction of travel projected onto the plane perpendicular to nadir.
    let forward = velocity_dir - down * velocity_dir.dot(down);

    let cross = forward.cross(up);
    let (right, used_fallback) = if cross.length() < DEGENERATE_CROSS_LEN {
        let projected = fallback - up * fallback.dot(up);
        (projected.try_normalize()?, true)
    } else {
        (cross.normalize(), false)
    };
    let back = right.cross(up).normalize();

    Some(NadirBasis {
        right,
        up,
        back,
        used_fallback,
    })
}

/// Target nadir attitude for a body on its orbit.
pub fn nadir_rotation(params: &OrbitParams, angle: f32) -> Option<Quat> {
    nadir_basis(
        params.position(angle),
        params.velocity_direction(angle),
        fallback_axis(params),
    )
    .map(|basis| basis.rotation())
}

/// Second stage of the frame ordering: attitude from this frame's position.
pub fn orient_bodies(
    time: Res<Time>,
    mut query: Query<(&OrbitParams, &OrbitAngle, &mut Attitude, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (params, angle, mut attitude, mut transform) in query.iter_mut() {
        match &mut *attitude {
            Attitude::FacesOrigin { blend } => {
                let Some(target) = nadir_rotation(params, angle.0) else {
                    continue;
                };
                transform.rotation = transform.rotation.slerp(target, blend.clamp(0.0, 1.0));
            }
            Attitude::Spin { speed, angle } => {
                *angle = (*angle + *speed * dt).rem_euclid(std::f32::consts::TAU);
                transform.rotation = Quat::from_rotation_y(*angle);
            }
        }
    }
}

//! Scene construction and per-body presentation systems

use bevy::prelude::*;

use crate::bodies::components::{BodyId, CentralBody, HoverHighlight, OrbitingBody};
use crate::bodies::resources::BodyRegistry;
use crate::config::{BodyConfig, SceneConfig};
use crate::hover::{HoverEnded, HoverLabel};
use crate::orbital::Attitude;
use crate::orbital::nadir::nadir_rotation;

/// Spawn the central object and every configured orbiting body.
pub fn spawn_scene_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    config: Res<SceneConfig>,
    mut registry: ResMut<BodyRegistry>,
) {
    let central = &config.central_body;
    let mut central_entity = commands.spawn((
        Transform::IDENTITY,
        Visibility::Visible,
        CentralBody,
        Name::new("Central Body"),
    ));
    match &central.model {
        Some(path) => {
            info!("Loading central body model {}", path);
            central_entity.insert((
                SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone()))),
                Transform::from_scale(Vec3::splat(central.model_scale)),
            ));
        }
        None => {
            central_entity.insert((
                Mesh3d(meshes.add(Sphere::new(central.radius).mesh().uv(64, 32))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb(0.18, 0.38, 0.72),
                    perceptual_roughness: 0.8,
                    ..default()
                })),
            ));
        }
    }

    for body in &config.bodies {
        let params = body.orbit_params();
        let angle = params.initial_angle();
        let attitude = initial_attitude(body, config.camera.orientation_blend);

        let mut transform =
            Transform::from_translation(params.position(angle.0)).with_scale(Vec3::splat(body.scale));
        if matches!(attitude, Attitude::FacesOrigin { .. })
            && let Some(rotation) = nadir_rotation(&params, angle.0)
        {
            // Start on target so the first frames don't sweep from identity.
            transform.rotation = rotation;
        }

        let mut entity = commands.spawn((
            OrbitingBody {
                id: body.id,
                scale: body.scale,
            },
            params,
            angle,
            attitude,
            transform,
            Visibility::Visible,
            HoverHighlight::default(),
            Name::new(format!("Body: {}", body.id)),
        ));

        match &body.model {
            Some(path) => {
                entity.insert(SceneRoot(
                    asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone())),
                ));
            }
            None => {
                entity.insert((
                    Mesh3d(meshes.add(primitive_mesh(body.id))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: primitive_color(body.id),
                        perceptual_roughness: 0.6,
                        ..default()
                    })),
                ));
            }
        }

        registry.insert(body.id, entity.id());
        info!(
            "Spawned body {} (radius {}, tilt {}°, faces origin: {})",
            body.id, body.radius, body.tilt_deg, body.faces_origin
        );
    }
}

fn initial_attitude(body: &BodyConfig, blend: f32) -> Attitude {
    if body.faces_origin {
        Attitude::FacesOrigin { blend }
    } else {
        Attitude::Spin {
            speed: body.spin_speed,
            angle: 0.0,
        }
    }
}

fn primitive_mesh(id: BodyId) -> Mesh {
    match id {
        BodyId::Satellite => Mesh::from(Cuboid::new(1.0, 0.5, 1.6)),
        BodyId::Shuttle => Mesh::from(Capsule3d::new(0.35, 1.4)),
        BodyId::Moon => Sphere::new(1.0).mesh().uv(48, 24),
    }
}

fn primitive_color(id: BodyId) -> Color {
    match id {
        BodyId::Satellite => Color::srgb(0.85, 0.78, 0.35),
        BodyId::Shuttle => Color::srgb(0.92, 0.92, 0.95),
        BodyId::Moon => Color::srgb(0.62, 0.62, 0.6),
    }
}

/// Walk up the hierarchy from a picked entity to its orbiting body, if any.
///
/// Models are multi-mesh scenes, so the hit is usually a descendant.
pub fn resolve_body(
    entity: Entity,
    bodies: &Query<&OrbitingBody>,
    parents: &Query<&ChildOf>,
) -> Option<BodyId> {
    let mut current = entity;
    loop {
        if let Ok(body) = bodies.get(current) {
            return Some(body.id);
        }
        let Ok(parent) = parents.get(current) else {
            return None;
        };
        current = parent.parent();
    }
}

/// Enlarge bodies whose label is showing; restore them when hover ends.
pub fn apply_hover_highlight(
    mut ended: MessageReader<HoverEnded>,
    mut query: Query<(
        &OrbitingBody,
        &HoverLabel,
        &mut HoverHighlight,
        &mut Transform,
    )>,
    config: Res<SceneConfig>,
) {
    for msg in ended.read() {
        for (body, _, mut highlight, _) in query.iter_mut() {
            if body.id == msg.body {
                highlight.active = false;
                debug!("Hover ended on {}", body.id);
            }
        }
    }

    for (body, label, mut highlight, mut transform) in query.iter_mut() {
        if label.is_visible() {
            highlight.active = true;
        }
        let factor = if highlight.active {
            config.hover.highlight_scale
        } else {
            1.0
        };
        transform.scale = Vec3::splat(body.scale * factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::OrbitParams;

    #[test]
    fn test_initial_attitude_follows_faces_origin_flag() {
        let config = SceneConfig::default();
        for body in &config.bodies {
            let attitude = initial_attitude(body, 0.1);
            match attitude {
                Attitude::FacesOrigin { blend } => {
                    assert!(body.faces_origin);
                    assert_eq!(blend, 0.1);
                }
                Attitude::Spin { speed, angle } => {
                    assert!(!body.faces_origin);
                    assert_eq!(speed, body.spin_speed);
                    assert_eq!(angle, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_default_bodies_start_on_their_orbits() {
        let config = SceneConfig::default();
        for body in &config.bodies {
            let params: OrbitParams = body.orbit_params();
            let pos = params.position(params.initial_angle().0);
            assert!((pos.length() - body.radius).abs() < 1e-3);
        }
    }
}

//! Procedural starfield skybox
//!
//! Stars are scattered uniformly over the sphere from a fixed seed and baked
//! into a six-layer cubemap, then attached to the main camera as a `Skybox`.

use std::f32::consts::TAU;

use bevy::asset::RenderAssetUsages;
use bevy::core_pipeline::Skybox;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use rand::prelude::*;

use crate::config::{SceneConfig, StarfieldConfig};
use crate::core::MainCamera;

const CUBE_FACES: usize = 6;
const BYTES_PER_TEXEL: usize = 4;

/// Higher values push most stars dim with a few bright ones.
const BRIGHTNESS_FALLOFF: f32 = 4.0;
const MIN_STAR_LEVEL: f32 = 0.2;

pub struct StarfieldPlugin;

impl Plugin for StarfieldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, build_starfield)
            .add_systems(Update, attach_starfield);
    }
}

#[derive(Resource)]
pub struct Starfield {
    pub image: Handle<Image>,
    pub brightness: f32,
}

/// Face index and texel for a direction, with faces in +X, -X, +Y, -Y, +Z, -Z
/// order. `None` for the zero vector.
pub fn cube_texel(dir: Vec3, face_size: u32) -> Option<(usize, u32, u32)> {
    let abs = dir.abs();
    let (face, sc, tc, major) = if abs.x >= abs.y && abs.x >= abs.z {
        if dir.x > 0.0 {
            (0, -dir.z, -dir.y, abs.x)
        } else {
            (1, dir.z, -dir.y, abs.x)
        }
    } else if abs.y >= abs.z {
        if dir.y > 0.0 {
            (2, dir.x, dir.z, abs.y)
        } else {
            (3, dir.x, -dir.z, abs.y)
        }
    } else if dir.z > 0.0 {
        (4, dir.x, -dir.y, abs.z)
    } else {
        (5, -dir.x, -dir.y, abs.z)
    };

    if major <= f32::EPSILON || face_size == 0 {
        return None;
    }

    let to_texel = |c: f32| {
        let unit = (c / major + 1.0) * 0.5;
        ((unit * face_size as f32) as u32).min(face_size - 1)
    };
    Some((face, to_texel(sc), to_texel(tc)))
}

/// RGBA8 texel data for all six faces, layer after layer. Deterministic for
/// a given config.
pub fn starfield_texels(config: &StarfieldConfig) -> Vec<u8> {
    let face_size = config.face_size as usize;
    let face_bytes = face_size * face_size * BYTES_PER_TEXEL;
    let mut data = vec![0u8; face_bytes * CUBE_FACES];
    for texel in data.chunks_exact_mut(BYTES_PER_TEXEL) {
        texel[3] = u8::MAX;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    for _ in 0..config.count {
        // Uniform on the sphere: uniform height, uniform azimuth.
        let z: f32 = rng.gen_range(-1.0..=1.0);
        let theta: f32 = rng.gen_range(0.0..TAU);
        let ring = (1.0 - z * z).max(0.0).sqrt();
        let dir = Vec3::new(ring * theta.cos(), ring * theta.sin(), z);

        let roll: f32 = rng.gen_range(0.0..1.0);
        let level = MIN_STAR_LEVEL + (1.0 - MIN_STAR_LEVEL) * roll.powf(BRIGHTNESS_FALLOFF);
        let value = (level * f32::from(u8::MAX)).round() as u8;

        let Some((face, x, y)) = cube_texel(dir, config.face_size) else {
            continue;
        };
        let offset = face * face_bytes + (y as usize * face_size + x as usize) * BYTES_PER_TEXEL;
        for channel in &mut data[offset..offset + 3] {
            *channel = (*channel).max(value);
        }
    }
    data
}

fn build_starfield(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut images: ResMut<Assets<Image>>,
) {
    let stars = &config.starfield;
    if !stars.enabled {
        return;
    }

    let mut image = Image::new(
        Extent3d {
            width: stars.face_size,
            height: stars.face_size,
            depth_or_array_layers: CUBE_FACES as u32,
        },
        TextureDimension::D2,
        starfield_texels(stars),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });

    info!(
        "Starfield: {} stars on {}px cube faces (seed {:#x})",
        stars.count, stars.face_size, stars.seed
    );
    commands.insert_resource(Starfield {
        image: images.add(image),
        brightness: stars.brightness,
    });
}

fn attach_starfield(
    mut commands: Commands,
    starfield: Option<Res<Starfield>>,
    camera_query: Query<(Entity, Option<&Skybox>), With<MainCamera>>,
) {
    let Some(starfield) = starfield else {
        return;
    };
    if let Ok((camera_entity, skybox)) = camera_query.single()
        && skybox.is_none()
    {
        commands.entity(camera_entity).insert(Skybox {
            image: starfield.image.clone(),
            brightness: starfield.brightness,
            ..default()
        });
    }
}

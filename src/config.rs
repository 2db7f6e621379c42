//! Scene configuration
//!
//! Loaded once at startup from the platform config directory:
//! - macOS: ~/Library/Application Support/orbitscene/scene.json
//! - Linux: ~/.config/orbitscene/scene.json
//! - Windows: %APPDATA%\orbitscene\config\scene.json
//!
//! Every section falls back to its defaults when absent.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail, ensure};
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::bodies::BodyId;
use crate::orbital::OrbitParams;
use crate::orbital::nadir::{FALLBACK_MAX_ALIGNMENT, fallback_alignment};

const CONFIG_FILE: &str = "scene.json";

/// Upper bound for any configured duration. Larger values are rejected by
/// validation and clamped by [`secs_to_duration`].
pub const MAX_DURATION_SECS: f32 = 3600.0;

/// Seconds to `Duration`, clamped to `[0, MAX_DURATION_SECS]`. NaN maps to
/// zero.
pub fn secs_to_duration(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs.clamp(0.0, MAX_DURATION_SECS)).unwrap_or_default()
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub central_body: CentralBodyConfig,
    pub bodies: Vec<BodyConfig>,
    pub camera: CameraConfig,
    pub hover: HoverConfig,
    pub panel: PanelConfig,
    pub loading: LoadingConfig,
    pub starfield: StarfieldConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralBodyConfig {
    /// Radius of the built-in sphere.
    pub radius: f32,
    /// glTF asset path; replaces the sphere when set.
    pub model: Option<String>,
    /// Uniform scale applied to the model.
    pub model_scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub enabled: bool,
    pub count: u32,
    pub seed: u64,
    /// Texels per cubemap face edge.
    pub face_size: u32,
    pub brightness: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyConfig {
    pub id: BodyId,
    pub radius: f32,
    /// Radians per second.
    pub angular_speed: f32,
    #[serde(default)]
    pub tilt_deg: f32,
    #[serde(default)]
    pub phase_deg: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub faces_origin: bool,
    /// Radians per second, for bodies that do not face the origin.
    #[serde(default)]
    pub spin_speed: f32,
    /// glTF asset path; a primitive mesh is used when absent.
    #[serde(default)]
    pub model: Option<String>,
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub initial_distance: f32,
    /// Width/height ratio at which `initial_distance` applies unchanged.
    pub reference_aspect: f32,
    pub fov_deg: f32,
    /// Distance from the followed body, outward along its radial direction.
    pub follow_standoff: f32,
    pub follow_rate: f32,
    pub return_rate: f32,
    /// Look-at offset (right, up) from the followed body on wide viewports.
    pub look_offset_wide: [f32; 2],
    pub look_offset_narrow: [f32; 2],
    pub narrow_width: f32,
    pub wide_width: f32,
    /// |forward · world-up| above which the up vector is blended away.
    pub up_alignment_threshold: f32,
    /// Per-frame slerp factor for nadir-pointing bodies.
    pub orientation_blend: f32,
    /// Cursor travel in logical pixels before a held button counts as a drag.
    pub drag_threshold_px: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub hide_delay_secs: f32,
    /// Opacity per second while hovered.
    pub rise_rate: f32,
    /// Opacity per second after hover ends; slower than `rise_rate`.
    pub fall_rate: f32,
    pub label_standoff: f32,
    pub font: Option<String>,
    pub font_size: f32,
    /// Scale multiplier while a body's label is shown.
    pub highlight_scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub close_secs: f32,
    pub width_px: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub min_visible_secs: f32,
    pub fade_secs: f32,
    pub fade_buffer_secs: f32,
    pub parting_secs: f32,
    pub title: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            central_body: CentralBodyConfig::default(),
            bodies: vec![
                BodyConfig {
                    id: BodyId::Satellite,
                    radius: 10.0,
                    angular_speed: 0.35,
                    tilt_deg: 20.0,
                    phase_deg: 0.0,
                    scale: 0.6,
                    faces_origin: true,
                    spin_speed: 0.0,
                    model: None,
                },
                BodyConfig {
                    id: BodyId::Shuttle,
                    radius: 14.0,
                    angular_speed: 0.22,
                    tilt_deg: -35.0,
                    phase_deg: 120.0,
                    scale: 0.8,
                    faces_origin: true,
                    spin_speed: 0.0,
                    model: None,
                },
                BodyConfig {
                    id: BodyId::Moon,
                    radius: 22.0,
                    angular_speed: 0.08,
                    tilt_deg: 5.0,
                    phase_deg: 240.0,
                    scale: 1.6,
                    faces_origin: false,
                    spin_speed: 0.15,
                    model: None,
                },
            ],
            camera: CameraConfig::default(),
            hover: HoverConfig::default(),
            panel: PanelConfig::default(),
            loading: LoadingConfig::default(),
            starfield: StarfieldConfig::default(),
        }
    }
}

impl Default for CentralBodyConfig {
    fn default() -> Self {
        Self {
            radius: 6.0,
            model: None,
            model_scale: 1.0,
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 5000,
            seed: 0x5eed,
            face_size: 1024,
            brightness: 1000.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_distance: 75.0,
            reference_aspect: 16.0 / 9.0,
            fov_deg: 50.0,
            follow_standoff: 6.0,
            follow_rate: 0.8,
            return_rate: 0.8,
            look_offset_wide: [2.5, 0.8],
            look_offset_narrow: [0.6, 1.2],
            narrow_width: 480.0,
            wide_width: 1280.0,
            up_alignment_threshold: 0.9,
            orientation_blend: 0.1,
            drag_threshold_px: 4.0,
        }
    }
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            hide_delay_secs: 3.0,
            rise_rate: 2.5,
            fall_rate: 0.6,
            label_standoff: 2.0,
            font: None,
            font_size: 16.0,
            highlight_scale: 1.12,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            close_secs: 0.5,
            width_px: 360.0,
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            min_visible_secs: 2.0,
            fade_secs: 0.6,
            fade_buffer_secs: 0.2,
            parting_secs: 1.0,
            title: "ORBIT".to_string(),
        }
    }
}

impl BodyConfig {
    pub fn orbit_params(&self) -> OrbitParams {
        OrbitParams {
            radius: self.radius,
            angular_speed: self.angular_speed,
            tilt: self.tilt_deg.to_radians(),
            phase: self.phase_deg.to_radians(),
        }
    }
}

impl HoverConfig {
    pub fn hide_delay(&self) -> Duration {
        secs_to_duration(self.hide_delay_secs)
    }
}

impl PanelConfig {
    pub fn close_duration(&self) -> Duration {
        secs_to_duration(self.close_secs)
    }
}

impl SceneConfig {
    /// Resolve the platform config directory for this application.
    pub fn config_dir() -> Result<PathBuf, anyhow::Error> {
        let proj_dirs = ProjectDirs::from("", "", "orbitscene")
            .ok_or_else(|| anyhow::anyhow!("Failed to resolve config directory"))?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Load from the platform config directory.
    ///
    /// Returns Ok(None) when no config file exists.
    pub fn load() -> Result<Option<Self>, anyhow::Error> {
        let path = Self::config_dir()?.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, anyhow::Error> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: SceneConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        ensure!(!self.bodies.is_empty(), "no orbiting bodies configured");
        let central = &self.central_body;
        ensure!(
            central.radius.is_finite() && central.radius > 0.0,
            "central body radius must be positive"
        );
        ensure!(
            central.model_scale.is_finite() && central.model_scale > 0.0,
            "central body model scale must be positive"
        );

        let mut seen = HashSet::new();
        for body in &self.bodies {
            if !seen.insert(body.id) {
                bail!("duplicate body id '{}'", body.id);
            }
            ensure!(
                [body.radius, body.angular_speed, body.tilt_deg, body.phase_deg, body.spin_speed]
                    .iter()
                    .all(|v| v.is_finite()),
                "body '{}': orbit values must be finite",
                body.id
            );
            ensure!(body.radius > 0.0, "body '{}': radius must be positive", body.id);
            ensure!(
                body.scale.is_finite() && body.scale > 0.0,
                "body '{}': scale must be positive",
                body.id
            );
            if body.faces_origin {
                let alignment = fallback_alignment(&body.orbit_params());
                ensure!(
                    alignment < FALLBACK_MAX_ALIGNMENT,
                    "body '{}': fallback axis nearly parallel to nadir at tilt {}°",
                    body.id,
                    body.tilt_deg
                );
            }
        }

        let cam = &self.camera;
        ensure!(cam.initial_distance > 0.0, "camera initial distance must be positive");
        ensure!(cam.reference_aspect > 0.0, "camera reference aspect must be positive");
        ensure!(
            cam.follow_rate >= 0.0 && cam.return_rate >= 0.0,
            "camera rates must not be negative"
        );
        ensure!(
            (0.0..=1.0).contains(&cam.orientation_blend),
            "orientation blend must be within [0, 1]"
        );
        ensure!(
            (0.0..=1.0).contains(&cam.up_alignment_threshold),
            "up alignment threshold must be within [0, 1]"
        );

        let hover = &self.hover;
        ensure!(
            hover.rise_rate >= 0.0 && hover.fall_rate >= 0.0,
            "hover fade rates must not be negative"
        );

        let loading = &self.loading;
        let durations = [
            ("hover.hide_delay_secs", hover.hide_delay_secs),
            ("panel.close_secs", self.panel.close_secs),
            ("loading.min_visible_secs", loading.min_visible_secs),
            ("loading.fade_secs", loading.fade_secs),
            ("loading.fade_buffer_secs", loading.fade_buffer_secs),
            ("loading.parting_secs", loading.parting_secs),
        ];
        for (name, secs) in durations {
            ensure!(
                secs.is_finite() && (0.0..=MAX_DURATION_SECS).contains(&secs),
                "{name} must be within [0, {MAX_DURATION_SECS}] seconds, got {secs}"
            );
        }

        let stars = &self.starfield;
        ensure!(
            stars.face_size > 0 && stars.face_size <= 4096,
            "starfield face size must be within [1, 4096]"
        );
        ensure!(
            stars.count <= 1_000_000,
            "starfield count must be at most 1000000, got {}",
            stars.count
        );
        ensure!(
            stars.brightness.is_finite() && stars.brightness >= 0.0,
            "starfield brightness must not be negative"
        );
        Ok(())
    }
}

/// Inserts [`SceneConfig`], falling back to defaults on any load problem.
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let config = match SceneConfig::load() {
            Ok(Some(config)) => {
                info!("Loaded scene config with {} bodies", config.bodies.len());
                config
            }
            Ok(None) => {
                info!("No scene config found; using defaults");
                SceneConfig::default()
            }
            Err(err) => {
                warn!("Invalid scene config, using defaults: {err:#}");
                SceneConfig::default()
            }
        };
        app.insert_resource(config);
    }
}

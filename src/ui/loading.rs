//! Startup loading sequence
//!
//! One-shot and strictly forward: `Visible → Fading → Parting → Done`. Phase
//! boundaries are cumulative offsets from mount, inclusive at the exact
//! boundary. The overlay is an opaque two-half curtain with a title; the
//! title fades out, the halves slide apart, and the overlay is despawned.

use std::time::Duration;

use bevy::picking::Pickable;
use bevy::prelude::*;

use crate::config::{LoadingConfig, SceneConfig, secs_to_duration};
use crate::core::easing::smoothstep;
use crate::ui::UiFont;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadingPhase {
    #[default]
    Visible,
    Fading,
    Parting,
    Done,
}

impl LoadingPhase {
    const ORDER: [LoadingPhase; 4] = [
        LoadingPhase::Visible,
        LoadingPhase::Fading,
        LoadingPhase::Parting,
        LoadingPhase::Done,
    ];
}

#[derive(Resource, Debug)]
pub struct LoadingSequencer {
    phase: LoadingPhase,
    elapsed: Duration,
    /// Offsets from mount at which Fading, Parting and Done begin.
    boundaries: [Duration; 3],
}

impl LoadingSequencer {
    pub fn new(config: &LoadingConfig) -> Self {
        Self::from_durations(
            secs_to_duration(config.min_visible_secs),
            secs_to_duration(config.fade_secs) + secs_to_duration(config.fade_buffer_secs),
            secs_to_duration(config.parting_secs),
        )
    }

    /// Build from per-phase durations, which add up to the boundaries.
    pub fn from_durations(visible: Duration, fading: Duration, parting: Duration) -> Self {
        let fade_at = visible;
        let part_at = fade_at + fading;
        let done_at = part_at + parting;
        Self {
            phase: LoadingPhase::Visible,
            elapsed: Duration::ZERO,
            boundaries: [fade_at, part_at, done_at],
        }
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == LoadingPhase::Done
    }

    /// Scene interaction opens once the curtain starts parting.
    pub fn is_interactive(&self) -> bool {
        self.phase >= LoadingPhase::Parting
    }

    fn phase_at(&self, elapsed: Duration) -> LoadingPhase {
        let passed = self.boundaries.iter().filter(|b| elapsed >= **b).count();
        LoadingPhase::ORDER[passed]
    }

    /// Advance by `delta`. Returns the new phase when it changed; a large
    /// delta may skip intermediate phases. Inert once `Done`.
    pub fn advance(&mut self, delta: Duration) -> Option<LoadingPhase> {
        if self.is_done() {
            return None;
        }
        self.elapsed += delta;
        let next = self.phase_at(self.elapsed);
        if next > self.phase {
            self.phase = next;
            Some(next)
        } else {
            None
        }
    }

    /// Progress through the current phase in `[0, 1]`.
    pub fn phase_progress(&self) -> f32 {
        let (start, end) = match self.phase {
            LoadingPhase::Visible => (Duration::ZERO, self.boundaries[0]),
            LoadingPhase::Fading => (self.boundaries[0], self.boundaries[1]),
            LoadingPhase::Parting => (self.boundaries[1], self.boundaries[2]),
            LoadingPhase::Done => return 1.0,
        };
        let span = end.saturating_sub(start).as_secs_f32();
        if span <= 0.0 {
            return 1.0;
        }
        (self.elapsed.saturating_sub(start).as_secs_f32() / span).clamp(0.0, 1.0)
    }
}

/// Root of the loading overlay.
#[derive(Component)]
pub struct LoadingOverlay;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurtainHalf {
    Left,
    Right,
}

#[derive(Component)]
pub struct LoadingTitle;

const CURTAIN_COLOR: Color = Color::srgb(0.02, 0.03, 0.05);
const TITLE_COLOR: Color = Color::srgb(0.85, 0.95, 1.0);

pub fn spawn_loading_overlay(mut commands: Commands, config: Res<SceneConfig>, font: Res<UiFont>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                overflow: Overflow::clip(),
                ..default()
            },
            GlobalZIndex(10),
            Pickable::IGNORE,
            LoadingOverlay,
            Name::new("Loading overlay"),
        ))
        .with_children(|overlay| {
            for half in [CurtainHalf::Left, CurtainHalf::Right] {
                overlay.spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        left: curtain_left(half, 0.0),
                        top: Val::Px(0.0),
                        width: Val::Percent(50.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(CURTAIN_COLOR),
                    Pickable::IGNORE,
                    half,
                ));
            }
            overlay.spawn((
                Text::new(config.loading.title.clone()),
                TextFont {
                    font: font.handle(),
                    font_size: 48.0,
                    ..default()
                },
                TextColor(TITLE_COLOR),
                Pickable::IGNORE,
                LoadingTitle,
            ));
        });
}

/// Horizontal offset of a curtain half, `opened` in `[0, 1]`.
fn curtain_left(half: CurtainHalf, opened: f32) -> Val {
    match half {
        CurtainHalf::Left => Val::Percent(-50.0 * opened),
        CurtainHalf::Right => Val::Percent(50.0 + 50.0 * opened),
    }
}

/// Wall-clock driven: virtual time clamps long startup frames.
pub fn advance_loading(time: Res<Time<Real>>, mut sequencer: ResMut<LoadingSequencer>) {
    if let Some(phase) = sequencer.advance(time.delta()) {
        info!("Loading phase: {:?}", phase);
    }
}

/// Drive the overlay from the current phase and remove it once done.
pub fn animate_loading_overlay(
    mut commands: Commands,
    sequencer: Res<LoadingSequencer>,
    overlay: Query<Entity, With<LoadingOverlay>>,
    mut halves: Query<(&CurtainHalf, &mut Node)>,
    mut title: Query<&mut TextColor, With<LoadingTitle>>,
) {
    if sequencer.is_done() {
        for entity in overlay.iter() {
            commands.entity(entity).despawn();
        }
        return;
    }

    let progress = smoothstep(sequencer.phase_progress());
    let (title_alpha, opened) = match sequencer.phase() {
        LoadingPhase::Visible => (1.0, 0.0),
        LoadingPhase::Fading => (1.0 - progress, 0.0),
        LoadingPhase::Parting | LoadingPhase::Done => (0.0, progress),
    };

    for mut color in title.iter_mut() {
        color.0 = TITLE_COLOR.with_alpha(title_alpha);
    }
    for (half, mut node) in halves.iter_mut() {
        node.left = curtain_left(*half, opened);
    }
}

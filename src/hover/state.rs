//! Per-body hover label state machine

use std::time::Duration;

use bevy::prelude::*;

use crate::bodies::BodyId;
use crate::core::schedule::DelayedTask;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverPhase {
    #[default]
    Hidden,
    /// Shown, opacity rising while the pointer is over the body.
    Rising,
    /// Shown, opacity falling after the pointer left; hides when the delay
    /// expires.
    Falling,
}

/// Fade rates in opacity per second.
#[derive(Clone, Copy, Debug)]
pub struct FadeRates {
    pub rise: f32,
    pub fall: f32,
}

/// Hover label state for one body.
#[derive(Component, Debug, Default)]
pub struct HoverLabel {
    phase: HoverPhase,
    opacity: f32,
    hide_task: DelayedTask,
}

/// Sent when a label hides after its delay, or is forced hidden while shown.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverEnded {
    pub body: BodyId,
}

impl HoverLabel {
    #[cfg(test)]
    pub fn phase(&self) -> HoverPhase {
        self.phase
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_visible(&self) -> bool {
        self.phase != HoverPhase::Hidden
    }

    #[cfg(test)]
    pub fn hide_pending(&self) -> bool {
        self.hide_task.is_pending()
    }

    /// Pointer entered the body. Selected bodies never show a label.
    ///
    /// Opacity carries over so a quick re-enter mid-fade does not flicker.
    pub fn pointer_enter(&mut self, selected: bool) {
        if selected {
            self.force_hide();
            return;
        }
        self.hide_task.cancel();
        self.phase = HoverPhase::Rising;
    }

    /// Pointer left the body; starts the hide delay if the label is shown.
    pub fn pointer_leave(&mut self, hide_delay: Duration) {
        if !self.is_visible() {
            return;
        }
        self.phase = HoverPhase::Falling;
        self.hide_task.schedule(hide_delay);
    }

    /// Hide immediately and drop any pending hide. Returns whether the label
    /// was showing.
    pub fn force_hide(&mut self) -> bool {
        let was_visible = self.is_visible();
        self.phase = HoverPhase::Hidden;
        self.opacity = 0.0;
        self.hide_task.cancel();
        was_visible
    }

    /// Advance fades and the hide delay. Returns true when the label hid this
    /// tick.
    pub fn tick(&mut self, delta: Duration, selected: bool, rates: FadeRates) -> bool {
        if selected {
            return self.force_hide();
        }

        let dt = delta.as_secs_f32();
        match self.phase {
            HoverPhase::Hidden => return false,
            HoverPhase::Rising => {
                self.opacity = (self.opacity + rates.rise * dt).min(1.0);
            }
            HoverPhase::Falling => {
                self.opacity = (self.opacity - rates.fall * dt).max(0.0);
            }
        }

        if self.hide_task.tick(delta).is_some() {
            self.phase = HoverPhase::Hidden;
            self.opacity = 0.0;
            return true;
        }
        false
    }
}

/// World-space anchor for a label: on the ray from the origin through the
/// body, `standoff` beyond it.
pub fn label_anchor(body_pos: Vec3, standoff: f32) -> Vec3 {
    match body_pos.try_normalize() {
        Some(radial) => body_pos + radial * standoff,
        None => body_pos + Vec3::Y * standoff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATES: FadeRates = FadeRates {
        rise: 2.0,
        fall: 0.5,
    };
    const DELAY: Duration = Duration::from_secs(3);
    const FRAME: Duration = Duration::from_millis(16);

    fn run(label: &mut HoverLabel, total: Duration, selected: bool) -> bool {
        let mut hid = false;
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            hid |= label.tick(FRAME, selected, RATES);
            elapsed += FRAME;
        }
        hid
    }

    #[test]
    fn test_enter_shows_and_rises() {
        let mut label = HoverLabel::default();
        label.pointer_enter(false);
        assert_eq!(label.phase(), HoverPhase::Rising);
        run(&mut label, Duration::from_millis(250), false);
        assert!(label.opacity() > 0.4 && label.opacity() < 0.6);
        run(&mut label, Duration::from_secs(1), false);
        assert_eq!(label.opacity(), 1.0);
    }

    #[test]
    fn test_leave_hides_after_delay() {
        let mut label = HoverLabel::default();
        label.pointer_enter(false);
        run(&mut label, Duration::from_secs(1), false);
        label.pointer_leave(DELAY);
        assert_eq!(label.phase(), HoverPhase::Falling);
        assert!(label.hide_pending());

        assert!(!run(&mut label, Duration::from_millis(2900), false));
        assert!(label.is_visible());
        // Falls slower than it rose, but still falls.
        assert!(label.opacity() < 1.0);

        assert!(run(&mut label, Duration::from_millis(200), false));
        assert!(!label.is_visible());
        assert_eq!(label.opacity(), 0.0);
    }

    #[test]
    fn test_bounce_never_hides() {
        let mut label = HoverLabel::default();
        label.pointer_enter(false);
        run(&mut label, Duration::from_millis(500), false);

        label.pointer_leave(DELAY);
        for _ in 0..120 {
            assert!(!label.tick(FRAME, false, RATES));
            assert!(label.is_visible());
        }
        let before = label.opacity();
        label.pointer_enter(false);
        assert!(!label.hide_pending());
        assert_eq!(label.opacity(), before);

        for _ in 0..400 {
            assert!(!label.tick(FRAME, false, RATES));
            assert!(label.is_visible());
        }
    }

    #[test]
    fn test_selection_forces_hidden_mid_fade() {
        let mut label = HoverLabel::default();
        label.pointer_enter(false);
        run(&mut label, Duration::from_millis(100), false);
        assert!(label.opacity() > 0.0 && label.opacity() < 1.0);

        assert!(label.tick(FRAME, true, RATES));
        assert!(!label.is_visible());
        assert!(!label.hide_pending());

        // Stays hidden every frame while selected.
        for _ in 0..10 {
            assert!(!label.tick(FRAME, true, RATES));
            assert!(!label.is_visible());
        }
    }

    #[test]
    fn test_enter_on_selected_body_stays_hidden() {
        let mut label = HoverLabel::default();
        label.pointer_enter(true);
        assert!(!label.is_visible());
        assert!(!label.hide_pending());
    }

    #[test]
    fn test_force_hide_cancels_pending_timer() {
        let mut label = HoverLabel::default();
        label.pointer_enter(false);
        label.pointer_leave(DELAY);
        assert!(label.force_hide());
        assert!(!label.hide_pending());
        assert!(!run(&mut label, Duration::from_secs(5), false));
    }

    #[test]
    fn test_leave_while_hidden_schedules_nothing() {
        let mut label = HoverLabel::default();
        label.pointer_leave(DELAY);
        assert!(!label.hide_pending());
        assert_eq!(label.phase(), HoverPhase::Hidden);
    }

    #[test]
    fn test_label_anchor_is_outward_of_body() {
        let body = Vec3::new(0.0, 3.0, 4.0);
        let anchor = label_anchor(body, 2.0);
        assert!((anchor.length() - 7.0).abs() < 1e-5);
        assert!(anchor.normalize().dot(body.normalize()) > 0.9999);
        assert_eq!(label_anchor(Vec3::ZERO, 2.0), Vec3::new(0.0, 2.0, 0.0));
    }
}

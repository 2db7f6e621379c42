//! Detail panel lifecycle
//!
//! The panel follows selection: open while a body is selected, then closing
//! for a fixed duration after deselection while the camera returns. A new
//! selection during closing reopens the panel for the new body at once.

use std::time::Duration;

use bevy::prelude::*;

use crate::bodies::BodyId;
use crate::core::schedule::{DelayedTask, TaskHandle};
use crate::selection::SelectionChange;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelPhase {
    #[default]
    Absent,
    Open(BodyId),
    /// Still rendered and fading; selection has already cleared.
    Closing { body: BodyId, task: TaskHandle },
}

#[derive(Resource, Debug, Default)]
pub struct DetailPanel {
    phase: PanelPhase,
    close_task: DelayedTask,
}

impl DetailPanel {
    #[cfg(test)]
    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    /// Open for `body`, dropping any pending close.
    pub fn open(&mut self, body: BodyId) {
        self.close_task.cancel();
        self.phase = PanelPhase::Open(body);
    }

    /// Start closing the open panel. No effect unless open.
    pub fn begin_close(&mut self, duration: Duration) {
        let PanelPhase::Open(body) = self.phase else {
            return;
        };
        let task = self.close_task.schedule(duration);
        self.phase = PanelPhase::Closing { body, task };
    }

    pub fn apply(&mut self, change: SelectionChange, close_duration: Duration) {
        match change {
            SelectionChange::Selected(body) => self.open(body),
            SelectionChange::Deselected(_) => self.begin_close(close_duration),
        }
    }

    /// Advance the close timer. Returns true when the panel unmounted this
    /// tick.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(fired) = self.close_task.tick(delta) else {
            return false;
        };
        match self.phase {
            PanelPhase::Closing { task, .. } if task == fired => {
                self.phase = PanelPhase::Absent;
                true
            }
            _ => false,
        }
    }

    /// Body whose panel is open; `None` while closing or absent.
    pub fn selected_object(&self) -> Option<BodyId> {
        match self.phase {
            PanelPhase::Open(body) => Some(body),
            _ => None,
        }
    }

    /// Body whose panel is fading out.
    pub fn closing_object(&self) -> Option<BodyId> {
        match self.phase {
            PanelPhase::Closing { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.phase, PanelPhase::Closing { .. })
    }

    /// Body whose content is rendered, open or closing.
    pub fn displayed_body(&self) -> Option<BodyId> {
        self.selected_object().or_else(|| self.closing_object())
    }

    pub fn opacity(&self) -> f32 {
        match self.phase {
            PanelPhase::Absent => 0.0,
            PanelPhase::Open(_) => 1.0,
            PanelPhase::Closing { .. } => 1.0 - self.close_task.fraction().unwrap_or(1.0),
        }
    }
}

//! Cancelable delayed tasks.
//!
//! Timer-driven transitions (label hide, panel close) own a [`DelayedTask`].
//! Each scheduling bumps a generation counter, so a handle captured for an
//! earlier task can never be mistaken for the current one. A slot holds at
//! most one pending task: scheduling again replaces it.

use std::time::Duration;

use bevy::prelude::*;

/// Identifies one scheduled task within its [`DelayedTask`] slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Pending {
    handle: TaskHandle,
    timer: Timer,
}

/// Single-slot scheduled task.
#[derive(Debug, Default)]
pub struct DelayedTask {
    generation: u64,
    pending: Option<Pending>,
}

impl DelayedTask {
    /// Schedule a task to fire after `delay`, replacing any pending task.
    pub fn schedule(&mut self, delay: Duration) -> TaskHandle {
        self.generation += 1;
        let handle = TaskHandle(self.generation);
        self.pending = Some(Pending {
            handle,
            timer: Timer::new(delay, TimerMode::Once),
        });
        handle
    }

    /// Drop the pending task, if any. Its handle is no longer current.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Still-valid guard: true only while `handle` is the pending task.
    pub fn is_current(&self, handle: TaskHandle) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.handle == handle)
    }

    /// Fraction of the pending delay already elapsed, `None` when idle.
    pub fn fraction(&self) -> Option<f32> {
        self.pending.as_ref().map(|pending| pending.timer.fraction())
    }

    /// Advance the pending timer. Returns the handle of the task that fired
    /// this tick; a task fires at most once.
    pub fn tick(&mut self, delta: Duration) -> Option<TaskHandle> {
        let pending = self.pending.as_mut()?;
        pending.timer.tick(delta);
        if !pending.timer.is_finished() {
            return None;
        }
        let handle = pending.handle;
        self.pending = None;
        Some(handle)
    }
}

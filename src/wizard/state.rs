use serde::{Deserialize, Serialize};

use crate::callbacks::Flags;

/// How navigation treats panels hidden by a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    /// Step over hidden panels, landing only on present ones.
    #[default]
    SkipHidden,
    /// Plain `±1` stepping clamped to the number of present panels. Hidden
    /// panels can become current.
    Sequential,
}

/// What a second `forward()` does while an advance is already pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardGuard {
    /// Keep the pending advance; drop the new request.
    #[default]
    Ignore,
    /// Cancel the pending advance and start a fresh delay.
    Restart,
}

/// State mutations applied by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetCurrentPanel(usize),
    RecountCompleted,
    RecountPresent,
}

/// Global navigation state for one wizard session.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    current_panel: usize,
    completed_count: usize,
    present_count: usize,
    flags: Flags,
}

impl WizardState {
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    pub fn current_panel(&self) -> usize {
        self.current_panel
    }

    pub fn completed_count(&self) -> usize {
        self.completed_count
    }

    pub fn present_count(&self) -> usize {
        self.present_count
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }

    /// Stores `requested` clamped to `[0, limit - 1]` and returns the value
    /// actually written. A zero limit pins the index to 0.
    pub(crate) fn set_current_panel(&mut self, requested: usize, limit: usize) -> usize {
        self.current_panel = clamp_index(requested, limit);
        self.current_panel
    }

    pub(crate) fn set_completed_count(&mut self, count: usize) {
        self.completed_count = count;
    }

    pub(crate) fn set_present_count(&mut self, count: usize) {
        self.present_count = count;
    }
}

pub(crate) fn clamp_index(requested: usize, limit: usize) -> usize {
    requested.min(limit.saturating_sub(1))
}

use serde::{Deserialize, Serialize};

use crate::callbacks::Flags;

use super::view::{Notification, WizardView};

/// Which raw interactions move a panel towards completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvanceMode {
    Affirm,
    TextSingle,
    TextMulti,
    RadioSingle,
    RadioMulti,
}

/// Raw interaction kinds delivered by the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Click,
    Blur,
    Submit,
    RadioChange,
}

/// What the controller should do in response to an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceAction {
    /// Complete the panel straight away.
    Complete,
    /// Validate the field when it requires it, otherwise complete.
    ValidateOrComplete,
    /// Validate the field when it requires it, then complete only if the
    /// whole field group is filled in.
    ValidateThenCheckGroup,
    /// Complete only if every group in the panel has a selection.
    CheckGroup,
    Ignore,
}

impl AdvanceMode {
    pub fn action_for(self, interaction: Interaction) -> AdvanceAction {
        use AdvanceAction::*;
        use Interaction::*;

        match (self, interaction) {
            (AdvanceMode::Affirm, Click) => Complete,
            (AdvanceMode::TextSingle, Blur | Submit) => ValidateOrComplete,
            (AdvanceMode::TextMulti, Blur | Submit) => ValidateThenCheckGroup,
            (AdvanceMode::RadioSingle, Click | RadioChange) => Complete,
            (AdvanceMode::RadioMulti, Click | RadioChange) => CheckGroup,
            _ => Ignore,
        }
    }
}

/// Condition under which a panel is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub key: String,
    pub value: String,
}

impl Dependency {
    pub fn is_met(&self, flags: &Flags) -> bool {
        flags.get(&self.key).map(String::as_str) == Some(self.value.as_str())
    }
}

/// One step of the wizard.
#[derive(Debug, Clone)]
pub struct Panel {
    index: usize,
    title: Option<String>,
    dependency: Option<Dependency>,
    advance_mode: Option<AdvanceMode>,
    field_ids: Vec<String>,
    is_complete: bool,
    has_error: bool,
    is_active: bool,
    is_present: bool,
}

impl Panel {
    pub fn new(
        index: usize,
        title: Option<String>,
        dependency: Option<Dependency>,
        advance_mode: Option<AdvanceMode>,
        field_ids: Vec<String>,
    ) -> Self {
        Self {
            index,
            title,
            dependency,
            advance_mode,
            field_ids,
            is_complete: false,
            has_error: false,
            is_active: index == 0,
            is_present: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn field_ids(&self) -> &[String] {
        &self.field_ids
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_present(&self) -> bool {
        self.is_present
    }

    /// Maps an interaction through the advance mode. Panels without a mode
    /// only complete through an explicit signal.
    pub fn action_for(&self, interaction: Interaction) -> AdvanceAction {
        self.advance_mode
            .map(|mode| mode.action_for(interaction))
            .unwrap_or(AdvanceAction::Ignore)
    }

    /// Human-facing number, 1-based.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn on_complete(&mut self, view: &mut dyn WizardView) {
        self.is_complete = true;
        tracing::info!(panel = self.number(), "panel passed");
        view.notify(Notification::PanelCompletedChanged {
            index: self.index,
            is_complete: true,
        });
    }

    pub fn on_error(&mut self, message: &str, view: &mut dyn WizardView) {
        self.has_error = true;
        tracing::warn!(panel = self.number(), reason = message, "panel failed");
        view.notify(Notification::PanelErrorChanged {
            index: self.index,
            has_error: true,
            message: Some(message.to_string()),
        });
    }

    /// Clears a previous error. Silent when there was none.
    pub fn clear_error(&mut self, view: &mut dyn WizardView) {
        if !self.has_error {
            return;
        }
        self.has_error = false;
        view.notify(Notification::PanelErrorChanged {
            index: self.index,
            has_error: false,
            message: None,
        });
    }

    /// Re-evaluates the dependency against `flags`. Returns `true` when the
    /// panel changed visibility.
    pub fn recompute_presence(&mut self, flags: &Flags, view: &mut dyn WizardView) -> bool {
        let is_present = self
            .dependency
            .as_ref()
            .map_or(true, |dependency| dependency.is_met(flags));
        let changed = is_present != self.is_present;
        self.is_present = is_present;
        view.notify(Notification::PanelPresenceChanged {
            index: self.index,
            is_present,
        });
        changed
    }

    /// Updates `is_active` for the given current index, notifying only on
    /// change.
    pub fn set_active(&mut self, current: usize, view: &mut dyn WizardView) {
        let is_active = current == self.index;
        if is_active == self.is_active {
            return;
        }
        self.is_active = is_active;
        view.notify(Notification::PanelActiveChanged {
            index: self.index,
            is_active,
        });
    }
}

//! Navigation state machine tying panels, fields and registries together.
//!
//! The controller is the single owner of wizard state. Events come in
//! through [`WizardController::handle`]; everything the view needs to know
//! goes out through [`WizardView::notify`]. Moving forward is delayed so a
//! completion can be shown before the next panel replaces it; the delay is
//! a pending value checked by [`WizardController::poll`], never a blocking
//! wait.

use std::collections::HashMap;
use std::time::Duration;

use crate::callbacks::{CallbackRegistry, Flags};
use crate::errors::{Result, WizardError};
use crate::validation::{RuleRegistry, ValidationOutcome};

use super::definition::WizardDefinition;
use super::field::Field;
use super::panel::{AdvanceAction, Dependency, Interaction, Panel};
use super::schedule::{AdvanceTimer, Clock, PendingAdvance, ScheduleOutcome, SystemClock};
use super::state::{Command, ForwardGuard, NavigationPolicy, WizardState};
use super::view::{NullView, Notification, WizardView};

pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Raw user actions fed to the wizard by the event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    FieldBlur { field_id: String, value: String },
    /// Enter pressed inside a text field.
    FieldSubmit { field_id: String, value: String },
    FieldClick { field_id: String },
    RadioChange { group_id: String, value: String },
    KeyNavigation(Direction),
}

/// Tunables for navigation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardOptions {
    pub advance_delay: Duration,
    pub navigation: NavigationPolicy,
    pub forward_guard: ForwardGuard,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            advance_delay: DEFAULT_ADVANCE_DELAY,
            navigation: NavigationPolicy::default(),
            forward_guard: ForwardGuard::default(),
        }
    }
}

/// Assembles a [`WizardController`] from a definition.
pub struct WizardBuilder {
    definition: WizardDefinition,
    rules: RuleRegistry,
    callbacks: CallbackRegistry,
    options: WizardOptions,
    clock: Box<dyn Clock>,
}

impl WizardBuilder {
    pub fn new(definition: WizardDefinition) -> Self {
        Self {
            definition,
            rules: RuleRegistry::with_builtins(),
            callbacks: CallbackRegistry::with_builtins(),
            options: WizardOptions::default(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    pub fn callbacks(mut self, callbacks: CallbackRegistry) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn options(mut self, options: WizardOptions) -> Self {
        self.options = options;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Builds the controller and emits the initial presence, active and
    /// progress notifications to `view`.
    ///
    /// Unknown rule or callback names are logged and tolerated; structural
    /// problems in the definition are returned as errors.
    pub fn build<V: WizardView>(self, view: V) -> Result<WizardController<V>> {
        let WizardBuilder {
            definition,
            rules,
            mut callbacks,
            options,
            clock,
        } = self;

        let owners = definition.field_owners()?;
        definition.register_callbacks(&mut callbacks);
        for issue in definition.check(&rules, &callbacks) {
            tracing::warn!(error = %issue, "wizard definition references an unknown name");
        }

        let mut fields = Vec::with_capacity(definition.fields.len());
        let mut field_index = HashMap::with_capacity(definition.fields.len());
        for def in &definition.fields {
            let panel = owners
                .get(&def.id)
                .copied()
                .ok_or_else(|| WizardError::UnknownField(def.id.clone()))?;
            let mut field = Field::new(def.id.clone(), panel);
            if let Some(label) = &def.label {
                field = field.with_label(label.clone());
            }
            if let Some(rule) = &def.validate {
                field = field.with_rule(rule.clone());
            }
            if def.soft_fail {
                field = field.with_soft_fail();
            }
            if let Some(callback) = &def.callback {
                field = field.with_callback(callback.clone());
            }
            field_index.insert(def.id.clone(), fields.len());
            fields.push(field);
        }

        let panels = definition
            .panels
            .iter()
            .enumerate()
            .map(|(index, def)| {
                let dependency = match (&def.depends_on_key, &def.depends_on_value) {
                    (Some(key), Some(value)) => Some(Dependency {
                        key: key.clone(),
                        value: value.clone(),
                    }),
                    _ => None,
                };
                Panel::new(
                    index,
                    def.title.clone(),
                    dependency,
                    def.advance,
                    def.fields.clone(),
                )
            })
            .collect();

        let mut controller = WizardController {
            state: WizardState::new(definition.flags.clone()),
            panels,
            fields,
            field_index,
            rules,
            callbacks,
            options,
            timer: AdvanceTimer::new(),
            clock,
            view,
        };
        controller.initialize();
        tracing::debug!(
            name = %definition.name,
            panels = controller.panels.len(),
            fields = controller.fields.len(),
            "wizard ready"
        );
        Ok(controller)
    }
}

/// Owns all wizard state for one session.
pub struct WizardController<V: WizardView> {
    state: WizardState,
    panels: Vec<Panel>,
    fields: Vec<Field>,
    field_index: HashMap<String, usize>,
    rules: RuleRegistry,
    callbacks: CallbackRegistry,
    options: WizardOptions,
    timer: AdvanceTimer,
    clock: Box<dyn Clock>,
    view: V,
}

impl<V: WizardView> WizardController<V> {
    fn initialize(&mut self) {
        for panel in &mut self.panels {
            panel.recompute_presence(self.state.flags(), &mut self.view);
        }
        self.count_present();

        let start = match self.options.navigation {
            NavigationPolicy::SkipHidden => self
                .panels
                .iter()
                .find(|panel| panel.is_present())
                .map(Panel::index)
                .unwrap_or(0),
            NavigationPolicy::Sequential => 0,
        };
        let limit = self.index_limit();
        let current = self.state.set_current_panel(start, limit);
        for panel in &mut self.panels {
            panel.set_active(current, &mut NullView);
            self.view.notify(Notification::PanelActiveChanged {
                index: panel.index(),
                is_active: panel.is_active(),
            });
        }
        self.apply(Command::RecountCompleted);
    }

    /// Dispatches one raw event.
    ///
    /// Unknown field ids are reported as errors; everything else, including
    /// failed validation, is expressed through notifications.
    pub fn handle(&mut self, event: WizardEvent) -> Result<()> {
        match event {
            WizardEvent::FieldBlur { field_id, value } => {
                self.field_interaction(&field_id, Some(value), Interaction::Blur)
            }
            WizardEvent::FieldSubmit { field_id, value } => {
                self.field_interaction(&field_id, Some(value), Interaction::Submit)
            }
            WizardEvent::FieldClick { field_id } => {
                self.field_interaction(&field_id, None, Interaction::Click)
            }
            WizardEvent::RadioChange { group_id, value } => {
                self.field_interaction(&group_id, Some(value), Interaction::RadioChange)
            }
            WizardEvent::KeyNavigation(Direction::Forward) => {
                if self.current().is_some_and(Panel::is_complete) {
                    self.forward();
                }
                Ok(())
            }
            WizardEvent::KeyNavigation(Direction::Backward) => {
                self.backward();
                Ok(())
            }
        }
    }

    fn field_interaction(
        &mut self,
        field_id: &str,
        value: Option<String>,
        interaction: Interaction,
    ) -> Result<()> {
        let field_idx = self.field_position(field_id)?;
        if let Some(value) = value {
            self.fields[field_idx].set_value(value);
        }
        let panel = self.fields[field_idx].panel();
        let must_validate = self.fields[field_idx].must_validate();

        match self.panels[panel].action_for(interaction) {
            AdvanceAction::Complete => self.complete(panel),
            AdvanceAction::ValidateOrComplete => {
                if must_validate {
                    self.run_validation(field_idx, true);
                } else {
                    self.complete(panel);
                }
            }
            AdvanceAction::ValidateThenCheckGroup => {
                if must_validate {
                    self.run_validation(field_idx, false);
                }
                if self.group_filled(panel) {
                    self.complete(panel);
                }
            }
            AdvanceAction::CheckGroup => {
                if self.group_filled(panel) {
                    self.complete(panel);
                }
            }
            AdvanceAction::Ignore => {
                tracing::trace!(field = field_id, ?interaction, "interaction ignored");
            }
        }
        Ok(())
    }

    /// Validates a field against its rule and, when accepted, completes its
    /// panel. Returns `None` for fields that carry no rule.
    pub fn validate_field(&mut self, field_id: &str) -> Result<Option<ValidationOutcome>> {
        let field_idx = self.field_position(field_id)?;
        Ok(self.run_validation(field_idx, true))
    }

    fn run_validation(
        &mut self,
        field_idx: usize,
        complete_when_accepted: bool,
    ) -> Option<ValidationOutcome> {
        let outcome = self.fields[field_idx].validate(&self.rules)?;
        let field = &self.fields[field_idx];
        let panel = field.panel();
        let soft_fail = field.soft_fail();
        let callback = field.on_validate().map(str::to_string);

        self.view.notify(Notification::FieldValidityChanged {
            field_id: field.id().to_string(),
            is_valid: outcome.passed,
            message: outcome.message.clone(),
        });

        if outcome.passed {
            self.panels[panel].clear_error(&mut self.view);
        } else if soft_fail {
            tracing::info!(field = field.id(), "soft validation failure; panel not blocked");
        } else {
            let message = outcome.message.as_deref().unwrap_or_default();
            self.panels[panel].on_error(message, &mut self.view);
        }

        if let Some(name) = callback {
            self.callbacks
                .invoke(&name, outcome.passed, self.state.flags_mut());
            self.refresh_presence();
        }

        if complete_when_accepted && (outcome.passed || soft_fail) {
            self.complete(panel);
        }
        Some(outcome)
    }

    /// Every field in the panel holds a value and none is blocked by a
    /// failed validation. Empty panels never qualify.
    fn group_filled(&self, panel: usize) -> bool {
        let ids = self.panels[panel].field_ids();
        !ids.is_empty()
            && ids.iter().all(|id| {
                self.field(id)
                    .is_some_and(|field| field.has_value() && !field.is_blocking())
            })
    }

    /// External completion signal, for panels that do not complete from
    /// field interaction.
    pub fn complete_panel(&mut self, index: usize) -> Result<()> {
        if index >= self.panels.len() {
            return Err(WizardError::UnknownPanel(index));
        }
        self.complete(index);
        Ok(())
    }

    fn complete(&mut self, panel: usize) {
        self.panels[panel].on_complete(&mut self.view);
        if !self.forward() {
            self.apply(Command::RecountCompleted);
        }
    }

    /// Requests a move to the next panel.
    ///
    /// No-op unless the current panel is complete. Otherwise the completed
    /// count is refreshed right away and the move itself happens once the
    /// advance delay has elapsed. Returns whether the precondition held.
    pub fn forward(&mut self) -> bool {
        let current = self.state.current_panel();
        if !self.current().is_some_and(Panel::is_complete) {
            tracing::debug!(panel = current + 1, "forward ignored; current panel incomplete");
            return false;
        }

        self.apply(Command::RecountCompleted);
        let now = self.clock.now();
        match self
            .timer
            .schedule(now, self.options.advance_delay, self.options.forward_guard)
        {
            ScheduleOutcome::Scheduled(token) => {
                tracing::debug!(token, from = current + 1, "advance scheduled");
            }
            ScheduleOutcome::Replaced { cancelled, token } => {
                tracing::debug!(cancelled, token, "pending advance restarted");
            }
            ScheduleOutcome::AlreadyPending(token) => {
                tracing::debug!(token, "advance already pending; request ignored");
            }
        }
        true
    }

    /// Moves to the previous panel immediately, cancelling any pending
    /// advance.
    pub fn backward(&mut self) {
        if let Some(token) = self.timer.cancel() {
            tracing::debug!(token, "pending advance cancelled");
        }
        let target = self.step(Direction::Backward);
        self.apply(Command::SetCurrentPanel(target));
    }

    /// Fires the pending advance if it is due. Returns whether the wizard
    /// moved.
    pub fn poll(&mut self) -> bool {
        match self.timer.take_due(self.clock.now()) {
            Some(pending) => {
                self.advance(pending);
                true
            }
            None => false,
        }
    }

    /// Fires the pending advance without waiting for its deadline.
    pub fn run_pending(&mut self) -> bool {
        match self.timer.take() {
            Some(pending) => {
                self.advance(pending);
                true
            }
            None => false,
        }
    }

    pub fn has_pending_advance(&self) -> bool {
        self.timer.pending().is_some()
    }

    /// Time left before the pending advance is due.
    pub fn time_until_advance(&self) -> Option<Duration> {
        self.timer.remaining(self.clock.now())
    }

    fn advance(&mut self, pending: PendingAdvance) {
        let from = self.state.current_panel();
        let target = self.step(Direction::Forward);
        tracing::debug!(token = pending.token, from = from + 1, to = target + 1, "advancing");
        self.apply(Command::SetCurrentPanel(target));
    }

    /// Candidate index one step in `direction`; clamping happens in
    /// [`Self::apply`].
    fn step(&self, direction: Direction) -> usize {
        let current = self.state.current_panel();
        match (self.options.navigation, direction) {
            (NavigationPolicy::Sequential, Direction::Forward) => current + 1,
            (NavigationPolicy::Sequential, Direction::Backward) => current.saturating_sub(1),
            (NavigationPolicy::SkipHidden, Direction::Forward) => self
                .panels
                .iter()
                .skip(current + 1)
                .find(|panel| panel.is_present())
                .map_or(current, Panel::index),
            (NavigationPolicy::SkipHidden, Direction::Backward) => self
                .panels
                .iter()
                .take(current)
                .rev()
                .find(|panel| panel.is_present())
                .map_or(current, Panel::index),
        }
    }

    fn index_limit(&self) -> usize {
        match self.options.navigation {
            NavigationPolicy::Sequential => self.state.present_count(),
            NavigationPolicy::SkipHidden => self.panels.len(),
        }
    }

    /// Applies one state command and notifies the view.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetCurrentPanel(requested) => {
                let limit = self.index_limit();
                let current = self.state.set_current_panel(requested, limit);
                if current != requested {
                    tracing::debug!(requested, current, "panel index clamped");
                }
                for panel in &mut self.panels {
                    panel.set_active(current, &mut self.view);
                }
            }
            Command::RecountCompleted => {
                let completed = self.panels.iter().filter(|panel| panel.is_complete()).count();
                self.state.set_completed_count(completed);
                self.notify_progress();
            }
            Command::RecountPresent => {
                let present = self.count_present();
                let current = self.state.current_panel();
                match self.options.navigation {
                    NavigationPolicy::Sequential if current >= present.max(1) => {
                        self.apply(Command::SetCurrentPanel(current));
                    }
                    NavigationPolicy::SkipHidden => {
                        if let Some(target) = self.nearest_present(current) {
                            if let Some(token) = self.timer.cancel() {
                                tracing::debug!(token, "pending advance cancelled; panel hidden");
                            }
                            tracing::debug!(from = current + 1, to = target + 1, "current panel hidden");
                            self.apply(Command::SetCurrentPanel(target));
                        }
                    }
                    NavigationPolicy::Sequential => {}
                }
            }
        }
    }

    fn count_present(&mut self) -> usize {
        let present = self.panels.iter().filter(|panel| panel.is_present()).count();
        self.state.set_present_count(present);
        self.notify_progress();
        present
    }

    /// Closest present panel to a hidden `current`, searching backward
    /// first. `None` when `current` is present or nothing is.
    fn nearest_present(&self, current: usize) -> Option<usize> {
        if self.panels.get(current).map_or(true, Panel::is_present) {
            return None;
        }
        self.panels[..current]
            .iter()
            .rev()
            .chain(self.panels.iter().skip(current + 1))
            .find(|panel| panel.is_present())
            .map(Panel::index)
    }

    pub fn recount_present(&mut self) {
        self.apply(Command::RecountPresent);
    }

    pub fn recount_completed(&mut self) {
        self.apply(Command::RecountCompleted);
    }

    /// Re-evaluates one panel's dependency and refreshes the present count.
    pub fn recompute_presence(&mut self, index: usize) -> Result<bool> {
        let panel = self
            .panels
            .get_mut(index)
            .ok_or(WizardError::UnknownPanel(index))?;
        let changed = panel.recompute_presence(self.state.flags(), &mut self.view);
        self.apply(Command::RecountPresent);
        Ok(changed)
    }

    fn refresh_presence(&mut self) {
        for panel in &mut self.panels {
            panel.recompute_presence(self.state.flags(), &mut self.view);
        }
        self.recount_present();
        self.recount_completed();
    }

    fn notify_progress(&mut self) {
        self.view.notify(Notification::ProgressChanged {
            completed: self.state.completed_count(),
            total: self.state.present_count(),
        });
    }

    fn field_position(&self, field_id: &str) -> Result<usize> {
        self.field_index
            .get(field_id)
            .copied()
            .ok_or_else(|| WizardError::UnknownField(field_id.to_string()))
    }

    pub fn current_panel(&self) -> usize {
        self.state.current_panel()
    }

    /// Ordinal of the current panel among present panels.
    pub fn current_position(&self) -> usize {
        let current = self.state.current_panel();
        let before = self
            .panels
            .iter()
            .take(current)
            .filter(|panel| panel.is_present())
            .count();
        before.min(self.state.present_count().saturating_sub(1))
    }

    pub fn current(&self) -> Option<&Panel> {
        self.panels.get(self.state.current_panel())
    }

    pub fn completed_count(&self) -> usize {
        self.state.completed_count()
    }

    pub fn present_count(&self) -> usize {
        self.state.present_count()
    }

    /// The current panel is the last present one and it is complete.
    pub fn is_finished(&self) -> bool {
        let last_present = self
            .panels
            .iter()
            .rev()
            .find(|panel| panel.is_present())
            .map(Panel::index);
        last_present == Some(self.state.current_panel())
            && self.current().is_some_and(Panel::is_complete)
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn flags(&self) -> &Flags {
        self.state.flags()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.field_index.get(id).map(|idx| &self.fields[*idx])
    }

    pub fn options(&self) -> &WizardOptions {
        &self.options
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::definition::{FieldDefinition, PanelDefinition};
    use crate::wizard::panel::AdvanceMode;
    use crate::wizard::schedule::ManualClock;

    fn radio_definition() -> WizardDefinition {
        WizardDefinition {
            fields: vec![
                FieldDefinition {
                    id: "color".into(),
                    ..FieldDefinition::default()
                },
                FieldDefinition {
                    id: "size".into(),
                    ..FieldDefinition::default()
                },
            ],
            panels: vec![
                PanelDefinition {
                    advance: Some(AdvanceMode::RadioSingle),
                    fields: vec!["color".into()],
                    ..PanelDefinition::default()
                },
                PanelDefinition {
                    advance: Some(AdvanceMode::RadioSingle),
                    fields: vec!["size".into()],
                    ..PanelDefinition::default()
                },
            ],
            ..WizardDefinition::default()
        }
    }

    fn build(clock: &ManualClock) -> WizardController<Vec<Notification>> {
        WizardBuilder::new(radio_definition())
            .clock(clock.clone())
            .build(Vec::new())
            .unwrap()
    }

    #[test]
    fn initial_notifications_describe_every_panel() {
        let clock = ManualClock::new();
        let wizard = build(&clock);
        let view = wizard.view();
        assert!(view.contains(&Notification::PanelActiveChanged {
            index: 0,
            is_active: true
        }));
        assert!(view.contains(&Notification::PanelActiveChanged {
            index: 1,
            is_active: false
        }));
        assert_eq!(
            view.last(),
            Some(&Notification::ProgressChanged {
                completed: 0,
                total: 2
            })
        );
    }

    #[test]
    fn radio_selection_completes_and_advances_after_delay() {
        let clock = ManualClock::new();
        let mut wizard = build(&clock);

        wizard
            .handle(WizardEvent::RadioChange {
                group_id: "color".into(),
                value: "red".into(),
            })
            .unwrap();
        assert!(wizard.panels()[0].is_complete());
        assert_eq!(wizard.completed_count(), 1);
        assert_eq!(wizard.current_panel(), 0);

        assert!(!wizard.poll());
        clock.advance(DEFAULT_ADVANCE_DELAY);
        assert!(wizard.poll());
        assert_eq!(wizard.current_panel(), 1);
        assert!(wizard.panels()[1].is_active());
        assert!(!wizard.panels()[0].is_active());
    }

    #[test]
    fn forward_requires_complete_current_panel() {
        let clock = ManualClock::new();
        let mut wizard = build(&clock);
        assert!(!wizard.forward());
        assert!(!wizard.has_pending_advance());
    }

    #[test]
    fn unknown_field_event_is_reported() {
        let clock = ManualClock::new();
        let mut wizard = build(&clock);
        let err = wizard
            .handle(WizardEvent::FieldClick {
                field_id: "missing".into(),
            })
            .unwrap_err();
        assert!(matches!(err, WizardError::UnknownField(id) if id == "missing"));
    }

    #[test]
    fn complete_panel_rejects_out_of_range_index() {
        let clock = ManualClock::new();
        let mut wizard = build(&clock);
        assert!(matches!(
            wizard.complete_panel(9),
            Err(WizardError::UnknownPanel(9))
        ));
    }

    #[test]
    fn finishing_on_last_panel_stays_in_bounds() {
        let clock = ManualClock::new();
        let mut wizard = build(&clock);
        wizard.complete_panel(0).unwrap();
        wizard.run_pending();
        wizard.complete_panel(1).unwrap();
        assert!(wizard.is_finished());
        wizard.run_pending();
        assert_eq!(wizard.current_panel(), 1);
        assert_eq!(wizard.completed_count(), 2);
    }
}

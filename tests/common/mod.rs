#![allow(dead_code)]

use std::time::Duration;

use panel_wizard::wizard::{
    AdvanceMode, FieldDefinition, ManualClock, NavigationPolicy, Notification, PanelDefinition,
    WizardBuilder, WizardController, WizardDefinition, WizardOptions,
};

pub type RecordingWizard = WizardController<Vec<Notification>>;

pub fn field(id: &str) -> FieldDefinition {
    FieldDefinition {
        id: id.into(),
        ..FieldDefinition::default()
    }
}

pub fn validated(id: &str, rule: &str) -> FieldDefinition {
    FieldDefinition {
        id: id.into(),
        validate: Some(rule.into()),
        ..FieldDefinition::default()
    }
}

pub fn panel(mode: AdvanceMode, fields: &[&str]) -> PanelDefinition {
    PanelDefinition {
        advance: Some(mode),
        fields: fields.iter().map(|id| id.to_string()).collect(),
        ..PanelDefinition::default()
    }
}

pub fn dependent_panel(mode: AdvanceMode, fields: &[&str], key: &str, value: &str) -> PanelDefinition {
    PanelDefinition {
        depends_on_key: Some(key.into()),
        depends_on_value: Some(value.into()),
        ..panel(mode, fields)
    }
}

/// Three radio panels, one group each: `a`, `b`, `c`.
pub fn three_radio_panels() -> WizardDefinition {
    WizardDefinition {
        name: "radios".into(),
        fields: vec![field("a"), field("b"), field("c")],
        panels: vec![
            panel(AdvanceMode::RadioSingle, &["a"]),
            panel(AdvanceMode::RadioSingle, &["b"]),
            panel(AdvanceMode::RadioSingle, &["c"]),
        ],
        ..WizardDefinition::default()
    }
}

pub fn options(navigation: NavigationPolicy) -> WizardOptions {
    WizardOptions {
        navigation,
        ..WizardOptions::default()
    }
}

/// Builds a wizard that records notifications and runs on a manual clock.
pub fn build_with(
    definition: WizardDefinition,
    options: WizardOptions,
) -> (RecordingWizard, ManualClock) {
    let clock = ManualClock::new();
    let wizard = WizardBuilder::new(definition)
        .options(options)
        .clock(clock.clone())
        .build(Vec::new())
        .expect("definition builds");
    (wizard, clock)
}

pub fn build(definition: WizardDefinition) -> (RecordingWizard, ManualClock) {
    build_with(definition, WizardOptions::default())
}

/// Advances the clock past the delay and lets the wizard react.
pub fn elapse(wizard: &mut RecordingWizard, clock: &ManualClock) -> bool {
    clock.advance(wizard.options().advance_delay + Duration::from_millis(1));
    wizard.poll()
}

pub fn take_notifications(wizard: &mut RecordingWizard) -> Vec<Notification> {
    std::mem::take(wizard.view_mut())
}

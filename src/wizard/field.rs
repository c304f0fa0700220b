use crate::validation::{RuleRegistry, ValidationOutcome};

/// One input control, owned by exactly one panel.
#[derive(Debug, Clone)]
pub struct Field {
    id: String,
    panel: usize,
    label: Option<String>,
    rule: Option<String>,
    soft_fail: bool,
    on_validate: Option<String>,
    value: String,
    validity: Option<bool>,
}

impl Field {
    pub fn new(id: impl Into<String>, panel: usize) -> Self {
        Self {
            id: id.into(),
            panel,
            label: None,
            rule: None,
            soft_fail: false,
            on_validate: None,
            value: String::new(),
            validity: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_soft_fail(mut self) -> Self {
        self.soft_fail = true;
        self
    }

    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.on_validate = Some(callback.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn panel(&self) -> usize {
        self.panel
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    pub fn must_validate(&self) -> bool {
        self.rule.is_some()
    }

    pub fn soft_fail(&self) -> bool {
        self.soft_fail
    }

    pub fn on_validate(&self) -> Option<&str> {
        self.on_validate.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Last validation result, `None` until validated.
    pub fn validity(&self) -> Option<bool> {
        self.validity
    }

    /// A failed validation that should hold the panel back.
    pub fn is_blocking(&self) -> bool {
        self.validity == Some(false) && !self.soft_fail
    }

    /// Runs the field's rule against its current value and records the
    /// result. Returns `None` for fields that do not validate.
    ///
    /// An unknown rule name is a definition mistake; it is logged and the
    /// value is treated as failing.
    pub fn validate(&mut self, rules: &RuleRegistry) -> Option<ValidationOutcome> {
        let rule = self.rule.as_deref()?;
        let outcome = match rules.evaluate(rule, &self.value) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(field = %self.id, error = %err, "validation rule missing");
                ValidationOutcome::fail(err.to_string())
            }
        };
        self.validity = Some(outcome.passed);
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_without_rule_skip_validation() {
        let mut field = Field::new("nickname", 0);
        field.set_value("");
        assert!(!field.must_validate());
        assert!(field.validate(&RuleRegistry::with_builtins()).is_none());
        assert_eq!(field.validity(), None);
    }

    #[test]
    fn validation_records_outcome() {
        let rules = RuleRegistry::with_builtins();
        let mut field = Field::new("age", 2).with_rule("isNumeric");

        field.set_value("forty");
        let outcome = field.validate(&rules).unwrap();
        assert!(!outcome.passed);
        assert!(field.is_blocking());

        field.set_value("40");
        assert!(field.validate(&rules).unwrap().passed);
        assert_eq!(field.validity(), Some(true));
        assert!(!field.is_blocking());
    }

    #[test]
    fn soft_failures_do_not_block() {
        let rules = RuleRegistry::with_builtins();
        let mut field = Field::new("team", 3)
            .with_rule("isGoldenState")
            .with_soft_fail();
        field.set_value("Celtics");
        assert!(!field.validate(&rules).unwrap().passed);
        assert!(!field.is_blocking());
    }

    #[test]
    fn unknown_rule_degrades_to_failure() {
        let mut field = Field::new("mystery", 0).with_rule("isMagic");
        field.set_value("anything");
        let outcome = field.validate(&RuleRegistry::with_builtins()).unwrap();
        assert!(!outcome.passed);
        assert_eq!(
            outcome.message.as_deref(),
            Some("Unknown validation rule: isMagic")
        );
    }

    #[test]
    fn label_falls_back_to_id() {
        assert_eq!(Field::new("city", 1).label(), "city");
        assert_eq!(Field::new("city", 1).with_label("City").label(), "City");
    }
}

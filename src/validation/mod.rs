//! Named validation rules applied to field values.
//!
//! Definitions refer to rules by name; the registry resolves the name to a
//! [`Rule`] and its user-facing message. Rules are pure predicates.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{Result, WizardError};

type RuleCallback = dyn Fn(&str) -> bool + Send + Sync;
type SharedRuleCallback = Arc<RuleCallback>;

/// Built-in predicate kinds.
#[derive(Clone)]
pub enum Rule {
    /// Value must equal the given text exactly.
    Equals(String),
    NonEmpty,
    MinLength(usize),
    Numeric,
    Custom(SharedRuleCallback),
}

impl Rule {
    pub fn test(&self, value: &str) -> bool {
        match self {
            Rule::Equals(expected) => value == expected,
            Rule::NonEmpty => !value.is_empty(),
            Rule::MinLength(min) => value.chars().count() >= *min,
            Rule::Numeric => is_numeric(value),
            Rule::Custom(func) => func(value),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Equals(expected) => f.debug_tuple("Equals").field(expected).finish(),
            Rule::NonEmpty => f.write_str("NonEmpty"),
            Rule::MinLength(min) => f.debug_tuple("MinLength").field(min).finish(),
            Rule::Numeric => f.write_str("Numeric"),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Accepts anything that reads as a finite number once surrounding
/// whitespace is removed: integers, decimals, exponents and `0x` hex.
fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return !hex.is_empty() && hex.chars().all(|ch| ch.is_ascii_hexdigit());
    }
    // `f64::from_str` also accepts "inf" and "NaN"; neither is finite.
    trimmed
        .parse::<f64>()
        .map(|parsed| parsed.is_finite())
        .unwrap_or(false)
}

/// A rule paired with the message shown when it fails.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub rule: Rule,
    pub message: String,
}

impl ValidationRule {
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Result of evaluating a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: Some(message.into()),
        }
    }
}

pub const DID_ANSWER_YES: &str = "didAnswerYes";
pub const IS_REQUIRED: &str = "isRequired";
pub const IS_TEXT_LENGTH_LONGER_THAN_THREE: &str = "isTextLengthLongerThanThree";
pub const IS_NUMERIC: &str = "isNumeric";
pub const IS_GOLDEN_STATE: &str = "isGoldenState";

/// Lookup table from rule name to [`ValidationRule`].
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, ValidationRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the questionnaire rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            DID_ANSWER_YES,
            ValidationRule::new(Rule::Equals("Yes".into()), "You should have answered yes."),
        );
        registry.register(
            IS_REQUIRED,
            ValidationRule::new(Rule::NonEmpty, "This field is required."),
        );
        registry.register(
            IS_TEXT_LENGTH_LONGER_THAN_THREE,
            ValidationRule::new(
                Rule::MinLength(3),
                "Input should be at least three characters.",
            ),
        );
        registry.register(
            IS_NUMERIC,
            ValidationRule::new(Rule::Numeric, "Should be a number"),
        );
        registry.register(
            IS_GOLDEN_STATE,
            ValidationRule::new(
                Rule::Equals("Golden State".into()),
                "Golden State is your favorite team.",
            ),
        );
        registry
    }

    /// Adds or replaces a rule under `name`.
    pub fn register(&mut self, name: impl Into<String>, rule: ValidationRule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ValidationRule> {
        self.rules.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn evaluate(&self, name: &str, value: &str) -> Result<ValidationOutcome> {
        let rule = self
            .rules
            .get(name)
            .ok_or_else(|| WizardError::UnknownRule(name.to_string()))?;
        if rule.rule.test(value) {
            Ok(ValidationOutcome::pass())
        } else {
            Ok(ValidationOutcome::fail(rule.message.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rule_rejects_empty_input() {
        let registry = RuleRegistry::with_builtins();
        let outcome = registry.evaluate(IS_REQUIRED, "").unwrap();
        assert_eq!(
            outcome,
            ValidationOutcome::fail("This field is required.")
        );
        assert!(registry.evaluate(IS_REQUIRED, "x").unwrap().passed);
    }

    #[test]
    fn length_rule_counts_three_characters() {
        let registry = RuleRegistry::with_builtins();
        assert!(!registry
            .evaluate(IS_TEXT_LENGTH_LONGER_THAN_THREE, "ab")
            .unwrap()
            .passed);
        assert!(registry
            .evaluate(IS_TEXT_LENGTH_LONGER_THAN_THREE, "abc")
            .unwrap()
            .passed);
        assert!(registry
            .evaluate(IS_TEXT_LENGTH_LONGER_THAN_THREE, "abcd")
            .unwrap()
            .passed);
    }

    #[test]
    fn numeric_rule_matches_loose_number_forms() {
        for value in ["42", " 3.5 ", "-1", "1e3", ".5", "0x1F"] {
            assert!(is_numeric(value), "expected `{value}` to be numeric");
        }
        for value in ["", "  ", "abc", "12px", "inf", "NaN", "0x"] {
            assert!(!is_numeric(value), "expected `{value}` to be rejected");
        }
    }

    #[test]
    fn exact_match_rules_are_case_sensitive() {
        let registry = RuleRegistry::with_builtins();
        assert!(registry.evaluate(DID_ANSWER_YES, "Yes").unwrap().passed);
        assert!(!registry.evaluate(DID_ANSWER_YES, "yes").unwrap().passed);
        let outcome = registry.evaluate(IS_GOLDEN_STATE, "Lakers").unwrap();
        assert_eq!(
            outcome.message.as_deref(),
            Some("Golden State is your favorite team.")
        );
    }

    #[test]
    fn unknown_rule_is_a_configuration_error() {
        let registry = RuleRegistry::with_builtins();
        let err = registry.evaluate("isShiny", "value").unwrap_err();
        assert!(matches!(err, WizardError::UnknownRule(ref name) if name == "isShiny"));
        assert!(err.is_configuration());
    }

    #[test]
    fn custom_rules_can_be_registered() {
        let mut registry = RuleRegistry::new();
        registry.register(
            "isEven",
            ValidationRule::new(
                Rule::Custom(Arc::new(|value| {
                    value.parse::<i64>().map(|n| n % 2 == 0).unwrap_or(false)
                })),
                "Should be even",
            ),
        );
        assert!(registry.evaluate("isEven", "4").unwrap().passed);
        assert!(!registry.evaluate("isEven", "5").unwrap().passed);
        assert_eq!(registry.names(), vec!["isEven"]);
    }
}

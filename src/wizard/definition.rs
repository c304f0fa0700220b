//! Declarative wizard description, loaded from JSON.
//!
//! A definition lists fields once and lets each panel reference the ids it
//! owns. Structural mistakes (missing or shared field ids) make a definition
//! unusable; references to unknown rules or callbacks are only reported,
//! since the wizard can run around them.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::callbacks::{CallbackRegistry, Flags};
use crate::errors::{Result, WizardError};
use crate::validation::RuleRegistry;

use super::panel::AdvanceMode;

const QUESTIONNAIRE_JSON: &str = include_str!("../../assets/questionnaire.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardDefinition {
    #[serde(default)]
    pub name: String,
    /// Initial flag values.
    #[serde(default)]
    pub flags: Flags,
    /// Extra flag-toggle callbacks, keyed by callback name.
    #[serde(default)]
    pub callbacks: BTreeMap<String, FlagToggleDefinition>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    pub panels: Vec<PanelDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance: Option<AdvanceMode>,
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Name of the validation rule; fields without one are not validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
    #[serde(default)]
    pub soft_fail: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagToggleDefinition {
    pub flag: String,
    #[serde(default = "FlagToggleDefinition::default_on_pass")]
    pub on_pass: String,
    #[serde(default = "FlagToggleDefinition::default_on_fail")]
    pub on_fail: String,
}

impl FlagToggleDefinition {
    fn default_on_pass() -> String {
        "yes".into()
    }

    fn default_on_fail() -> String {
        "no".into()
    }
}

impl WizardDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// The bundled sample questionnaire.
    pub fn questionnaire() -> Result<Self> {
        Self::from_json(QUESTIONNAIRE_JSON)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Maps each field id to the index of the panel that owns it.
    ///
    /// Fails when a panel references an undeclared field, when two panels
    /// claim the same field, when a field is declared twice or left
    /// unowned, or when a dependency is only half specified.
    pub fn field_owners(&self) -> Result<HashMap<String, usize>> {
        let mut declared: HashMap<&str, bool> = HashMap::new();
        for field in &self.fields {
            if field.id.trim().is_empty() {
                return Err(WizardError::InvalidDefinition(
                    "field ids must not be empty".into(),
                ));
            }
            if declared.insert(field.id.as_str(), false).is_some() {
                return Err(WizardError::DuplicateField(field.id.clone()));
            }
        }

        let mut owners = HashMap::new();
        for (index, panel) in self.panels.iter().enumerate() {
            if panel.depends_on_key.is_some() != panel.depends_on_value.is_some() {
                return Err(WizardError::InvalidDefinition(format!(
                    "panel {} must set both depends_on_key and depends_on_value",
                    index + 1
                )));
            }
            for id in &panel.fields {
                match declared.get_mut(id.as_str()) {
                    None => return Err(WizardError::UnknownField(id.clone())),
                    Some(claimed) if *claimed => {
                        return Err(WizardError::DuplicateField(id.clone()))
                    }
                    Some(claimed) => *claimed = true,
                }
                owners.insert(id.clone(), index);
            }
        }

        if let Some(field) = self.fields.iter().find(|field| !owners.contains_key(&field.id)) {
            return Err(WizardError::InvalidDefinition(format!(
                "field `{}` does not belong to any panel",
                field.id
            )));
        }

        Ok(owners)
    }

    /// Lists configuration errors: rules or callbacks the registries do not
    /// know. Callbacks declared by the definition itself count as known.
    pub fn check(&self, rules: &RuleRegistry, callbacks: &CallbackRegistry) -> Vec<WizardError> {
        let mut issues = Vec::new();
        for field in &self.fields {
            if let Some(rule) = &field.validate {
                if !rules.contains(rule) {
                    issues.push(WizardError::UnknownRule(rule.clone()));
                }
            }
            if let Some(callback) = &field.callback {
                if !callbacks.contains(callback) && !self.callbacks.contains_key(callback) {
                    issues.push(WizardError::UnknownCallback(callback.clone()));
                }
            }
        }
        issues
    }

    /// Registers the definition's flag toggles into `callbacks`.
    pub fn register_callbacks(&self, callbacks: &mut CallbackRegistry) {
        for (name, toggle) in &self.callbacks {
            callbacks.register_flag_toggle(
                name.clone(),
                toggle.flag.clone(),
                toggle.on_pass.clone(),
                toggle.on_fail.clone(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: &str) -> FieldDefinition {
        FieldDefinition {
            id: id.into(),
            ..FieldDefinition::default()
        }
    }

    fn panel(fields: &[&str]) -> PanelDefinition {
        PanelDefinition {
            advance: Some(AdvanceMode::TextSingle),
            fields: fields.iter().map(|id| id.to_string()).collect(),
            ..PanelDefinition::default()
        }
    }

    #[test]
    fn questionnaire_is_well_formed() {
        let definition = WizardDefinition::questionnaire().unwrap();
        let owners = definition.field_owners().unwrap();
        assert_eq!(owners.len(), definition.fields.len());
        let issues = definition.check(
            &RuleRegistry::with_builtins(),
            &CallbackRegistry::with_builtins(),
        );
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn shared_field_is_rejected() {
        let definition = WizardDefinition {
            fields: vec![field("name")],
            panels: vec![panel(&["name"]), panel(&["name"])],
            ..WizardDefinition::default()
        };
        assert!(matches!(
            definition.field_owners(),
            Err(WizardError::DuplicateField(id)) if id == "name"
        ));
    }

    #[test]
    fn undeclared_field_is_rejected() {
        let definition = WizardDefinition {
            fields: vec![field("name")],
            panels: vec![panel(&["name", "email"])],
            ..WizardDefinition::default()
        };
        assert!(matches!(
            definition.field_owners(),
            Err(WizardError::UnknownField(id)) if id == "email"
        ));
    }

    #[test]
    fn orphan_field_is_rejected() {
        let definition = WizardDefinition {
            fields: vec![field("name"), field("email")],
            panels: vec![panel(&["name"])],
            ..WizardDefinition::default()
        };
        assert!(matches!(
            definition.field_owners(),
            Err(WizardError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn half_dependency_is_rejected() {
        let mut dependent = panel(&[]);
        dependent.depends_on_key = Some("isDope".into());
        let definition = WizardDefinition {
            panels: vec![dependent],
            ..WizardDefinition::default()
        };
        assert!(matches!(
            definition.field_owners(),
            Err(WizardError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn check_reports_unknown_names() {
        let mut team = field("team");
        team.validate = Some("isLakers".into());
        team.callback = Some("updateMood".into());
        let mut city = field("city");
        city.callback = Some("declared".into());

        let mut definition = WizardDefinition {
            fields: vec![team, city],
            panels: vec![panel(&["team", "city"])],
            ..WizardDefinition::default()
        };
        definition.callbacks.insert(
            "declared".into(),
            FlagToggleDefinition {
                flag: "cityGiven".into(),
                on_pass: "yes".into(),
                on_fail: "no".into(),
            },
        );

        let issues = definition.check(
            &RuleRegistry::with_builtins(),
            &CallbackRegistry::with_builtins(),
        );
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(WizardError::is_configuration));
    }

    #[test]
    fn json_uses_snake_case_keys_and_camel_case_modes() {
        let json = r#"{
            "flags": { "isDope": "no" },
            "callbacks": { "markCity": { "flag": "hasCity" } },
            "fields": [ { "id": "city", "validate": "isRequired", "callback": "markCity" } ],
            "panels": [
                { "advance": "textSingle", "fields": ["city"] },
                { "depends_on_key": "hasCity", "depends_on_value": "yes", "advance": "affirm" }
            ]
        }"#;
        let definition = WizardDefinition::from_json(json).unwrap();
        assert_eq!(definition.panels[0].advance, Some(AdvanceMode::TextSingle));
        assert_eq!(definition.callbacks["markCity"].on_pass, "yes");
        assert_eq!(definition.callbacks["markCity"].on_fail, "no");
        assert_eq!(definition.flags.get("isDope").map(String::as_str), Some("no"));

        let mut callbacks = CallbackRegistry::new();
        definition.register_callbacks(&mut callbacks);
        assert!(callbacks.contains("markCity"));
    }
}

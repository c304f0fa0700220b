//! Named hooks run after a field has been validated.
//!
//! A callback receives whether validation passed and may update the wizard
//! flags. Flag changes are what drive conditional panel presence.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

pub type Flags = BTreeMap<String, String>;

type CallbackFn = dyn Fn(bool, &mut Flags) + Send + Sync;

/// Built-in callback recording the answer to the favourite team question.
pub const UPDATE_IS_DOPE: &str = "updateIsDope";
pub const IS_DOPE_FLAG: &str = "isDope";

#[derive(Clone, Default)]
pub struct CallbackRegistry {
    callbacks: HashMap<String, Arc<CallbackFn>>,
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_flag_toggle(UPDATE_IS_DOPE, IS_DOPE_FLAG, "yes", "no");
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(bool, &mut Flags) + Send + Sync + 'static,
    {
        self.callbacks.insert(name.into(), Arc::new(callback));
    }

    /// Registers a callback that writes `on_pass` or `on_fail` into `flag`.
    pub fn register_flag_toggle(
        &mut self,
        name: impl Into<String>,
        flag: impl Into<String>,
        on_pass: impl Into<String>,
        on_fail: impl Into<String>,
    ) {
        let flag = flag.into();
        let on_pass = on_pass.into();
        let on_fail = on_fail.into();
        self.register(name, move |did_pass, flags: &mut Flags| {
            let value = if did_pass { &on_pass } else { &on_fail };
            flags.insert(flag.clone(), value.clone());
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.callbacks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Runs the callback registered under `name`.
    ///
    /// Returns `false` without touching `flags` when nothing is registered
    /// under that name.
    pub fn invoke(&self, name: &str, did_pass: bool, flags: &mut Flags) -> bool {
        match self.callbacks.get(name) {
            Some(callback) => {
                callback(did_pass, flags);
                tracing::debug!(callback = name, did_pass, "callback applied");
                true
            }
            None => {
                tracing::warn!(callback = name, "callback is not registered; flags unchanged");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_toggle_sets_yes_and_no() {
        let registry = CallbackRegistry::with_builtins();
        let mut flags = Flags::new();

        assert!(registry.invoke(UPDATE_IS_DOPE, true, &mut flags));
        assert_eq!(flags.get(IS_DOPE_FLAG).map(String::as_str), Some("yes"));

        assert!(registry.invoke(UPDATE_IS_DOPE, false, &mut flags));
        assert_eq!(flags.get(IS_DOPE_FLAG).map(String::as_str), Some("no"));
    }

    #[test]
    fn unknown_callback_leaves_flags_alone() {
        let registry = CallbackRegistry::with_builtins();
        let mut flags = Flags::new();
        flags.insert("answer".into(), "42".into());

        assert!(!registry.invoke("updateNothing", true, &mut flags));
        assert_eq!(flags.len(), 1);
        assert_eq!(flags.get("answer").map(String::as_str), Some("42"));
    }

    #[test]
    fn custom_callbacks_see_the_outcome() {
        let mut registry = CallbackRegistry::new();
        registry.register("countFailures", |did_pass, flags: &mut Flags| {
            if !did_pass {
                let count = flags
                    .get("failures")
                    .and_then(|value| value.parse::<u32>().ok())
                    .unwrap_or(0);
                flags.insert("failures".into(), (count + 1).to_string());
            }
        });

        let mut flags = Flags::new();
        registry.invoke("countFailures", false, &mut flags);
        registry.invoke("countFailures", true, &mut flags);
        registry.invoke("countFailures", false, &mut flags);
        assert_eq!(flags.get("failures").map(String::as_str), Some("2"));
        assert_eq!(registry.names(), vec!["countFailures"]);
    }
}

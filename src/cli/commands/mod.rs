pub mod config;
pub mod navigation;
pub mod system;
pub mod wizard;

use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "status", "click", "blur", "submit", "radio", "next", "back", "complete", "wait", "keys",
    "flags", "config", "help", "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(wizard::definitions());
    commands.extend(navigation::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
    registry.alias("quit", "exit");
    registry.alias("forward", "next");
    registry.alias("backward", "back");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_is_ordered_and_unique() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ROOT_COMMAND_ORDER);
        assert!(registry.get("quit").is_some());
        assert_eq!(registry.get("forward").map(|entry| entry.name), Some("next"));
    }
}

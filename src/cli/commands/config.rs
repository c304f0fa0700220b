use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::CommandEntry;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change saved preferences",
        "config [show|set <key> <value>|path]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(&context.config);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            set_config_value(context, key, value.trim())
        }
        "path" => {
            output::info(context.config_manager.path().display());
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`"
        ))),
    }
}

fn show_config(config: &Config) {
    output::section("Configuration");
    output::detail(format!("advance_delay_ms : {}", config.advance_delay_ms));
    output::detail(format!("navigation       : {:?}", config.navigation));
    output::detail(format!("forward_guard    : {:?}", config.forward_guard));
    output::detail(format!("log_level        : {}", config.log_level));
    output::detail(format!(
        "color            : {}",
        if config.color { "on" } else { "off" }
    ));
    output::detail(format!(
        "definition_path  : {}",
        config
            .definition_path
            .as_ref()
            .map_or_else(|| "(built-in)".to_string(), |path| path.display().to_string())
    ));
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;

    if key == "color" {
        output::set_preferences(OutputPreferences {
            color: context.config.color,
        });
        output::success(format!("Updated `{key}`."));
    } else {
        output::success(format!("Updated `{key}`; it applies from the next session."));
    }
    tracing::info!(key, value, "configuration updated");
    Ok(())
}

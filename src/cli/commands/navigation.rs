use crate::cli::core::{CliMode, CommandResult, ShellContext};
use crate::cli::keys;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::wizard::Direction;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "next",
            "Move to the next panel once the current one is complete",
            "next",
            cmd_next,
        ),
        CommandEntry::new(
            "back",
            "Return to the previous panel, cancelling a pending advance",
            "back",
            cmd_back,
        ),
        CommandEntry::new(
            "wait",
            "Let a pending advance happen now",
            "wait",
            cmd_wait,
        ),
        CommandEntry::new(
            "keys",
            "Navigate with the arrow keys (Esc or q to leave)",
            "keys",
            cmd_keys,
        ),
    ]
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.navigate(Direction::Forward)
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.navigate(Direction::Backward)
}

fn cmd_wait(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.wizard.has_pending_advance() {
        output::info("No advance pending.");
        return Ok(());
    }
    match context.mode {
        CliMode::Interactive => context.settle(),
        CliMode::Script => context.skip_delay(),
    };
    Ok(())
}

fn cmd_keys(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode == CliMode::Script {
        output::warning("Arrow-key navigation needs an interactive terminal.");
        return Ok(());
    }
    keys::run_arrow_navigation(context)
}

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::status_lines;
use crate::wizard::WizardEvent;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show every panel with its fields and state",
            "status",
            cmd_status,
        ),
        CommandEntry::new(
            "click",
            "Click a field (affirm or radio panels)",
            "click <field>",
            cmd_click,
        ),
        CommandEntry::new(
            "blur",
            "Type a value into a text field and leave it",
            "blur <field> <value>",
            cmd_blur,
        ),
        CommandEntry::new(
            "submit",
            "Type a value into a text field and press Enter",
            "submit <field> <value>",
            cmd_submit,
        ),
        CommandEntry::new(
            "radio",
            "Select an option in a radio group",
            "radio <group> <value>",
            cmd_radio,
        ),
        CommandEntry::new(
            "complete",
            "Mark a panel complete (defaults to the current one)",
            "complete [panel-number]",
            cmd_complete,
        ),
        CommandEntry::new(
            "flags",
            "Show the flags set by answers so far",
            "flags",
            cmd_flags,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!(
        "{} ({})",
        context.definition_name, context.definition_source
    ));
    for line in status_lines(&context.wizard) {
        output::detail(line);
    }
    Ok(())
}

fn cmd_click(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let field_id = field_arg(args, "usage: click <field>")?;
    context.send(WizardEvent::FieldClick { field_id })
}

fn cmd_blur(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (field_id, value) = field_and_value(args, "usage: blur <field> <value>", true)?;
    context.send(WizardEvent::FieldBlur { field_id, value })
}

fn cmd_submit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (field_id, value) = field_and_value(args, "usage: submit <field> <value>", true)?;
    context.send(WizardEvent::FieldSubmit { field_id, value })
}

fn cmd_radio(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (group_id, value) = field_and_value(args, "usage: radio <group> <value>", false)?;
    context.send(WizardEvent::RadioChange { group_id, value })
}

fn cmd_complete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = match args.first() {
        Some(raw) => parse_panel_number(raw)?,
        None => context.wizard.current_panel(),
    };
    context.wizard.complete_panel(index)?;
    context.settle_if_interactive();
    Ok(())
}

fn cmd_flags(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let flags = context.wizard.flags();
    if flags.is_empty() {
        output::info("No flags set.");
        return Ok(());
    }
    output::section("Flags");
    for (key, value) in flags {
        output::detail(format!("{key} = {value}"));
    }
    Ok(())
}

fn field_arg(args: &[&str], usage: &str) -> Result<String, CommandError> {
    match args {
        [field] => Ok((*field).to_string()),
        _ => Err(CommandError::InvalidArguments(usage.into())),
    }
}

/// Splits `<field> <value...>`; text values may span several words and may
/// be empty.
fn field_and_value(
    args: &[&str],
    usage: &str,
    allow_empty: bool,
) -> Result<(String, String), CommandError> {
    let Some((field, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(usage.into()));
    };
    if rest.is_empty() && !allow_empty {
        return Err(CommandError::InvalidArguments(usage.into()));
    }
    Ok(((*field).to_string(), rest.join(" ")))
}

fn parse_panel_number(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not a panel number (panels are numbered from 1)"
        ))),
    }
}

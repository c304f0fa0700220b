//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, thread};

use dialoguer::Confirm;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::errors::WizardError;
use crate::wizard::{Direction, Panel, WizardEvent};

pub use crate::cli::shell_context::{CliMode, DefinitionSource, ShellContext};
pub use crate::errors::CliError;

use super::output;
use super::registry::CommandEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub(crate) fn prompt(&self) -> String {
        let current = self.wizard.current_panel() + 1;
        match self.wizard.current().and_then(|panel| panel.title()) {
            Some(title) => format!("wizard [{current}: {title}]> "),
            None => format!("wizard [{current}]> "),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.all_names()
    }

    pub(crate) fn field_ids(&self) -> Vec<String> {
        self.wizard
            .fields()
            .iter()
            .map(|field| field.id().to_string())
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() || tokens[0].starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        let raw = &tokens[0];
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt("Exit the wizard?")
            .default(true)
            .interact()
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(WizardError::UnknownField(id)) => {
                self.print_error(&format!("No field named `{id}` in this wizard."));
                self.print_hint("Use `status` to list the fields of each panel.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        output::hint(message);
    }

    /// Feeds one event to the wizard, then lets any scheduled advance run.
    pub(crate) fn send(&mut self, event: WizardEvent) -> CommandResult {
        self.wizard.handle(event)?;
        self.settle_if_interactive();
        Ok(())
    }

    /// Interactive sessions wait out the advance delay after each action;
    /// scripts leave the advance pending until `wait`.
    pub(crate) fn settle_if_interactive(&mut self) {
        if self.mode == CliMode::Interactive {
            self.settle();
        } else {
            self.announce_finish();
        }
    }

    /// Waits out the advance delay and applies the pending move, if any.
    pub(crate) fn settle(&mut self) -> bool {
        if let Some(remaining) = self.wizard.time_until_advance() {
            thread::sleep(remaining);
        }
        let moved = self.wizard.poll();
        self.announce_finish();
        moved
    }

    /// Applies the pending move without waiting for the delay.
    pub(crate) fn skip_delay(&mut self) -> bool {
        let moved = self.wizard.run_pending();
        self.announce_finish();
        moved
    }

    pub(crate) fn navigate(&mut self, direction: Direction) -> CommandResult {
        let complete = self.wizard.current().is_some_and(Panel::is_complete);
        if direction == Direction::Forward && !complete {
            return Err(CommandError::Message(format!(
                "Panel {} is not complete yet.",
                self.wizard.current_panel() + 1
            )));
        }
        self.send(WizardEvent::KeyNavigation(direction))
    }

    fn announce_finish(&mut self) {
        if self.wizard.is_finished() && !self.finish_announced {
            self.finish_announced = true;
            output::success(format!("`{}` complete.", self.definition_name));
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] WizardError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(lines: &[&str]) -> Result<ShellContext, CliError> {
    use crate::config::{Config, ConfigManager};

    let dir = tempfile::tempdir()?;
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf())?;
    let mut app = ShellContext::new(CliMode::Script, manager, Config::default(), None)?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}

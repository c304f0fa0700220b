//! Arrow-key navigation mode.

use std::{
    io::{self, Write},
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal,
};

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output::{self, MessageKind};
use crate::wizard::{Direction, WizardEvent};

const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Quit,
    Other,
}

pub fn classify(code: KeyCode, modifiers: KeyModifiers) -> NavKey {
    match code {
        KeyCode::Left => NavKey::Left,
        KeyCode::Right => NavKey::Right,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => NavKey::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => NavKey::Quit,
        _ => NavKey::Other,
    }
}

struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn activate() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { active: true })
    }

    fn deactivate(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Left goes back, Right goes forward when the current panel is complete.
/// Pending advances fire while waiting for keys.
pub fn run_arrow_navigation(context: &mut ShellContext) -> CommandResult {
    output::hint("Left/Right to move between panels, Esc or q to return.");
    let mut guard = RawModeGuard::activate()?;
    context.wizard.view_mut().set_raw_mode(true);

    let result = navigation_loop(context);

    context.wizard.view_mut().set_raw_mode(false);
    guard.deactivate();
    result
}

fn navigation_loop(context: &mut ShellContext) -> CommandResult {
    loop {
        let timeout = context.wizard.time_until_advance().unwrap_or(IDLE_POLL);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match classify(key.code, key.modifiers) {
                    NavKey::Left => {
                        context
                            .wizard
                            .handle(WizardEvent::KeyNavigation(Direction::Backward))?;
                    }
                    NavKey::Right => {
                        if !context.wizard.current().is_some_and(|panel| panel.is_complete()) {
                            raw_line(
                                MessageKind::Warning,
                                format!(
                                    "Panel {} is not complete yet.",
                                    context.wizard.current_panel() + 1
                                ),
                            );
                        }
                        context
                            .wizard
                            .handle(WizardEvent::KeyNavigation(Direction::Forward))?;
                    }
                    NavKey::Quit => return Ok(()),
                    NavKey::Other => {}
                }
            }
        }
        context.wizard.poll();
    }
}

fn raw_line(kind: MessageKind, message: String) {
    let mut stdout = io::stdout();
    let _ = write!(stdout, "{}\r\n", output::styled(kind, message));
    let _ = stdout.flush();
}

//! Terminal rendering for wizard notifications and status.

use std::io::{self, Write};

use crate::cli::output::{self, MessageKind};
use crate::wizard::{Notification, Panel, WizardController, WizardView};

/// Prints wizard notifications as they arrive.
///
/// Presence and progress are re-announced by the controller whenever it
/// recounts; only actual changes are printed.
pub struct TerminalView {
    titles: Vec<Option<String>>,
    presence: Vec<Option<bool>>,
    progress: Option<(usize, usize)>,
    raw_mode: bool,
}

impl TerminalView {
    pub fn new(titles: Vec<Option<String>>) -> Self {
        let presence = vec![None; titles.len()];
        Self {
            titles,
            presence,
            progress: None,
            raw_mode: false,
        }
    }

    /// Raw terminal mode needs explicit carriage returns.
    pub fn set_raw_mode(&mut self, raw_mode: bool) {
        self.raw_mode = raw_mode;
    }

    fn panel_label(&self, index: usize) -> String {
        match self.titles.get(index).and_then(Option::as_deref) {
            Some(title) => format!("Panel {} ({})", index + 1, title),
            None => format!("Panel {}", index + 1),
        }
    }

    /// Message for one notification, or `None` when nothing changed that
    /// is worth printing.
    pub fn render(&mut self, notification: &Notification) -> Option<(MessageKind, String)> {
        match notification {
            Notification::PanelActiveChanged {
                index,
                is_active: true,
            } => Some((MessageKind::Info, format!("Now on {}", self.panel_label(*index)))),
            Notification::PanelActiveChanged { .. } => None,
            Notification::PanelCompletedChanged {
                index,
                is_complete: true,
            } => Some((MessageKind::Success, format!("Panel {} passed!", index + 1))),
            Notification::PanelCompletedChanged { .. } => None,
            Notification::PanelErrorChanged {
                index,
                has_error: true,
                message,
            } => Some((
                MessageKind::Error,
                format!(
                    "Panel {} failed: {}",
                    index + 1,
                    message.as_deref().unwrap_or("validation failed")
                ),
            )),
            Notification::PanelErrorChanged { index, .. } => Some((
                MessageKind::Detail,
                format!("Panel {} error cleared", index + 1),
            )),
            Notification::PanelPresenceChanged { index, is_present } => {
                let slot = self.presence.get_mut(*index)?;
                let previous = slot.replace(*is_present);
                match previous {
                    Some(previous) if previous != *is_present => {
                        let state = if *is_present { "shown" } else { "hidden" };
                        Some((
                            MessageKind::Hint,
                            format!("{} is now {}", self.panel_label(*index), state),
                        ))
                    }
                    _ => None,
                }
            }
            Notification::ProgressChanged { completed, total } => {
                let progress = (*completed, *total);
                if self.progress == Some(progress) {
                    return None;
                }
                self.progress = Some(progress);
                Some((
                    MessageKind::Detail,
                    format!("Progress: {completed}/{total}"),
                ))
            }
            Notification::FieldValidityChanged {
                field_id,
                is_valid: true,
                ..
            } => Some((MessageKind::Detail, format!("`{field_id}` accepted"))),
            Notification::FieldValidityChanged {
                field_id, message, ..
            } => Some((
                MessageKind::Warning,
                format!(
                    "`{field_id}` rejected: {}",
                    message.as_deref().unwrap_or("invalid value")
                ),
            )),
        }
    }
}

impl WizardView for TerminalView {
    fn notify(&mut self, notification: Notification) {
        let Some((kind, message)) = self.render(&notification) else {
            return;
        };
        if self.raw_mode {
            let mut stdout = io::stdout();
            let _ = write!(stdout, "{}\r\n", output::styled(kind, message));
            let _ = stdout.flush();
        } else {
            output::print(kind, message);
        }
    }
}

/// One line per panel followed by progress, as shown by `status`.
pub fn status_lines<V: WizardView>(wizard: &WizardController<V>) -> Vec<String> {
    let mut lines: Vec<String> = wizard
        .panels()
        .iter()
        .map(|panel| panel_line(wizard, panel))
        .collect();
    lines.push(format!(
        "Progress: {}/{}  (panel {} of {})",
        wizard.completed_count(),
        wizard.present_count(),
        wizard.current_position() + 1,
        wizard.present_count().max(1)
    ));
    if wizard.is_finished() {
        lines.push("All panels complete.".to_string());
    }
    lines
}

fn panel_line<V: WizardView>(wizard: &WizardController<V>, panel: &Panel) -> String {
    let marker = if panel.is_active() { ">" } else { " " };
    let mut tags = Vec::new();
    if panel.is_complete() {
        tags.push("done");
    }
    if panel.has_error() {
        tags.push("error");
    }
    if !panel.is_present() {
        tags.push("hidden");
    }
    let title = panel.title().unwrap_or("untitled");
    let fields = panel
        .field_ids()
        .iter()
        .map(|id| match wizard.field(id) {
            Some(field) if field.label() != id.as_str() => format!("{id} ({})", field.label()),
            _ => id.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    if tags.is_empty() {
        format!("{marker} {}. {title} [{fields}]", panel.number())
    } else {
        format!(
            "{marker} {}. {title} [{fields}] ({})",
            panel.number(),
            tags.join(", ")
        )
    }
}

//! One-way notifications from the wizard core to whatever renders it.

/// A single state change the view layer may want to reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    PanelActiveChanged {
        index: usize,
        is_active: bool,
    },
    PanelCompletedChanged {
        index: usize,
        is_complete: bool,
    },
    PanelErrorChanged {
        index: usize,
        has_error: bool,
        message: Option<String>,
    },
    PanelPresenceChanged {
        index: usize,
        is_present: bool,
    },
    ProgressChanged {
        completed: usize,
        total: usize,
    },
    FieldValidityChanged {
        field_id: String,
        is_valid: bool,
        message: Option<String>,
    },
}

/// Rendering surface driven by the controller.
pub trait WizardView {
    fn notify(&mut self, notification: Notification);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl WizardView for NullView {
    fn notify(&mut self, _notification: Notification) {}
}

/// Records notifications in order; handy for tests and replay.
impl WizardView for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl<V: WizardView + ?Sized> WizardView for Box<V> {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

//! Panel sequencing, completion tracking and conditional presence.

pub mod controller;
pub mod definition;
pub mod field;
pub mod panel;
pub mod schedule;
pub mod state;
pub mod view;

pub use controller::{
    Direction, WizardBuilder, WizardController, WizardEvent, WizardOptions, DEFAULT_ADVANCE_DELAY,
};
pub use definition::{FieldDefinition, FlagToggleDefinition, PanelDefinition, WizardDefinition};
pub use field::Field;
pub use panel::{AdvanceAction, AdvanceMode, Dependency, Interaction, Panel};
pub use schedule::{AdvanceTimer, Clock, ManualClock, PendingAdvance, ScheduleOutcome, SystemClock};
pub use state::{Command, ForwardGuard, NavigationPolicy, WizardState};
pub use view::{Notification, NullView, WizardView};

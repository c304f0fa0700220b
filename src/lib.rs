#![doc(test(attr(deny(warnings))))]

//! Panel Wizard sequences multi-step forms: it gates forward navigation on
//! panel completion, validates fields against named rules, and shows or
//! hides later panels based on flags set by earlier answers.

pub mod callbacks;
pub mod cli;
pub mod config;
pub mod errors;
pub mod utils;
pub mod validation;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing at the default level and emits a startup log.
pub fn init() {
    init_with_level("info");
}

/// Initializes global tracing with `level` as the crate's default filter.
pub fn init_with_level(level: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(level);
        tracing::info!("Panel Wizard tracing initialized.");
    });
}

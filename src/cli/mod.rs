pub mod commands;
pub mod core;
mod help;
pub mod keys;
pub mod output;
pub mod registry;
pub mod render;
mod shell;
mod shell_context;

pub use render::TerminalView;
pub use shell::{run_cli, SCRIPT_ENV};

use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    errors::CliError,
    wizard::{WizardBuilder, WizardController, WizardDefinition},
};

use super::commands;
use super::output::{self, OutputPreferences};
use super::registry::CommandRegistry;
use super::render::TerminalView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Where the running wizard definition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionSource {
    BuiltIn,
    File(PathBuf),
}

impl std::fmt::Display for DefinitionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionSource::BuiltIn => write!(f, "built-in questionnaire"),
            DefinitionSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub wizard: WizardController<TerminalView>,
    pub definition_name: String,
    pub definition_source: DefinitionSource,
    pub finish_announced: bool,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Builds a shell around `config`, loading the definition from
    /// `definition` or the configured path, falling back to the built-in
    /// questionnaire.
    pub fn new(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        definition: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        output::set_preferences(OutputPreferences {
            color: config.color,
        });

        let source = match definition.or_else(|| config.definition_path.clone()) {
            Some(path) => DefinitionSource::File(path),
            None => DefinitionSource::BuiltIn,
        };
        let definition = match &source {
            DefinitionSource::File(path) => WizardDefinition::load(path)?,
            DefinitionSource::BuiltIn => WizardDefinition::questionnaire()?,
        };
        tracing::info!(source = %source, name = %definition.name, "loading wizard definition");

        let titles = definition
            .panels
            .iter()
            .map(|panel| panel.title.clone())
            .collect();
        let definition_name = definition.name.clone();
        let wizard = WizardBuilder::new(definition)
            .options(config.wizard_options())
            .build(TerminalView::new(titles))?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            wizard,
            definition_name,
            definition_source: source,
            finish_announced: false,
            last_command: None,
            running: true,
        })
    }
}

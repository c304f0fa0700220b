use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use dirs::home_dir;

use crate::errors::{Result, WizardError};
use crate::wizard::{ForwardGuard, NavigationPolicy, WizardOptions};

const DEFAULT_DIR_NAME: &str = ".panel_wizard";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
pub const HOME_ENV: &str = "PANEL_WIZARD_HOME";

/// User preferences for the wizard shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default)]
    pub navigation: NavigationPolicy,
    #[serde(default)]
    pub forward_guard: ForwardGuard,
    #[serde(default = "Config::default_log_level")]
    pub log_level: String,
    #[serde(default = "Config::default_color")]
    pub color: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Wizard definition loaded when none is given on the command line.
    pub definition_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advance_delay_ms: Self::default_advance_delay_ms(),
            navigation: NavigationPolicy::default(),
            forward_guard: ForwardGuard::default(),
            log_level: Self::default_log_level(),
            color: Self::default_color(),
            definition_path: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "advance_delay_ms",
        "navigation",
        "forward_guard",
        "log_level",
        "color",
        "definition_path",
    ];

    fn default_advance_delay_ms() -> u64 {
        500
    }

    fn default_log_level() -> String {
        "info".into()
    }

    fn default_color() -> bool {
        true
    }

    pub fn wizard_options(&self) -> WizardOptions {
        WizardOptions {
            advance_delay: Duration::from_millis(self.advance_delay_ms),
            navigation: self.navigation,
            forward_guard: self.forward_guard,
        }
    }

    /// Updates a single setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "advance_delay_ms" => {
                self.advance_delay_ms = value.parse().map_err(|_| {
                    WizardError::Config(format!("`{value}` is not a delay in milliseconds"))
                })?;
            }
            "navigation" => self.navigation = parse_choice(key, value)?,
            "forward_guard" => self.forward_guard = parse_choice(key, value)?,
            "log_level" => {
                let level = value.to_ascii_lowercase();
                if !matches!(
                    level.as_str(),
                    "trace" | "debug" | "info" | "warn" | "error" | "off"
                ) {
                    return Err(WizardError::Config(format!("unknown log level `{value}`")));
                }
                self.log_level = level;
            }
            "color" => {
                self.color = match value.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" | "1" => true,
                    "off" | "false" | "no" | "0" => false,
                    _ => {
                        return Err(WizardError::Config(format!(
                            "`{value}` is not on/off"
                        )))
                    }
                };
            }
            "definition_path" => {
                self.definition_path = if value.is_empty() || value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            other => {
                return Err(WizardError::Config(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_choice<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase()))
        .map_err(|_| WizardError::Config(format!("`{value}` is not a valid {key}")))
}

/// Returns the application directory, defaulting to `~/.panel_wizard`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Handles persistence for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/x/config.json")),
            PathBuf::from("/x/config.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/x/config")), PathBuf::from("/x/config.tmp"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{ "navigation": "sequential" }"#).unwrap();
        assert_eq!(config.navigation, NavigationPolicy::Sequential);
        assert_eq!(config.advance_delay_ms, 500);
        assert_eq!(config.log_level, "info");
        assert!(config.color);
    }

    #[test]
    fn set_parses_each_key() {
        let mut config = Config::default();
        config.set("advance_delay_ms", "250").unwrap();
        config.set("navigation", "Sequential").unwrap();
        config.set("forward_guard", "restart").unwrap();
        config.set("log_level", "DEBUG").unwrap();
        config.set("color", "off").unwrap();
        config.set("definition_path", "/tmp/form.json").unwrap();

        assert_eq!(config.advance_delay_ms, 250);
        assert_eq!(config.navigation, NavigationPolicy::Sequential);
        assert_eq!(config.forward_guard, ForwardGuard::Restart);
        assert_eq!(config.log_level, "debug");
        assert!(!config.color);
        assert_eq!(config.definition_path, Some(PathBuf::from("/tmp/form.json")));

        config.set("definition_path", "none").unwrap();
        assert!(config.definition_path.is_none());
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("advance_delay_ms", "soon").is_err());
        assert!(config.set("navigation", "teleport").is_err());
        assert!(config.set("log_level", "chatty").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn wizard_options_follow_config() {
        let mut config = Config::default();
        config.advance_delay_ms = 0;
        let options = config.wizard_options();
        assert_eq!(options.advance_delay, Duration::ZERO);
        assert_eq!(options.navigation, NavigationPolicy::SkipHidden);
    }
}

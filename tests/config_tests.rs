use std::time::Duration;

use panel_wizard::config::{Config, ConfigManager};
use panel_wizard::wizard::{ForwardGuard, NavigationPolicy};
use tempfile::tempdir;

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("nested")).expect("manager");

    let config = manager.load().expect("load config");
    assert_eq!(config, Config::default());
    assert_eq!(config.wizard_options().advance_delay, Duration::from_millis(500));
    assert!(dir.path().join("nested").is_dir());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut config = Config::default();
    config.set("navigation", "sequential").expect("navigation");
    config.set("forward_guard", "restart").expect("guard");
    config.set("advance_delay_ms", "0").expect("delay");

    manager.save(&config).expect("save config");
    assert!(manager.path().exists());
    assert!(!manager.path().with_extension("json.tmp").exists());

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, config);
    let options = loaded.wizard_options();
    assert_eq!(options.navigation, NavigationPolicy::Sequential);
    assert_eq!(options.forward_guard, ForwardGuard::Restart);
    assert_eq!(options.advance_delay, Duration::ZERO);
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(manager.path(), "not json").expect("write");

    assert!(manager.load().is_err());
}

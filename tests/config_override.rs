//! `CODENAV_CONFIG_DIR` override; kept in its own binary since it mutates the environment

use codenav::config_paths;

#[test]
fn test_env_override_relocates_every_path() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var(config_paths::CONFIG_DIR_ENV, dir.path());

    assert_eq!(config_paths::config_dir().unwrap(), dir.path());
    assert_eq!(
        config_paths::config_file().unwrap(),
        dir.path().join("config.yaml")
    );

    let logs = config_paths::ensure_logs_dir().unwrap();
    assert_eq!(logs, dir.path().join("logs"));
    assert!(logs.is_dir());
}

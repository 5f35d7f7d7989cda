use license_calc::config::Config;
use license_calc::models::IdentityStrategy;
use std::env;
use std::fs;
use tempfile::tempdir;

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        // Logging defaults
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.logging.output, "console");

        // Processing defaults
        assert_eq!(config.processing.application_id, "374");
        assert_eq!(config.processing.worker_count, 4);
        assert_eq!(config.processing.partition_count, 4);
        assert_eq!(config.processing.queue_capacity, 4);

        // Dedup and output defaults
        assert_eq!(config.dedup.identity, IdentityStrategy::Composite);
        assert!(!config.output.json_pretty);
    }

    #[test]
    fn test_env_variable_override() {
        env::set_var("LICENSE_CALC_APP_ID", "101");
        env::set_var("LICENSE_CALC_WORKERS", "8");
        env::set_var("LICENSE_CALC_DEDUP_IDENTITY", "device");
        env::set_var("LOG_FORMAT", "json");

        let mut config = Config::default();
        config
            .apply_env_overrides()
            .expect("Failed to apply env overrides");

        assert_eq!(config.processing.application_id, "101");
        assert_eq!(config.processing.worker_count, 8);
        assert_eq!(config.dedup.identity, IdentityStrategy::Device);
        assert_eq!(config.logging.format, "json");

        env::set_var("LICENSE_CALC_WORKERS", "many");
        assert!(Config::default().apply_env_overrides().is_err());

        // Cleanup
        env::remove_var("LICENSE_CALC_APP_ID");
        env::remove_var("LICENSE_CALC_WORKERS");
        env::remove_var("LICENSE_CALC_DEDUP_IDENTITY");
        env::remove_var("LOG_FORMAT");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.processing.worker_count = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.processing.partition_count = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.processing.application_id = String::new();
        assert!(config.validate().is_err());

        config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_loading() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test-config.toml");

        let test_config = r#"
[logging]
level = "debug"
format = "json"
output = "file"

[processing]
application_id = "555"
worker_count = 2
partition_count = 16
queue_capacity = 8

[dedup]
identity = "device"

[output]
json_pretty = true

[paths]
log_directory = "/custom/logs"
        "#;

        fs::write(&config_path, test_config).expect("Failed to write test config");

        let config = Config::load_from_file(&config_path).expect("Failed to load config");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.output, "file");
        assert_eq!(config.processing.application_id, "555");
        assert_eq!(config.processing.partition_count, 16);
        assert_eq!(config.dedup.identity, IdentityStrategy::Device);
        assert!(config.output.json_pretty);
        assert_eq!(config.paths.log_directory.to_str(), Some("/custom/logs"));
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[dedup]\nidentity = \"user\"\n").unwrap();

        let err = Config::load_from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_save_round_trip() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("saved.toml");

        let mut config = Config::default();
        config.processing.worker_count = 6;
        config.dedup.identity = IdentityStrategy::Device;
        config.save_to_file(&config_path).expect("Failed to save config");

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[processing]"));
        assert!(content.contains("[dedup]"));

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.processing.worker_count, 6);
        assert_eq!(loaded.dedup.identity, IdentityStrategy::Device);
    }
}

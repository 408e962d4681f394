use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Loading
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_defaults_apply() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.api.base_url.as_str(), eq(crate::DEFAULT_BASE_URL));
    assert_that!(config.api.timeout_secs, eq(crate::DEFAULT_TIMEOUT_SECS));
    assert_that!(config.session.refresh_buffer_secs, eq(300));
    assert_that!(config.save_queue.max_retries, eq(3));
    assert_that!(config.save_queue.initial_delay_ms, eq(2000));
    assert!(config.logging.file.is_none());
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_missing_config_dir_when_load_then_dir_is_created() {
    // Given
    let (temp, _base) = setup_config_dir();
    let nested = temp.path().join("nested").join("story");
    let _guard = EnvGuard::set(crate::CONFIG_DIR_ENV, nested.to_str().unwrap());

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    assert!(nested.is_dir());
}

#[test]
#[serial]
fn given_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
            [api]
            base_url = "https://gateway.example.com"
            timeout_secs = 15

            [save_queue]
            max_retries = 5

            [logging]
            level = "debug"
            file = "story.log"
        "#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(
        config.api.base_url.as_str(),
        eq("https://gateway.example.com")
    );
    assert_that!(config.api.timeout_secs, eq(15));
    assert_that!(config.save_queue.max_retries, eq(5));
    assert_that!(config.save_queue.initial_delay_ms, eq(2000));
    assert_that!(*config.logging.level, eq(log::LevelFilter::Debug));
    assert_eq!(config.logging.file.as_deref(), Some("story.log"));
}

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(temp.path().join("config.toml"), "[api\nbase_url = ").unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_wins() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        "[api]\nbase_url = \"https://from-toml.example.com\"",
    )
    .unwrap();
    let _url = EnvGuard::set("STORY_API_BASE_URL", "https://from-env.example.com");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(
        config.api.base_url.as_str(),
        eq("https://from-env.example.com")
    );
}

#[test]
#[serial]
fn given_multiple_env_overrides_when_load_then_all_apply() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _platform = EnvGuard::set("STORY_CLIENT_PLATFORM", "ios");
    let _version = EnvGuard::set("STORY_CLIENT_VERSION", "2.4.1");
    let _buffer = EnvGuard::set("STORY_SESSION_REFRESH_BUFFER_SECS", "120");
    let _colored = EnvGuard::set("STORY_LOG_COLORED", "false");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.client.platform.as_str(), eq("ios"));
    assert_that!(config.client.version.as_str(), eq("2.4.1"));
    assert_that!(config.session.refresh_buffer_secs, eq(120));
    assert_that!(config.logging.colored, eq(false));
}

#[test]
#[serial]
fn given_unparseable_numeric_env_when_load_then_keeps_default() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _timeout = EnvGuard::set("STORY_API_TIMEOUT_SECS", "soon");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.api.timeout_secs, eq(crate::DEFAULT_TIMEOUT_SECS));
}

// =========================================================================
// Derived paths
// =========================================================================

#[test]
#[serial]
fn given_default_config_when_storage_path_then_inside_config_dir() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let config = Config::load().unwrap();

    // When
    let path = config.storage_path().unwrap();

    // Then
    assert_eq!(path, temp.path().join("data"));
}

#[test]
#[serial]
fn given_log_file_when_log_file_path_then_joins_log_dir() {
    // Given
    let (temp, _guard) = setup_config_dir();
    let _file = EnvGuard::set("STORY_LOG_FILE", "client.log");
    let config = Config::load().unwrap();

    // When
    let path = config.log_file_path().unwrap();

    // Then
    assert_eq!(path, Some(temp.path().join("log").join("client.log")));
}

#[test]
#[serial]
fn given_no_env_override_when_config_dir_then_defaults_to_cwd_dot_story() {
    // Given
    let _guard = EnvGuard::remove(crate::CONFIG_DIR_ENV);

    // When
    let dir = Config::config_dir().unwrap();

    // Then
    assert!(dir.ends_with(crate::DEFAULT_CONFIG_DIR_NAME));
}

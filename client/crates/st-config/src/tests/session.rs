use crate::{Config, SessionConfig};
use crate::tests::{EnvGuard, setup_config_dir};

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};
use serial_test::serial;

#[test]
fn given_default_session_config_when_refresh_buffer_then_five_minutes() {
    // Given
    let config = SessionConfig::default();

    // When
    let buffer = config.refresh_buffer();

    // Then
    assert_that!(buffer, eq(Duration::from_secs(300)));
}

#[test]
#[serial]
fn given_refresh_buffer_over_max_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _buffer = EnvGuard::set("STORY_SESSION_REFRESH_BUFFER_SECS", "3601");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_zero_refresh_buffer_when_validate_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _buffer = EnvGuard::set("STORY_SESSION_REFRESH_BUFFER_SECS", "0");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, ok(anything()));
}

use crate::LogLevel;

use googletest::assert_that;
use googletest::prelude::{anything, eq, err};
use log::LevelFilter;

#[test]
fn given_known_names_when_parse_then_maps_to_filter() {
    assert_that!("debug".parse::<LogLevel>().unwrap(), eq(LogLevel(LevelFilter::Debug)));
    assert_that!("WARN".parse::<LogLevel>().unwrap(), eq(LogLevel(LevelFilter::Warn)));
    assert_that!(" off ".parse::<LogLevel>().unwrap(), eq(LogLevel(LevelFilter::Off)));
}

#[test]
fn given_unknown_name_when_parse_then_error() {
    assert_that!("loud".parse::<LogLevel>(), err(anything()));
}

#[test]
fn given_unknown_name_in_toml_when_deserialize_then_defaults_to_info() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        level: LogLevel,
    }

    let wrapper: Wrapper = toml::from_str("level = \"chatty\"").unwrap();

    assert_that!(wrapper.level, eq(LogLevel(LevelFilter::Info)));
}

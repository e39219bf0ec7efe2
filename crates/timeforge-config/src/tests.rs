//! Tests for solution configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "fast_assert"

        [matching]
        mode = "eval_times"
        check_bases = true

        [monitors]
        attach_check = false
    "#;

    let config = SolutionConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FastAssert);
    assert_eq!(config.matching.mode, MatchingMode::EvalTimes);
    assert!(config.matching.check_bases);
    assert!(!config.monitors.attach_check);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: full_assert
        matching:
          mode: disabled
    "#;

    let config = SolutionConfig::from_yaml_str(yaml).unwrap();
    assert!(config.full_assert());
    assert_eq!(config.matching.mode, MatchingMode::Disabled);
    assert!(config.monitors.attach_check);
}

#[test]
fn test_defaults() {
    let config = SolutionConfig::from_toml_str("").unwrap();
    assert_eq!(config, SolutionConfig::default());
    assert_eq!(config.environment_mode, EnvironmentMode::Production);
    assert_eq!(config.matching.mode, MatchingMode::Solve);
    assert!(config.monitors.attach_check);
}

#[test]
fn test_builder() {
    let config = SolutionConfig::new()
        .with_environment_mode(EnvironmentMode::FullAssert)
        .with_matching_mode(MatchingMode::EvalResources)
        .with_attach_check(false);

    assert!(config.full_assert());
    assert_eq!(config.matching.mode, MatchingMode::EvalResources);
    assert!(!config.monitors.attach_check);
}

#[test]
fn test_root_bases() {
    assert!(MatchingMode::Solve.needs_root_bases());
    assert!(MatchingMode::EvalTimes.needs_root_bases());
    assert!(!MatchingMode::EvalResources.needs_root_bases());
    assert!(!MatchingMode::Disabled.is_enabled());
}

#[test]
fn test_invalid_combination() {
    let toml = r#"
        [matching]
        mode = "eval_resources"
        check_bases = true
    "#;
    assert!(matches!(
        SolutionConfig::from_toml_str(toml),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_unknown_mode_is_parse_error() {
    assert!(matches!(
        SolutionConfig::from_toml_str("environment_mode = \"reproducible\""),
        Err(ConfigError::Toml(_))
    ));
}

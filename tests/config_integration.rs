//! Configuration loading from YAML, environment and CLI

mod common;

use clap::Parser;
use common::temp_config_file;
use pinforge::cli::Cli;
use pinforge::config::Config;
use serial_test::serial;

const SAMPLE: &str = r#"
provider:
  text_model: gemini-test
  concept_count: 5
pinterest:
  api_base: http://127.0.0.1:9999/v5
publish:
  fallback_delay_ms: 250
generator:
  default_board: Desk Ideas
"#;

fn cli() -> Cli {
    Cli::try_parse_from(["pinforge", "list"]).unwrap()
}

fn clear_env() {
    for var in [
        "PINFORGE_API_KEY",
        "VITE_API_KEY",
        "PINFORGE_FALLBACK_DELAY_MS",
        "PINFORGE_STORAGE_PATH",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_yaml_values_merge_with_defaults() {
    clear_env();
    let (_dir, path) = temp_config_file(SAMPLE);
    let config = Config::load(path.to_str().unwrap(), &cli()).unwrap();

    assert_eq!(config.provider.text_model, "gemini-test");
    assert_eq!(config.provider.image_model, "gemini-2.5-flash-image");
    assert_eq!(config.provider.concept_count, 5);
    assert_eq!(config.publish.fallback_delay_ms, 250);
    assert_eq!(config.publish.open_builder_delay_ms, 1000);
    assert_eq!(config.generator.default_board, "Desk Ideas");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    std::env::set_var("VITE_API_KEY", "from-vite");
    std::env::set_var("PINFORGE_FALLBACK_DELAY_MS", "10");
    let (_dir, path) = temp_config_file(SAMPLE);
    let config = Config::load(path.to_str().unwrap(), &cli()).unwrap();
    clear_env();

    assert_eq!(config.provider.api_key.as_deref(), Some("from-vite"));
    assert_eq!(config.publish.fallback_delay_ms, 10);
}

#[test]
#[serial]
fn test_invalid_delay_is_ignored() {
    clear_env();
    std::env::set_var("PINFORGE_FALLBACK_DELAY_MS", "soon");
    let (_dir, path) = temp_config_file(SAMPLE);
    let config = Config::load(path.to_str().unwrap(), &cli()).unwrap();
    clear_env();

    assert_eq!(config.publish.fallback_delay_ms, 250);
}

#[test]
#[serial]
fn test_invalid_yaml_is_an_error() {
    clear_env();
    let (_dir, path) = temp_config_file("provider: [unclosed");
    assert!(Config::load(path.to_str().unwrap(), &cli()).is_err());
}

use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["sourceDirs"], serde_json::json!(["src"]));
    assert_eq!(parsed["excludedDirs"], serde_json::json!(["**/node_modules"]));
    assert_eq!(parsed["emitProgressMessages"], Value::Bool(true));
    assert!(
        parsed["parserOptions"].get("eventPrefix").is_some(),
        "Config should have 'parserOptions.eventPrefix' field"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    insta::assert_snapshot!(stdout(&output).trim_end(), @"✓ Created .telexrc.json");
    assert!(test.root().join(".telexrc.json").exists());

    let content = test.read_file(".telexrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".telexrc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains(".telexrc.json already exists"));
    assert_eq!(test.read_file(".telexrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("extract-extensions"));

    Ok(())
}

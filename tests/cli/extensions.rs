use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

const OUTPUT: &str = "declarations-extensions-resolved.json";

const GIT: &str = r#"
/* __GDPR__
   "clone": { "owner": "git", "url": { "classification": "SystemMetaData", "purpose": "FeatureInsight" } }
*/
// __GDPR__COMMON__ "os": { "classification": "SystemMetaData", "purpose": "FeatureInsight" }
type PushClassification = { owner: 'git'; comment: 'Typed push' };
export function push(telemetry: any) {
    telemetry.publicLog2<{}, PushClassification>('push', {});
}
"#;

const DEBUG: &str = r#"
/* __GDPR__
   "launch": { "owner": "debug" }
*/
// __GDPR__COMMON__ "os": { "classification": "SystemMetaData", "purpose": "PerformanceAndHealth" }
export {};
"#;

const TWO_SOURCES: &str = r#"{
    "sources": [
        { "sourceDirs": ["extensions/git"], "parserOptions": { "eventPrefix": "git/" } },
        { "sourceDirs": ["extensions/debug"], "parserOptions": { "eventPrefix": "debug/" } }
    ]
}"#;

fn two_extensions() -> Result<CliTest> {
    let test = CliTest::with_file("extensions/git/src/git.ts", GIT)?;
    test.write_file("extensions/debug/src/debug.ts", DEBUG)?;
    Ok(test)
}

#[test]
fn test_extensions_merge_in_source_order() -> Result<()> {
    let test = two_extensions()?;
    test.write_file(".telexrc.json", TWO_SOURCES)?;

    let output = test.extract_extensions_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_json(OUTPUT)?,
        json!({
            "events": {
                "git/clone": {
                    "owner": "git",
                    "url": { "classification": "SystemMetaData", "purpose": "FeatureInsight" }
                },
                "debug/launch": { "owner": "debug" },
                "git/push": { "owner": "git", "comment": "Typed push" }
            },
            "commonProperties": [
                { "name": "os", "classification": "SystemMetaData", "purpose": "FeatureInsight" },
                { "name": "os", "classification": "SystemMetaData", "purpose": "PerformanceAndHealth" }
            ]
        })
    );

    Ok(())
}

#[test]
fn test_extensions_config_flag_and_output_dir() -> Result<()> {
    let test = two_extensions()?;
    test.write_file("config/sources.json", TWO_SOURCES)?;

    let output = test
        .extract_extensions_command()
        .args(["--config", "config/sources.json", "--output-dir", "out", "-q"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("out").join(OUTPUT).exists());
    assert_eq!(stdout(&output), "");

    Ok(())
}

#[test]
fn test_extensions_debug_workaround_injects_prefixed_events() -> Result<()> {
    let test = two_extensions()?;
    test.write_file("debug-events.json", r#"{ "session": { "owner": "debug" } }"#)?;
    test.write_file(
        ".telexrc.json",
        r#"{
    "debugEventsFile": "debug-events.json",
    "sources": [
        {
            "sourceDirs": ["extensions/debug"],
            "parserOptions": { "eventPrefix": "debug/", "addDebugEventsWorkaround": true }
        }
    ]
}"#,
    )?;

    let output = test.extract_extensions_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let events = &test.read_json(OUTPUT)?["events"];
    assert_eq!(events["debug/session"], json!({ "owner": "debug" }));
    assert_eq!(events["debug/launch"], json!({ "owner": "debug" }));

    Ok(())
}

#[test]
fn test_extensions_without_sources_fails() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.extract_extensions_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("No sources configured"));
    assert!(!test.root().join(OUTPUT).exists());

    Ok(())
}

#[test]
fn test_extensions_one_bad_source_aborts_everything() -> Result<()> {
    let test = two_extensions()?;
    test.write_file(
        ".telexrc.json",
        r#"{
    "sources": [
        { "sourceDirs": ["extensions/git"] },
        { "sourceDirs": ["extensions/missing"] }
    ]
}"#,
    )?;

    let output = test.extract_extensions_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("source directory does not exist"));
    assert!(!test.root().join(OUTPUT).exists());

    Ok(())
}

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

const OUTPUT: &str = "declarations-resolved.json";

const EDITOR: &str = r#"
/* __GDPR__FRAGMENT__
   "EditorInfo": {
      "languageId": { "classification": "SystemMetaData", "purpose": "FeatureInsight", "endPoint": "none" },
   }
*/
/* __GDPR__
   "editorOpened": {
      "owner": "alice",
      "${include}": ["${EditorInfo}"],
      "${common}": ["${common.os}"],
      "lineCount": { "classification": "SystemMetaData", "purpose": "FeatureInsight", "isMeasurement": true }
   }
*/
// __GDPR__COMMON__ "common.os": { "classification": "SystemMetaData", "purpose": "FeatureInsight" }
export function open() {}
"#;

#[test]
fn test_extract_writes_resolved_document() -> Result<()> {
    let test = CliTest::with_file("src/editor.ts", EDITOR)?;

    let output = test.extract_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(OUTPUT));
    assert_eq!(
        test.read_json(OUTPUT)?,
        json!({
            "events": {
                "editorOpened": {
                    "owner": "alice",
                    "languageId": { "classification": "SystemMetaData", "purpose": "FeatureInsight" },
                    "lineCount": { "classification": "SystemMetaData", "purpose": "FeatureInsight" }
                }
            },
            "commonProperties": [
                { "name": "common.os", "classification": "SystemMetaData", "purpose": "FeatureInsight" }
            ]
        })
    );

    Ok(())
}

#[test]
fn test_extract_uses_four_space_indent() -> Result<()> {
    let test = CliTest::with_file("src/editor.ts", EDITOR)?;

    let output = test.extract_command().output()?;

    assert!(output.status.success());
    let content = test.read_file(OUTPUT)?;
    assert!(content.starts_with("{\n    \"events\": {\n        \"editorOpened\""));
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_extract_flags_keep_measurement_and_endpoints() -> Result<()> {
    let test = CliTest::with_file("src/editor.ts", EDITOR)?;

    let output = test
        .extract_command()
        .args(["--include-is-measurement", "--apply-endpoints"])
        .output()?;

    assert!(output.status.success());
    let document = test.read_json(OUTPUT)?;
    let event = &document["events"]["editorOpened"];
    assert_eq!(event["lineCount"]["isMeasurement"], json!(true));
    assert_eq!(event["lineCount"]["endPoint"], json!("none"));
    assert_eq!(event["languageId"]["endPoint"], json!("none"));

    Ok(())
}

#[test]
fn test_extract_typed_event_overrides_annotation() -> Result<()> {
    let test = CliTest::with_file("src/editor.ts", EDITOR)?;
    test.write_file(
        "src/typed.ts",
        r#"
type EditorOpenedClassification = {
    owner: 'bob';
    comment: 'Typed declaration';
};
export function log(telemetry: any) {
    telemetry.publicLog2<{}, EditorOpenedClassification>('editorOpened', {});
}
"#,
    )?;

    let output = test.extract_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_json(OUTPUT)?["events"],
        json!({ "editorOpened": { "owner": "bob", "comment": "Typed declaration" } })
    );

    Ok(())
}

#[test]
fn test_extract_cli_source_dir_and_output_dir() -> Result<()> {
    let test = CliTest::with_file("lib/editor.ts", EDITOR)?;

    let output = test
        .extract_command()
        .args(["--source-dir", "lib", "--output-dir", "out", "--quiet"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("out").join(OUTPUT).exists());
    assert!(!stderr(&output).contains("...extracting"));
    assert_eq!(stdout(&output), "");

    Ok(())
}

#[test]
fn test_extract_reads_config_file() -> Result<()> {
    let test = CliTest::with_file("app/editor.ts", EDITOR)?;
    test.write_file(
        ".telexrc.json",
        r#"{ "sourceDirs": ["app"], "outputDir": "build", "emitProgressMessages": false }"#,
    )?;

    let output = test.extract_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("build").join(OUTPUT).exists());

    Ok(())
}

#[test]
fn test_extract_excluded_dir_is_skipped() -> Result<()> {
    let test = CliTest::with_file("src/editor.ts", EDITOR)?;
    test.write_file("src/node_modules/pkg/broken.ts", "export const = ;")?;

    let output = test.extract_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));

    Ok(())
}

#[test]
fn test_extract_unknown_fragment_fails_without_output() -> Result<()> {
    let test = CliTest::with_file(
        "src/broken.ts",
        r#"
/* __GDPR__
   "broken": { "${include}": ["${Missing}"] }
*/
export {};
"#,
    )?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error: event 'broken' includes unknown fragment 'Missing'"));
    assert!(!test.root().join(OUTPUT).exists());

    Ok(())
}

#[test]
fn test_extract_parse_error_fails_without_output() -> Result<()> {
    let test = CliTest::with_file("src/bad.ts", "export const = ;")?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("failed to scan"));
    assert!(!test.root().join(OUTPUT).exists());

    Ok(())
}

#[test]
fn test_extract_website_workaround_requires_events_file() -> Result<()> {
    let test = CliTest::with_file("src/editor.ts", EDITOR)?;

    let output = test
        .extract_command()
        .arg("--add-website-events-workaround")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("websiteEventsFile"));
    assert!(!test.root().join(OUTPUT).exists());

    Ok(())
}

#[test]
fn test_extract_website_workaround_injects_events() -> Result<()> {
    let test = CliTest::with_file("src/editor.ts", EDITOR)?;
    test.write_file(
        "website-events.json",
        r#"{ "pageView": { "owner": "web", "path": { "classification": "SystemMetaData" } } }"#,
    )?;
    test.write_file(
        ".telexrc.json",
        r#"{ "websiteEventsFile": "website-events.json" }"#,
    )?;

    let output = test
        .extract_command()
        .arg("--add-website-events-workaround")
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let document = test.read_json(OUTPUT)?;
    assert_eq!(
        document["events"]["pageView"],
        json!({ "owner": "web", "path": { "classification": "SystemMetaData" } })
    );

    Ok(())
}

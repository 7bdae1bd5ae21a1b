use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::file_scanner::is_glob_pattern;

pub const CONFIG_FILE_NAME: &str = ".telexrc.json";

/// Options handed to the parsers and the merger for one source.
///
/// `include_is_measurement` and `apply_endpoints` are interpreted by the
/// annotation and typed parsers only; the scanner passes them through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserOptions {
    pub include_is_measurement: bool,
    pub apply_endpoints: bool,
    pub add_website_events_workaround: bool,
    pub add_debug_events_workaround: bool,
    /// Prepended verbatim to event names and typed-shape keys (multi-source mode).
    pub event_prefix: String,
}

impl ParserOptions {
    pub fn flags(&self) -> ParserFlags {
        ParserFlags {
            include_is_measurement: self.include_is_measurement,
            apply_endpoints: self.apply_endpoints,
        }
    }
}

/// The two options that change what the parsers yield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserFlags {
    pub include_is_measurement: bool,
    pub apply_endpoints: bool,
}

/// One independent codebase in a multi-source run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    pub source_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub excluded_dirs: Vec<String>,
    #[serde(default)]
    pub parser_options: ParserOptions,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_dirs")]
    pub source_dirs: Vec<PathBuf>,
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_emit_progress_messages")]
    pub emit_progress_messages: bool,
    #[serde(default)]
    pub parser_options: ParserOptions,
    /// Source specifications for `extract-extensions`.
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
    /// JSON file of events injected by the website workaround.
    #[serde(default)]
    pub website_events_file: Option<PathBuf>,
    /// JSON file of events injected by the debug workaround.
    #[serde(default)]
    pub debug_events_file: Option<PathBuf>,
}

fn default_source_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("src")]
}

fn default_excluded_dirs() -> Vec<String> {
    vec!["**/node_modules".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_emit_progress_messages() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dirs: default_source_dirs(),
            excluded_dirs: default_excluded_dirs(),
            output_dir: default_output_dir(),
            emit_progress_messages: default_emit_progress_messages(),
            parser_options: ParserOptions::default(),
            sources: Vec::new(),
            website_events_file: None,
            debug_events_file: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `excludedDirs`, top-level or
    /// inside `sources`, is invalid.
    pub fn validate(&self) -> Result<()> {
        validate_exclusions(&self.excluded_dirs, "excludedDirs")?;
        for (index, spec) in self.sources.iter().enumerate() {
            validate_exclusions(
                &spec.excluded_dirs,
                &format!("sources[{}].excludedDirs", index),
            )?;
        }
        Ok(())
    }
}

fn validate_exclusions(patterns: &[String], field: &str) -> Result<()> {
    // Patterns without wildcards are literal paths and never fail.
    for pattern in patterns.iter().filter(|p| is_glob_pattern(p)) {
        Pattern::new(pattern)
            .with_context(|| format!("Invalid glob pattern in '{}': \"{}\"", field, pattern))?;
    }
    Ok(())
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let config = load_config_file(&path)?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

/// Load and validate a specific config file.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    config.validate()?;
    Ok(config)
}

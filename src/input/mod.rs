//! Reading scenario and hook request files for the command line.
//!
//! Lives in the binary so the library never touches the filesystem.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use aiie::hooks::HookRequest;
use aiie::scenario::ScenarioInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// `.json` is JSON; everything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }
}

/// Parse `content` in the given format
pub fn parse<T: DeserializeOwned>(content: &str, format: InputFormat) -> Result<T> {
    match format {
        InputFormat::Json => serde_json::from_str(content).context("Failed to parse JSON"),
        InputFormat::Yaml => serde_saphyr::from_str(content).context("Failed to parse YAML"),
    }
}

fn load<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    if !path.exists() {
        anyhow::bail!("{} file not found at {}", what, path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file at {}", what, path.display()))?;

    parse(&content, InputFormat::from_path(path))
        .with_context(|| format!("Failed to parse {} in {}", what, path.display()))
}

/// Load a scenario payload from a JSON or YAML file
pub fn load_scenario(path: &Path) -> Result<ScenarioInput> {
    load(path, "scenario")
}

/// Load a CDS Hooks request from a JSON or YAML file
pub fn load_hook_request(path: &Path) -> Result<HookRequest> {
    load(path, "hook request")
}

//! launch.json reading and writing
//!
//! Existing configurations are kept as raw JSON objects so entries this tool
//! does not own round-trip untouched, key order included. Only the entries it
//! generates go through the typed [`LaunchConfiguration`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Schema version written into a fresh launch.json
pub const LAUNCH_SCHEMA_VERSION: &str = "0.2.0";

fn default_version() -> String {
    LAUNCH_SCHEMA_VERSION.to_string()
}

/// The launch.json file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchFile {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub configurations: Vec<Value>,

    /// Other top-level keys such as `compounds`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for LaunchFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            configurations: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl LaunchFile {
    /// Read launch.json from a file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read: {}", path.as_ref().display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse: {}", path.as_ref().display()))
    }

    /// Parse launch.json content
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid launch.json")
    }

    /// Serialize with two-space indentation
    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// An entry of `configurations` for the `cppdbg` debugger type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfiguration {
    pub name: String,

    #[serde(rename = "type")]
    pub debugger_type: String,

    pub request: String,

    pub program: String,

    pub args: Vec<String>,

    pub stop_at_entry: bool,

    /// Working directory of the debuggee
    pub cwd: String,

    pub environment: Vec<EnvironmentVariable>,

    pub external_console: bool,

    #[serde(rename = "MIMode")]
    pub mi_mode: String,

    pub setup_commands: Vec<SetupCommand>,

    pub pre_launch_task: String,
}

impl LaunchConfiguration {
    /// Convert to the raw JSON form stored in [`LaunchFile::configurations`]
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).context("Failed to serialize launch configuration")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

/// A command sent to the debugger before the program starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupCommand {
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_failures: Option<bool>,
}

impl SetupCommand {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            description: None,
            ignore_failures: None,
        }
    }
}

/// The `program` field of a raw configuration, if it is a string
pub fn program_of(config: &Value) -> Option<&str> {
    config.get("program").and_then(|v| v.as_str())
}

/// The `name` field of a raw configuration, if it is a string
pub fn name_of(config: &Value) -> Option<&str> {
    config.get("name").and_then(|v| v.as_str())
}

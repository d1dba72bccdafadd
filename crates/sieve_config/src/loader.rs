//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, KNOWN_TOOLS};
use std::path::Path;

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "sieve.toml";

/// Loads and validates `sieve.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Loads `sieve.toml` if it exists, falling back to the default configuration.
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_config_or_default(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    match load_config(project_dir) {
        Err(ConfigError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(ProjectConfig::default())
        }
        other => other,
    }
}

/// Parses and validates a `sieve.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks tool names against the built-in set and rejects empty programs.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    let listed = config.lint.tools.iter().flatten();
    for name in listed.chain(config.tools.keys()) {
        if !KNOWN_TOOLS.contains(&name.as_str()) {
            return Err(ConfigError::UnknownTool(name.clone()));
        }
    }
    for (name, tool) in &config.tools {
        if tool.program.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "tools.{name}.program must not be empty"
            )));
        }
    }
    Ok(())
}

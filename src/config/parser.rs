use crate::config::types::{RunConfig, RunInput, Settings};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully parsed settings, not yet validated
/// * `Err(ConfigError)` - Failed to load or parse the settings
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use gsc_reindex::config::load_settings;
///
/// let settings = load_settings(Path::new("gsc-reindex.toml")).unwrap();
/// println!("Batch size: {}", settings.batch.size);
/// ```
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

/// Loads settings from `path` when given, otherwise returns the defaults
pub fn load_settings_or_default(path: Option<&Path>) -> Result<Settings, ConfigError> {
    match path {
        Some(path) => load_settings(path),
        None => Ok(Settings::default()),
    }
}

/// Builds the run configuration from the positional argument
///
/// # Arguments
///
/// * `input` - Domain, site URL, or CSV path; `None` when absent
/// * `credentials` - Path to the service account key
/// * `settings` - Loaded settings with command-line overrides applied
///
/// # Returns
///
/// * `Ok(RunConfig)` - Configuration ready to hand to the engine
/// * `Err(ConfigError::MissingInput)` - No usable positional argument
/// * `Err(ConfigError::Validation)` - The final settings are out of range
pub fn build_run_config(
    input: Option<&str>,
    credentials: PathBuf,
    settings: Settings,
) -> Result<RunConfig, ConfigError> {
    let input = input
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .ok_or(ConfigError::MissingInput)?;

    validate(&settings)?;

    Ok(RunConfig {
        input: RunInput::from_arg(input),
        credentials,
        settings,
    })
}

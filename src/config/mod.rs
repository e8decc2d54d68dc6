pub mod builder;
pub mod defaults;
pub mod filter;
pub mod merge;
pub mod types;


pub use builder::ConfigBuilder;
pub use filter::ObjectFilter;
pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Main configuration loading function.
///
/// Returns the parsed file (or defaults when it doesn't exist) and the
/// directory relative paths in it resolve against.
pub fn load_config(config_file: &str) -> Result<(ConfigInput, PathBuf)> {
    let config_dir = Path::new(config_file)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let config_input = if Path::new(config_file).exists() {
        let contents = std::fs::read_to_string(config_file)
            .with_context(|| format!("Failed to read config file: {config_file}"))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {config_file}"))?
    } else {
        ConfigInput::default()
    };

    Ok((config_input, config_dir))
}

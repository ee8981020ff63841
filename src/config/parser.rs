use crate::config::types::FileConfig;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The file only supplies defaults; the result still has to go through
/// [`crate::config::validate`] once merged with the command line.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use maxtract::config::load_config;
///
/// let file = load_config(Path::new("maxtract.toml")).unwrap();
/// println!("Max depth: {:?}", file.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

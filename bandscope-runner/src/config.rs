//! Config file discovery.
//!
//! An explicit path must exist. Without one, the per-user config file is
//! used when present and the built-in defaults otherwise.

use bandscope_core::{AppConfig, ConfigError};
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_NAME: &str = "bandscope";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Where the active config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    UserFile(PathBuf),
    BuiltIn,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::UserFile(path) => {
                write!(f, "{}", path.display())
            }
            ConfigSource::BuiltIn => f.write_str("built-in defaults"),
        }
    }
}

/// `<base>/bandscope/config.toml`.
pub fn config_path_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Resolve the active config.
///
/// `user_file` is the per-user location (usually from [`config_path_in`]);
/// it is only read when it exists.
pub fn load_config(
    explicit: Option<&Path>,
    user_file: Option<&Path>,
) -> Result<(AppConfig, ConfigSource), ConfigError> {
    if let Some(path) = explicit {
        let config = AppConfig::from_file(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }
    if let Some(path) = user_file.filter(|p| p.is_file()) {
        let config = AppConfig::from_file(path)?;
        return Ok((config, ConfigSource::UserFile(path.to_path_buf())));
    }
    Ok((AppConfig::default(), ConfigSource::BuiltIn))
}

/// Write the default config to `path`, creating parent directories.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let io_err = |source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let text = AppConfig::default().to_toml()?;
    std::fs::write(path, text).map_err(io_err)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}

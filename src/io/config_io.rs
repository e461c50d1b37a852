use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("invalid config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Pick the data directory: explicit flag, then `$XDG_DATA_HOME/tally`, then
/// `$HOME/.local/share/tally`, then `./.tally`.
pub fn resolve_data_dir(flag: Option<&Path>) -> PathBuf {
    resolve_from(
        flag,
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve_from(flag: Option<&Path>, xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    match (xdg, home) {
        (Some(xdg), _) if !xdg.as_os_str().is_empty() => xdg.join("tally"),
        (_, Some(home)) if !home.as_os_str().is_empty() => {
            home.join(".local").join("share").join("tally")
        }
        _ => PathBuf::from(".tally"),
    }
}

/// Read `config.toml` from the data directory. A missing file yields the
/// defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = data_dir.join("config.toml");
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

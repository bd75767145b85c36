use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Build descriptor, relative to the project directory.
pub const DESCRIPTOR_PATH: &str = "pom.xml";
/// Where the downloaded artifact is written, relative to the project directory.
pub const DESTINATION_PATH: &str = "config/plugin.jar";
/// File name appended to `{base_url}/{version}/`.
pub const ARTIFACT_NAME: &str = "plugin.jar";
pub const VERSION_QUERY: &str = "/project/version";
pub const BASE_URL_QUERY: &str = "/project/properties/boundary-jar-base-url";

/// Transfer tuning loaded from `~/.config/jarfetch/config.toml`.
///
/// None of these settings affect which URL is fetched or where the artifact
/// lands; those come from the descriptor and the constants above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Size in bytes of each chunk read from the connection.
    pub buffer_size: usize,
    /// Maximum number of redirects followed before giving up.
    pub max_redirections: u32,
    /// Accept plain `http` download URLs (local mirrors, tests).
    pub allow_insecure_http: bool,
    /// `User-Agent` header; defaults to `jarfetch/<version>`.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1024,
            max_redirections: 20,
            allow_insecure_http: false,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("jarfetch/{}", env!("CARGO_PKG_VERSION")))
    }
}

/// Location of the per-user settings file, if one exists.
pub fn config_path() -> Option<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("jarfetch").ok()?;
    xdg_dirs.find_config_file("config.toml")
}

/// Load settings from an explicit file. A missing file is an error here.
pub fn load_from(path: &Path) -> Result<FetchConfig> {
    let data = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::SettingsNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;
    let cfg: FetchConfig = toml::from_str(&data).map_err(|e| Error::Settings {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if cfg.buffer_size == 0 {
        return Err(Error::Settings {
            path: path.to_path_buf(),
            message: "buffer_size must be greater than zero".into(),
        });
    }
    Ok(cfg)
}

/// Load `explicit` if given, else the XDG settings file if present, else defaults.
/// Never creates a settings file.
pub fn load(explicit: Option<&Path>) -> Result<FetchConfig> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    match config_path() {
        Some(path) => {
            tracing::debug!("loading settings from {}", path.display());
            load_from(&path)
        }
        None => Ok(FetchConfig::default()),
    }
}

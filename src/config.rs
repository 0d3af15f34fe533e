use std::{
    fs::File,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "sshmenu.yaml";

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub command: Option<String>,
}

impl Server {
    /// Row text shown in server menus.
    pub fn display(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub servers: Vec<Server>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global_command: String,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_reader(file).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// All servers whose name or description contains `needle` as a
    /// case-insensitive substring, in project declaration order.
    pub fn filter(&self, needle: &str) -> Vec<Server> {
        let needle = needle.to_lowercase();
        self.projects
            .iter()
            .flat_map(|project| project.servers.iter())
            .filter(|server| {
                server.name.to_lowercase().contains(&needle)
                    || server.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

/// Prefer `~/.config/sshmenu/sshmenu.yaml` when it exists, otherwise fall
/// back to a `sshmenu.yaml` sitting next to the running executable.
pub fn resolve_path() -> std::io::Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        let user_path = home.join(".config").join("sshmenu").join(CONFIG_FILE);
        if user_path.exists() {
            return Ok(user_path);
        }
    }
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(|dir| dir.join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE)))
}

use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::note_list::ListGeometry;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub list: ListConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    pub library_path: String,
    pub start_path: String,
}

#[derive(Debug, Deserialize)]
pub struct ListConfig {
    pub item_height: u16,
    pub grow_threshold: u16,
    pub refresh_interval_secs: u64,
    pub sidebar_width: u16,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        let mut config = Self::defaults()?;

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "notelist") {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                let user_str = fs::read_to_string(&config_path)?;
                config = toml::from_str(&user_str)?;
                tracing::info!("loaded config from {}", config_path.display());
            }
        }

        // Expand ~ in library_path
        if config.general.library_path.starts_with('~') {
            let home = dirs_home().ok_or_else(|| anyhow!("cannot determine home directory"))?;
            config.general.library_path =
                config
                    .general
                    .library_path
                    .replacen('~', &home.to_string_lossy(), 1);
        }

        Ok(config)
    }

    pub fn defaults() -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        Ok(toml::from_str(defaults)?)
    }

    pub fn library_path(&self) -> PathBuf {
        PathBuf::from(&self.general.library_path)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.list.refresh_interval_secs.max(1))
    }

    /// List geometry before the first layout pass supplies the real viewport.
    pub fn list_geometry(&self) -> ListGeometry {
        ListGeometry {
            item_height: usize::from(self.list.item_height.max(1)),
            viewport_height: 0,
            grow_threshold: usize::from(self.list.grow_threshold),
        }
    }
}

fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

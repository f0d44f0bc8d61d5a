use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use tracing::{debug, error, info, trace, warn};

use serde::{Deserialize, Serialize};

use crate::options::Options;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// file extensions treated as images, matched case-insensitively
    pub allowed_extensions: Vec<String>,
    pub marker_radius: u32,
    pub image_scale: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            allowed_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            marker_radius: 20,
            image_scale: 1.0,
        }
    }
}

impl AppSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: AppSettings = toml::from_str(&std::fs::read_to_string(&path)?)?;
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = toml::to_string_pretty(self).context("Failed to serialize AppSettings to TOML")?;
        std::fs::write(path, s)?;
        Ok(())
    }
}

pub fn read_options_from_file<P: AsRef<Path>>(path: P, options: &mut Options) -> Result<()> {
    let appsettings = AppSettings::load_from_file(path)?;

    options.marker_radius = appsettings.marker_radius;
    options.image_scale = appsettings.image_scale;

    Ok(())
}

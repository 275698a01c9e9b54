//! # ps-configs
//!
//! Application settings, layered as: built-in defaults, then an optional
//! `photospot.toml` (or an explicit file), then `PHOTOSPOT__<KEY>`
//! environment variables (a `.env` file is honoured).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// App-private root for mutable documents, images and thumbnails
    pub data_dir: PathBuf,
    /// Read-only documents shipped with the app
    pub assets_dir: PathBuf,
    pub images_dir_name: String,
    pub thumbnails_dir_name: String,
    pub thumbnail_max_dimension: u32,
    /// JPEG quality, 1-100
    pub thumbnail_quality: u8,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            assets_dir: PathBuf::from("./assets"),
            images_dir_name: "images".to_string(),
            thumbnails_dir_name: "thumbnails".to_string(),
            thumbnail_max_dimension: 300,
            thumbnail_quality: 80,
            log_filter: "info".to_string(),
            log_json: false,
        }
    }
}

impl Settings {
    /// Loads `.env`, then `photospot.toml` from the working directory if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(config::File::with_name("photospot").required(false))
    }

    /// Same layering, with an explicit settings file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(config::File::from(path.to_path_buf()))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: Settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("PHOTOSPOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail_max_dimension == 0 {
            return Err(ConfigError::Invalid("thumbnail_max_dimension must be positive".into()));
        }
        if !(1..=100).contains(&self.thumbnail_quality) {
            return Err(ConfigError::Invalid("thumbnail_quality must be between 1 and 100".into()));
        }
        for name in [&self.images_dir_name, &self.thumbnails_dir_name] {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!("{name:?} is not a plain directory name")));
            }
        }
        Ok(())
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join(&self.images_dir_name)
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.data_dir.join(&self.thumbnails_dir_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Loading reads the process environment; tests that load take this lock.
    static ENV: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_match_the_gallery_layout() {
        let settings = Settings::default();
        assert_eq!(settings.images_dir(), PathBuf::from("./data/images"));
        assert_eq!(settings.thumbnails_dir(), PathBuf::from("./data/thumbnails"));
        assert_eq!(settings.thumbnail_max_dimension, 300);
        assert_eq!(settings.thumbnail_quality, 80);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let _env = ENV.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photospot.toml");
        std::fs::write(
            &path,
            "data_dir = \"/var/lib/photospot\"\nthumbnail_max_dimension = 512\nlog_json = true\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/var/lib/photospot"));
        assert_eq!(settings.thumbnail_max_dimension, 512);
        assert!(settings.log_json);
        assert_eq!(settings.thumbnail_quality, 80);
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        let _env = ENV.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photospot.toml");
        std::fs::write(&path, "thumbnail_quality = 0\n").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let _env = ENV.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photospot.toml");
        std::fs::write(&path, "thumbnail_max_dimension = 128\nlog_json = false\nlog_filter = \"debug\"\n").unwrap();

        std::env::set_var("PHOTOSPOT__THUMBNAIL_MAX_DIMENSION", "512");
        std::env::set_var("PHOTOSPOT__LOG_JSON", "true");
        let loaded = Settings::load_from(&path);
        std::env::remove_var("PHOTOSPOT__THUMBNAIL_MAX_DIMENSION");
        std::env::remove_var("PHOTOSPOT__LOG_JSON");

        let settings = loaded.unwrap();
        assert_eq!(settings.thumbnail_max_dimension, 512);
        assert!(settings.log_json);
        // untouched keys keep the file value, or the default
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.thumbnail_quality, 80);
    }
}

use crate::{Error, Result};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Application directories following platform conventions
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/crc-launcher, %APPDATA%\crc-launcher\config)
    pub config: PathBuf,

    /// Cache directory, also holds logs
    pub cache: PathBuf,

    /// Log directory for the stdio handler
    pub logs: PathBuf,

    /// Config file path
    pub config_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with the platform's standard paths.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self> {
        let project = ProjectDirs::from("", "", "crc-launcher").ok_or_else(|| {
            Error::Config("Failed to determine project directories".to_string())
        })?;

        let config = project.config_dir().to_path_buf();
        let cache = project.cache_dir().to_path_buf();

        Ok(Self {
            config_file: config.join("config.json"),
            logs: cache.join("logs"),
            config,
            cache,
        })
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            logs: base.join("logs"),
            config: base.clone(),
            cache: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.cache)?;
        std::fs::create_dir_all(&self.logs)?;
        Ok(())
    }
}

/// Per-user local application data directory (`%LOCALAPPDATA%` on Windows)
#[must_use]
pub(crate) fn local_app_data() -> Option<PathBuf> {
    BaseDirs::new().map(|base| base.data_local_dir().to_path_buf())
}

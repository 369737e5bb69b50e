use crate::profile::{FixedDir, InstallDirLookup, LocalAppDataDir, ProfileDirResolver, RegistrySettings};
use crate::{Error, Launcher, Result, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub profiles: ProfilesConfig,

    #[serde(default)]
    pub launcher: LauncherConfig,

    #[serde(default)]
    pub icons: IconConfig,

    /// Theme reported to the plugin when the host has no theme of its own
    #[serde(default)]
    pub theme: Theme,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Build the profile directory resolver selected by `profiles.source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `path` source is selected without a directory.
    pub fn profile_resolver(&self) -> Result<Box<dyn ProfileDirResolver>> {
        match self.profiles.source {
            ProfileSource::InstallDir => {
                Ok(Box::new(InstallDirLookup::new(RegistrySettings::default())))
            }
            ProfileSource::LocalAppData => Ok(Box::new(LocalAppDataDir::new())),
            ProfileSource::Path => {
                let dir = self.profiles.directory.clone().ok_or_else(|| {
                    Error::Config(
                        "profiles.source is \"path\" but profiles.directory is not set".to_string(),
                    )
                })?;
                Ok(Box::new(FixedDir::new(dir)))
            }
        }
    }

    /// Build the launcher for the configured CRC executable
    #[must_use]
    pub fn launcher(&self) -> Launcher {
        match &self.launcher.executable {
            Some(executable) => Launcher::new(executable.clone()),
            None => Launcher::default(),
        }
    }
}

/// Where profile files are looked up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileSource {
    /// `<install dir>/Profiles`, install dir read from the per-user CRC settings
    #[default]
    InstallDir,
    /// `<local app data>/CRC/Profiles`
    LocalAppData,
    /// `profiles.directory`
    Path,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesConfig {
    #[serde(default)]
    pub source: ProfileSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherConfig {
    /// Path to crc.exe; defaults to `<local app data>/CRC/Application/crc.exe`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<PathBuf>,
}

fn default_light_icon() -> String {
    "Images/crclauncher.light.png".to_string()
}

fn default_dark_icon() -> String {
    "Images/crclauncher.dark.png".to_string()
}

/// Result icons for light and dark host themes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconConfig {
    #[serde(default = "default_light_icon")]
    pub light: String,

    #[serde(default = "default_dark_icon")]
    pub dark: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            light: default_light_icon(),
            dark: default_dark_icon(),
        }
    }
}

impl IconConfig {
    #[must_use]
    pub fn for_theme(&self, theme: Theme) -> &str {
        if theme.is_light() {
            &self.light
        } else {
            &self.dark
        }
    }
}

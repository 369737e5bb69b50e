//! Profile directory resolution.
//!
//! CRC has stored its profiles in two places over time: under the install
//! directory recorded in the per-user settings, and under local app data.
//! Each strategy is its own resolver; the config picks one.

use crate::config::local_app_data;
use std::path::PathBuf;
use tracing::debug;

/// Locates the directory holding profile files
pub trait ProfileDirResolver: Send + Sync {
    /// The profile directory, or `None` if it cannot be determined
    fn resolve(&self) -> Option<PathBuf>;
}

/// An explicitly configured directory
#[derive(Debug, Clone)]
pub struct FixedDir {
    dir: PathBuf,
}

impl FixedDir {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ProfileDirResolver for FixedDir {
    fn resolve(&self) -> Option<PathBuf> {
        Some(self.dir.clone())
    }
}

/// `<local app data>/CRC/Profiles`
#[derive(Debug, Clone)]
pub struct LocalAppDataDir {
    base: Option<PathBuf>,
}

impl LocalAppDataDir {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: local_app_data(),
        }
    }

    #[must_use]
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }
}

impl Default for LocalAppDataDir {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileDirResolver for LocalAppDataDir {
    fn resolve(&self) -> Option<PathBuf> {
        let dir = self.base.as_ref()?.join("CRC").join("Profiles");
        Some(dir)
    }
}

/// Source of the CRC installation directory setting
pub trait SettingsSource: Send + Sync {
    /// The install directory, or `None` if the setting is absent or unreadable
    fn install_dir(&self) -> Option<String>;
}

impl<F> SettingsSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn install_dir(&self) -> Option<String> {
        self()
    }
}

/// `<install dir>/Profiles`, with the install dir taken from a [`SettingsSource`]
#[derive(Debug, Clone)]
pub struct InstallDirLookup<S> {
    source: S,
}

impl<S: SettingsSource> InstallDirLookup<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: SettingsSource> ProfileDirResolver for InstallDirLookup<S> {
    fn resolve(&self) -> Option<PathBuf> {
        let install_dir = self.source.install_dir()?;
        let install_dir = install_dir.trim();
        if install_dir.is_empty() {
            debug!("CRC install directory setting is empty");
            return None;
        }
        Some(PathBuf::from(install_dir).join("Profiles"))
    }
}

/// Reads `Install_Dir` from `HKCU\Software\CRC`
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    key: String,
    value: String,
}

impl RegistrySettings {
    pub const DEFAULT_KEY: &'static str = r"Software\CRC";
    pub const DEFAULT_VALUE: &'static str = "Install_Dir";

    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY, Self::DEFAULT_VALUE)
    }
}

#[cfg(windows)]
impl SettingsSource for RegistrySettings {
    fn install_dir(&self) -> Option<String> {
        use std::io::ErrorKind;
        use tracing::error;
        use winreg::RegKey;
        use winreg::enums::HKEY_CURRENT_USER;

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let lookup = hkcu
            .open_subkey(&self.key)
            .and_then(|key| key.get_value::<String, _>(&self.value));

        match lookup {
            Ok(dir) => Some(dir),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!(
                    "CRC install directory not found in HKCU\\{}\\{}",
                    self.key, self.value
                );
                None
            }
            Err(e) => {
                error!(
                    "Failed to read HKCU\\{}\\{}: {}",
                    self.key, self.value, e
                );
                None
            }
        }
    }
}

#[cfg(not(windows))]
impl SettingsSource for RegistrySettings {
    fn install_dir(&self) -> Option<String> {
        debug!(
            "No registry on this platform, HKCU\\{}\\{} treated as absent",
            self.key, self.value
        );
        None
    }
}

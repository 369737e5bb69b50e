//! Starting CRC with a profile.

use crate::config::local_app_data;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use tracing::{debug, error, warn};

/// Argument prefix CRC uses to select a profile on startup
pub const PROFILE_ARG_PREFIX: &str = "--profile=";

/// Starts the CRC executable. Launches are fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    executable: PathBuf,
}

impl Launcher {
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// `<local app data>/CRC/Application/crc.exe`
    #[must_use]
    pub fn default_executable() -> Option<PathBuf> {
        local_app_data().map(|dir| dir.join("CRC").join("Application").join("crc.exe"))
    }

    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The single argument passed to CRC for a profile id
    #[must_use]
    pub fn profile_argument(id: &str) -> String {
        format!("{PROFILE_ARG_PREFIX}{id}")
    }

    /// Start CRC with the given profile, reporting failures to the caller.
    ///
    /// A bare file name is looked up on `PATH` by the OS; any other path must
    /// name an existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable does not exist or cannot be started.
    pub fn try_launch(&self, id: &str) -> Result<()> {
        if !self.is_bare_name() && !self.executable.is_file() {
            return Err(Error::Process(format!(
                "{} not found",
                self.executable.display()
            )));
        }

        let argument = Self::profile_argument(id);
        let child = Command::new(&self.executable)
            .arg(&argument)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                Error::Process(format!(
                    "Failed to spawn {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        debug!(
            "Started {} {} (pid {})",
            self.executable.display(),
            argument,
            child.id()
        );
        let _ = reap_in_background(child);
        Ok(())
    }

    fn is_bare_name(&self) -> bool {
        self.executable.components().count() == 1
            && self.executable.file_name().is_some()
            && !self.executable.is_absolute()
    }

    /// Start CRC with the given profile. Failures are logged, never returned.
    pub fn launch(&self, id: &str) {
        if let Err(e) = self.try_launch(id) {
            error!("Unable to launch CRC: {e}");
        }
    }
}

/// Reap CRC on a detached thread once it exits
fn reap_in_background(mut child: Child) -> Option<JoinHandle<()>> {
    let pid = child.id();
    std::thread::Builder::new()
        .name(format!("crc-reaper-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => debug!("CRC (pid {pid}) exited with {status}"),
            Err(e) => warn!("Failed to wait for CRC (pid {pid}): {e}"),
        })
        .inspect_err(|e| warn!("Failed to start reaper thread for pid {pid}: {e}"))
        .ok()
}

impl Default for Launcher {
    fn default() -> Self {
        let executable = Self::default_executable().unwrap_or_else(|| {
            warn!("Could not determine local app data directory, looking for crc.exe on PATH");
            PathBuf::from("crc.exe")
        });
        Self::new(executable)
    }
}

//! In-memory index of CRC profiles.
//!
//! The store publishes each loaded generation as one immutable snapshot.
//! `load` builds the new list before swapping it in, so readers see either
//! the previous list or the new one and never a partially built one.

mod resolve;

pub use resolve::{
    FixedDir, InstallDirLookup, LocalAppDataDir, ProfileDirResolver, RegistrySettings,
    SettingsSource,
};

use crate::{Error, Profile, Result};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Stores and answers queries against the loaded profiles
pub struct ProfileStore {
    resolver: Box<dyn ProfileDirResolver>,
    profiles: RwLock<Arc<[Profile]>>,
}

impl ProfileStore {
    /// Create an empty store that finds its profiles through `resolver`
    pub fn new(resolver: impl ProfileDirResolver + 'static) -> Self {
        Self::with_boxed_resolver(Box::new(resolver))
    }

    #[must_use]
    pub fn with_boxed_resolver(resolver: Box<dyn ProfileDirResolver>) -> Self {
        Self {
            resolver,
            profiles: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Directory profiles are loaded from, if one can be determined
    #[must_use]
    pub fn resolve_profile_directory(&self) -> Option<PathBuf> {
        self.resolver.resolve()
    }

    /// Reload every profile from the profile directory.
    ///
    /// Failures never propagate: an unresolved or missing directory leaves the
    /// store empty, and unreadable or malformed files are skipped. Returns the
    /// number of profiles now in the store.
    pub fn load(&self) -> usize {
        let profiles = match self.resolve_profile_directory() {
            Some(dir) if dir.is_dir() => {
                debug!("Loading profiles from {}", dir.display());
                read_profile_dir(&dir).unwrap_or_else(|e| {
                    error!("Failed to read profile folder {}: {}", dir.display(), e);
                    Vec::new()
                })
            }
            Some(dir) => {
                error!("Profile folder not found: {}", dir.display());
                Vec::new()
            }
            None => {
                error!("Profile folder not found: could not determine its location");
                Vec::new()
            }
        };

        let count = profiles.len();
        self.publish(profiles);
        info!("Loaded {count} profiles.");
        count
    }

    /// Profiles whose name contains `query`, ignoring case.
    ///
    /// A missing, empty or all-whitespace query returns every profile. Results
    /// keep load order.
    #[must_use]
    pub fn get_matching(&self, query: Option<&str>) -> Vec<Profile> {
        let profiles = self.profiles();

        let query = match query {
            Some(q) if !q.trim().is_empty() => q,
            _ => return profiles.to_vec(),
        };

        profiles
            .iter()
            .filter(|profile| {
                profile
                    .name
                    .as_deref()
                    .is_some_and(|name| contains_ignore_case(name, query))
            })
            .cloned()
            .collect()
    }

    /// Snapshot of the currently published profiles
    #[must_use]
    pub fn profiles(&self) -> Arc<[Profile]> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// First profile with the given id
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<Profile> {
        self.profiles().iter().find(|p| p.id == id).cloned()
    }

    /// Like [`find_by_id`](Self::find_by_id) but reports a missing profile as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProfileNotFound`] if no loaded profile has this id.
    pub fn require(&self, id: &str) -> Result<Profile> {
        self.find_by_id(id)
            .ok_or_else(|| Error::ProfileNotFound(id.to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles().is_empty()
    }

    fn publish(&self, profiles: Vec<Profile>) {
        let snapshot: Arc<[Profile]> = Arc::from(profiles);
        *self
            .profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}

/// Read every `*.json` file directly inside `dir`, in file name order.
///
/// Only failing to list the directory is an error; bad files are logged and skipped.
fn read_profile_dir(dir: &Path) -> Result<Vec<Profile>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                error!("Failed to read entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|path| is_profile_file(path))
        .collect();
    files.sort();

    let mut profiles = Vec::with_capacity(files.len());
    for path in files {
        match load_profile_file(&path) {
            Ok(profile) => {
                info!(
                    "Loaded profile {} from {}",
                    profile.display_name(),
                    path.display()
                );
                profiles.push(profile);
            }
            Err(e) => error!("Error loading profile {}: {}", path.display(), e),
        }
    }

    Ok(profiles)
}

fn is_profile_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Parse one profile file and record where it came from
fn load_profile_file(path: &Path) -> Result<Profile> {
    let bytes = std::fs::read(path)?;
    let content = decode_profile_text(&bytes);
    let mut profile = Profile::from_json_str(&content).map_err(|e| {
        Error::Profile(format!(
            "{} (at line {}, column {})",
            e,
            e.line(),
            e.column()
        ))
    })?;
    profile.file_path = path.to_path_buf();
    Ok(profile)
}

/// Profile text with a leading byte order mark dropped. Invalid UTF-8 becomes U+FFFD.
fn decode_profile_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

/// Case-insensitive substring test using simple per-character case folding
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if haystack.is_ascii() && needle.is_ascii() {
        if needle.is_empty() {
            return true;
        }
        return haystack
            .as_bytes()
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()));
    }
    fold_case(haystack).contains(&fold_case(needle))
}

fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

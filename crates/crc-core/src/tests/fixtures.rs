//! Test fixtures and helpers

use crate::config::IconConfig;
use crate::plugin::{CrcPlugin, LocalHost, Plugin, PluginContext};
use crate::profile::FixedDir;
use crate::{Launcher, ProfileStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// The two-file directory from the JFK example
pub const JFK_PROFILES: &[(&str, &str)] = &[
    ("p1.json", r#"{"id":"A1","name":"JFK Approach"}"#),
    ("p2.json", r#"{"id":"A2","name":"jfk ground"}"#),
];

/// Write profile files into an existing directory
pub fn write_profiles(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        std::fs::write(dir.join(name), content).unwrap();
    }
}

/// Create a temp directory holding the given profile files
pub fn profile_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_profiles(dir.path(), files);
    dir
}

/// Profile JSON with just an id and a name
pub fn profile_json(id: &str, name: &str) -> String {
    serde_json::json!({ "id": id, "name": name }).to_string()
}

/// A store reading from `dir`, already loaded
pub fn loaded_store(dir: &Path) -> Arc<ProfileStore> {
    let store = Arc::new(ProfileStore::new(FixedDir::new(dir)));
    store.load();
    store
}

/// A plugin whose launcher points at a file that does not exist
pub fn plugin_for(dir: &Path) -> CrcPlugin {
    let store = Arc::new(ProfileStore::new(FixedDir::new(dir)));
    CrcPlugin::new(
        store,
        Launcher::new(dir.join("no-such-crc.exe")),
        IconConfig::default(),
    )
}

/// A plugin initialized against a local host with the given theme
pub fn initialized_plugin(dir: &Path, host: &Arc<LocalHost>) -> CrcPlugin {
    let mut plugin = plugin_for(dir);
    plugin.init(PluginContext::new(host.clone()));
    plugin
}

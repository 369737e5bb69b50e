//! Launcher plugin front-end.
//!
//! Turns host queries into sorted profile results and launches CRC when a
//! result is selected.

mod host;

pub use host::{HostApi, LocalHost, PluginContext, SubscriptionId, ThemeListener};

use crate::config::IconConfig;
use crate::{ContextMenuItem, Launcher, ProfileStore, ResultItem, Theme};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Plugin id registered with the host
pub const PLUGIN_ID: &str = "1B6E001733344844B6A60C576587F27B";

/// Callbacks a launcher host drives
pub trait Plugin {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn init(&mut self, context: PluginContext);

    /// Results for the host's current search text
    fn query(&self, search: &str) -> Vec<ResultItem>;

    /// Run the selected result. Returns `true` if the host should hide.
    fn select(&self, result: &ResultItem) -> bool;

    fn load_context_menus(&self, selected: &ResultItem) -> Vec<ContextMenuItem>;

    fn dispose(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    Created,
    Initialized,
    Disposed,
}

/// The CRC profile plugin
pub struct CrcPlugin {
    store: Arc<ProfileStore>,
    launcher: Launcher,
    icons: IconConfig,
    icon_path: Arc<RwLock<String>>,
    context: Option<PluginContext>,
    subscription: Option<host::SubscriptionId>,
    state: PluginState,
}

impl CrcPlugin {
    pub fn new(store: Arc<ProfileStore>, launcher: Launcher, icons: IconConfig) -> Self {
        let icon_path = Arc::new(RwLock::new(icons.dark.clone()));
        Self {
            store,
            launcher,
            icons,
            icon_path,
            context: None,
            subscription: None,
            state: PluginState::Created,
        }
    }

    #[must_use]
    pub fn state(&self) -> PluginState {
        self.state
    }

    /// Icon currently attached to results
    #[must_use]
    pub fn icon_path(&self) -> String {
        self.icon_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn store(&self) -> &Arc<ProfileStore> {
        &self.store
    }

    /// Start CRC with a profile id. Failures are logged only.
    pub fn launch(&self, id: &str) {
        self.launcher.launch(id);
    }

    fn unsubscribe(&mut self) {
        if let (Some(context), Some(id)) = (&self.context, self.subscription.take()) {
            context.api.unsubscribe_theme_changed(id);
        }
    }
}

fn update_icon_path(icon_path: &RwLock<String>, icons: &IconConfig, theme: Theme) {
    let path = icons.for_theme(theme).to_string();
    debug!("Using icon {path} for theme {theme:?}");
    *icon_path.write().unwrap_or_else(PoisonError::into_inner) = path;
}

impl Plugin for CrcPlugin {
    fn name(&self) -> &str {
        "CRC launcher"
    }

    fn description(&self) -> &str {
        "Launches CRC with the selected profile."
    }

    fn init(&mut self, context: PluginContext) {
        if self.state == PluginState::Disposed {
            warn!("Ignoring init on a disposed plugin");
            return;
        }
        self.unsubscribe();

        let icon_path = Arc::clone(&self.icon_path);
        let icons = self.icons.clone();
        let subscription = context
            .api
            .subscribe_theme_changed(Box::new(move |_, new_theme| {
                update_icon_path(&icon_path, &icons, new_theme);
            }));
        update_icon_path(&self.icon_path, &self.icons, context.api.current_theme());

        self.subscription = Some(subscription);
        self.context = Some(context);
        self.state = PluginState::Initialized;

        self.store.load();
    }

    fn query(&self, search: &str) -> Vec<ResultItem> {
        let icon_path = self.icon_path();
        let mut results: Vec<ResultItem> = self
            .store
            .get_matching(Some(search))
            .iter()
            .map(|profile| ResultItem::for_profile(profile, &icon_path))
            .collect();

        results.sort_by(|a, b| a.title.cmp(&b.title));
        results
    }

    fn select(&self, result: &ResultItem) -> bool {
        self.launch(&result.launch_key);
        info!("Selected {} {}", result.title, result.launch_key);
        true
    }

    fn load_context_menus(&self, _selected: &ResultItem) -> Vec<ContextMenuItem> {
        Vec::new()
    }

    fn dispose(&mut self) {
        if self.state == PluginState::Disposed {
            return;
        }
        self.unsubscribe();
        self.state = PluginState::Disposed;
    }
}

impl Drop for CrcPlugin {
    fn drop(&mut self) {
        self.dispose();
    }
}

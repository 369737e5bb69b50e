//! What the plugin needs from the launcher hosting it.

use crate::Theme;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

/// Called with `(previous, current)` when the host theme changes
pub type ThemeListener = Box<dyn Fn(Theme, Theme) + Send + Sync>;

/// Handle for removing a theme listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Services a launcher host exposes to its plugins
pub trait HostApi: Send + Sync {
    fn current_theme(&self) -> Theme;

    fn subscribe_theme_changed(&self, listener: ThemeListener) -> SubscriptionId;

    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe_theme_changed(&self, id: SubscriptionId);
}

/// Handed to a plugin on `init`
#[derive(Clone)]
pub struct PluginContext {
    pub api: Arc<dyn HostApi>,
}

impl PluginContext {
    pub fn new(api: Arc<dyn HostApi>) -> Self {
        Self { api }
    }
}

type SharedListener = Arc<dyn Fn(Theme, Theme) + Send + Sync>;

/// In-process host: holds a theme and notifies listeners when it changes.
///
/// Listeners run without the registry locked, so they may subscribe or
/// unsubscribe from inside the callback.
pub struct LocalHost {
    theme: RwLock<Theme>,
    listeners: Mutex<HashMap<SubscriptionId, SharedListener>>,
    next_id: AtomicU64,
}

impl LocalHost {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            theme: RwLock::new(theme),
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Change the theme and notify every listener
    pub fn set_theme(&self, theme: Theme) {
        let previous = {
            let mut current = self.theme.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, theme)
        };
        debug!("Host theme changed from {previous:?} to {theme:?}");

        let listeners: Vec<SharedListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            listener(previous, theme);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl HostApi for LocalHost {
    fn current_theme(&self) -> Theme {
        *self.theme.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe_theme_changed(&self, listener: ThemeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::from(listener));
        id
    }

    fn unsubscribe_theme_changed(&self, id: SubscriptionId) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub(crate) use dirs::local_app_data;
pub use settings::{Config, IconConfig, LauncherConfig, ProfileSource, ProfilesConfig};
pub use validation::warn_unknown_fields;

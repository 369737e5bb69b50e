pub mod config;
pub mod handler;
pub mod launch;
pub mod plugin;
pub mod profile;
pub mod protocol;

mod error;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use launch::Launcher;
pub use plugin::{CrcPlugin, Plugin};
pub use profile::ProfileStore;

pub use crc_types::*;

//! Test module for crc-core
//!
//! This module contains tests for:
//! - Profile loading from a directory and substring matching
//! - The plugin front-end (sorting, theme icons, lifecycle)
//! - The stdio protocol handler
//! - Configuration loading and resolver selection

mod fixtures;
mod store_tests;

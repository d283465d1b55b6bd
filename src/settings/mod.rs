//! Per-user preferences.

mod db;
mod domain;
mod endpoints;

pub use db::{create_default_settings, create_settings_table, get_settings, update_settings};
pub use domain::{Notifications, Settings, SettingsChanges};
pub use endpoints::{get_settings_endpoint, update_settings_endpoint};

//! Configuration state controller for the event list adapter settings
//! editor.
//!
//! The crate owns everything between the persistence transport and the
//! form panels:
//! - [`color`] converts picker objects and `rgb(...)` text into canonical
//!   `#rrggbb` strings,
//! - [`tracker`] decides whether the draft diverges from the saved
//!   snapshot,
//! - [`tab`] maps tab identifiers to tab bar positions and back,
//! - [`ConfigController`] owns the draft and the saved snapshot and runs
//!   the normalization pass before every save,
//! - [`EventListSettings`] wires the controller to the persistence,
//!   navigation and rendering collaborators.
//!
//! Hosts usually:
//! 1. Compute an [`Environment`] once from the page address.
//! 2. Build an [`EventListSettings`] with a [`ConfigStore`], a
//!    [`Navigator`] and a [`RenderSignal`].
//! 3. Call `load`, forward panel edits as [`SettingsEvent`]s and draw the
//!    [`RenderPlan`] returned by `render`.

mod app;
pub mod color;
mod config;
mod controller;
mod environment;
mod errors;
mod storage;
pub mod tab;
pub mod tracker;

pub use app::{
    EventListSettings, ListPanelProps, Panel, RenderPlan, RenderSignal,
    SettingsApp, SettingsEvent, TabsView,
};
pub use color::ColorValue;
pub use config::{
    BOOLEAN_COLOR_FALSE_KEY, BOOLEAN_COLOR_TRUE_KEY, Config, ConfigPath,
    PDF_SETTINGS_KEY,
};
pub use controller::{
    ConfigController, LoadPhase, PendingSave, is_color_setting,
    prepare_for_save,
};
pub use environment::{Environment, PageLocation};
pub use errors::{LoadError, SaveError};
pub use storage::{ConfigStore, FileStore, default_config_path};
pub use tab::{HashNavigator, Navigator, RouteLocation, SelectedTab, index_of};
pub use tracker::is_changed;

#![warn(clippy::all, missing_docs)]

//! Core logic for the timeline admin console.
//!
//! This crate hosts the data models, the REST client, the local mirror of
//! the timeline document, renderers, form handling and the action layer
//! used by the terminal UI and any future frontends.

pub mod api;
pub mod config;
pub mod console;
pub mod debounce;
pub mod form;
pub mod intent;
pub mod mirror;
pub mod models;
pub mod notify;
pub mod render;

pub use api::{ApiClient, ApiError, TimelineApi};
pub use config::AppConfig;
pub use console::{Console, Outcome};
pub use intent::{FormKind, Intent};
pub use mirror::LocalMirror;
pub use models::{Era, Event, Scale, TimelineConfig, TimelineDocument};

#![forbid(unsafe_code)]

//! Core domain model and navigation logic for the Fútbol 7 training plan.
//!
//! This crate provides:
//! - Catalog types (mesocycles, weekly blocks, sessions, exercises)
//! - The built-in seed catalog and its validation
//! - Catalog gateways (HTTP service, in-memory)
//! - The navigation controller and per-session progress tracking

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod gateway;
pub mod progress;
pub mod overview;
pub mod navigation;

// Re-export commonly used types
pub use error::{Error, Result, TransportError};
pub use types::*;
pub use catalog::get_default_catalog;
pub use config::Config;
pub use gateway::{CatalogGateway, HttpGateway, StaticGateway};
pub use progress::{Progress, SessionTracker};
pub use overview::PlanOverview;
pub use navigation::{LoadState, LogNotifier, Navigator, Notifier, PlanSnapshot, View};

// src/models/mod.rs

//! Domain models for the feed exporter.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod offer;
mod rows;

// Re-export all public types
pub use config::{
    CatalogConfig, CategoryConfig, Config, DatabaseConfig, LoggingConfig, ServerConfig,
};
pub use offer::{Category, Offer};
pub use rows::{ClassRow, CompletePass, PassRow, ScheduleSlot, WEEKDAYS};

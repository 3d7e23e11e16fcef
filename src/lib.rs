// src/lib.rs

//! yml-export Library
//!
//! Turns class and ticket-type rows into a versioned Yandex YML feed.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod source;
pub mod utils;

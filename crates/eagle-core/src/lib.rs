//! EAGLE Core - Domain models, configuration, and capability ports
//!
//! This crate contains the request-scoped value types shared by every stage of
//! the query pipeline, the error taxonomy, and the port traits that geocoding,
//! analysis, and inference adapters implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{EagleError, Result};

//! EAGLE API - HTTP surface for the query pipeline

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::{create_app, create_router};
pub use state::AppState;

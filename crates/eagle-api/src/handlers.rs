mod health;
mod index;
mod inference;
mod query;

pub use health::health_check;
pub use index::index_banner;
pub use inference::handle_run_inference;
pub use query::handle_query;

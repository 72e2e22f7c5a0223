pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod seed;
pub mod serializer;
pub mod validation;

pub use db::Database;
pub use handlers::{ApiDoc, AppState, router};

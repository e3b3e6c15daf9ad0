pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod services;
pub mod state;
pub mod workers;

pub use db::Store;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;

pub mod admin_handlers;
pub mod app;
pub mod auth_handlers;
pub mod config;
pub mod errors;
pub mod password;
pub mod response;
pub mod service;
pub mod store;

pub use app::AppState;

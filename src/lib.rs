pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod messages;
pub mod models;
pub mod navigation;
pub mod query;
pub mod routes;
pub mod session;
pub mod store;
pub mod validation;
pub mod views;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::{AuthState, Session};

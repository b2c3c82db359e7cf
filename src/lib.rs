pub mod auth;
pub mod config;
pub mod database;
pub mod db;
pub mod env;
pub mod error;
pub mod models;
pub mod telemetry;
#[cfg(test)]
mod test;

pub use auth::{PasswordPolicy, User, UserSummary};
pub use config::StoreConfig;
pub use db::SchoolStore;
pub use error::{ConfigError, Operation, StorageError};
pub use models::GradeEntry;

//! Disaster-alert backend client library.
//!
//! This crate provides a Rust client for the disaster-alert service's HTTP
//! API. It supports:
//!
//! - Listing registered users (alert recipients)
//! - Sending a batched email alert to a set of users
//! - Administrator login
//!
//! # Example
//!
//! ```no_run
//! use disaster_api::{AlertApi, AlertClient, AlertRequest, ApiConfig};
//!
//! # async fn example() -> Result<(), disaster_api::ApiError> {
//! let client = AlertClient::new(ApiConfig::default())?;
//!
//! let users = client.list_users().await?;
//! println!("{} registered users", users.len());
//!
//! let request = AlertRequest::new("Disaster Alert", "<p>Stay safe</p>", users);
//! client.send_alert(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use api::AlertApi;
pub use client::AlertClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

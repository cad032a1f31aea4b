//! Wire types for the disaster-alert backend.

pub mod alert;
pub mod auth;
pub mod user;

pub use alert::AlertRequest;
pub use auth::LoginRequest;
pub use user::{Recipient, RecipientId, UsersResponse};

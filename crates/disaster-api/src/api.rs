//! The AlertApi trait definition.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{AlertRequest, LoginRequest, Recipient};

/// The backend operations the admin console depends on.
///
/// [`crate::AlertClient`] is the HTTP implementation. This trait is
/// object-safe and can be used with `Arc<dyn AlertApi>`, which lets the
/// console run against an in-memory double in tests.
#[async_trait]
pub trait AlertApi: Send + Sync {
    /// Fetch every registered user, in the order the backend returns them.
    async fn list_users(&self) -> Result<Vec<Recipient>, ApiError>;

    /// Send one batched alert. Any 2xx status is success.
    async fn send_alert(&self, request: &AlertRequest) -> Result<(), ApiError>;

    /// Authenticate an administrator.
    async fn login(&self, request: &LoginRequest) -> Result<(), ApiError>;
}

//! Driving port for password maintenance.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::UserId;

/// Request to change the caller's password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePasswordRequest {
    /// The authenticated operator.
    pub user_id: UserId,
    /// The current password, for verification.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// Domain use-case port for credential maintenance.
#[async_trait]
pub trait CredentialsCommand: Send + Sync {
    /// Replace the operator's password after verifying the current one.
    async fn change_password(&self, request: ChangePasswordRequest) -> Result<(), Error>;
}

/// Fixture command used until a database is configured: verifies against the
/// fixture password and discards the replacement.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialsCommand;

#[async_trait]
impl CredentialsCommand for FixtureCredentialsCommand {
    async fn change_password(&self, request: ChangePasswordRequest) -> Result<(), Error> {
        if request.current_password != "password" {
            return Err(Error::unauthorized("current password is incorrect"));
        }
        Ok(())
    }
}

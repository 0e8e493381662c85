//! Driving port for credential verification.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::{LoginCredentials, UserId};

/// Domain use-case port for logging an operator in.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the operator's id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Fixture identifier issued by [`FixtureLoginService`].
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";

/// Fixture login used until a database is configured: accepts exactly
/// `admin`/`password`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() != FIXTURE_USERNAME
            || credentials.password() != FIXTURE_PASSWORD
        {
            return Err(Error::unauthorized("invalid credentials"));
        }
        UserId::new(FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;

    #[tokio::test]
    async fn fixture_accepts_the_fixture_pair() {
        let creds = LoginCredentials::try_from_parts("admin", "password").expect("creds");
        let user_id = FixtureLoginService
            .authenticate(&creds)
            .await
            .expect("fixture login");
        assert_eq!(user_id.to_string(), FIXTURE_USER_ID);
    }

    #[tokio::test]
    async fn fixture_rejects_anything_else() {
        let creds = LoginCredentials::try_from_parts("admin", "wrong").expect("creds");
        let err = FixtureLoginService
            .authenticate(&creds)
            .await
            .expect_err("should fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}

//! Diesel-backed credential verification and maintenance.
//!
//! Passwords are stored as bcrypt hashes. Hashing and verification are CPU
//! bound, so both run on the blocking thread pool rather than stalling the
//! async executor.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{ChangePasswordRequest, CredentialsCommand, LoginService};
use crate::domain::{Error, LoginCredentials, UserId};

use super::error_mapping::{StorageFailure, classify_diesel_error, classify_pool_error};
use super::models::{NewUserRow, PasswordUpdate, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed login and credential maintenance adapter.
#[derive(Clone)]
pub struct DieselLoginService {
    pool: DbPool,
}

fn map_failure(failure: StorageFailure) -> Error {
    match failure {
        StorageFailure::Connection(message) => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        StorageFailure::Query(message) => Error::internal(format!("user store error: {message}")),
    }
}

fn map_pool(error: super::pool::PoolError) -> Error {
    map_failure(classify_pool_error(error))
}

fn map_diesel(error: diesel::result::Error) -> Error {
    map_failure(classify_diesel_error(error))
}

/// Verify a password on the blocking pool.
async fn verify_password(password: String, hash: String) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| Error::internal(format!("verification task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password verification failed: {err}")))
}

/// Hash a password on the blocking pool.
async fn hash_password(password: String) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

impl DieselLoginService {
    /// Create a new adapter with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        users::table
            .filter(users::username.eq(username))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        users::table
            .find(id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)
    }

    /// Create the initial operator account when the user table is empty.
    ///
    /// Mirrors a first-run `createsuperuser`: deployments set the initial
    /// password via configuration, and the account is skipped entirely once
    /// any user exists.
    ///
    /// # Errors
    /// Propagates storage failures; hashing failures surface as internal
    /// errors.
    pub async fn ensure_initial_user(
        &self,
        username: &str,
        display_name: &str,
        password: String,
    ) -> Result<(), Error> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let existing: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        if existing > 0 {
            return Ok(());
        }

        let password_hash = hash_password(password).await?;
        let row = NewUserRow {
            id: Uuid::new_v4(),
            username,
            display_name,
            password_hash: &password_hash,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::username)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        info!(username, "created initial operator account");
        Ok(())
    }
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Some(row) = self.find_by_username(credentials.username()).await? else {
            // Same response as a bad password so usernames cannot be probed.
            return Err(Error::unauthorized("invalid credentials"));
        };
        let valid =
            verify_password(credentials.password().to_owned(), row.password_hash).await?;
        if !valid {
            warn!(username = credentials.username(), "failed login attempt");
            return Err(Error::unauthorized("invalid credentials"));
        }
        Ok(UserId::from_uuid(row.id))
    }
}

#[async_trait]
impl CredentialsCommand for DieselLoginService {
    async fn change_password(&self, request: ChangePasswordRequest) -> Result<(), Error> {
        let Some(row) = self.find_by_id(*request.user_id.as_uuid()).await? else {
            return Err(Error::not_found("user not found"));
        };
        let valid = verify_password(request.current_password, row.password_hash).await?;
        if !valid {
            return Err(Error::unauthorized("current password is incorrect"));
        }

        let password_hash = hash_password(request.new_password).await?;
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let updated = diesel::update(users::table.find(row.id))
            .set(&PasswordUpdate {
                password_hash: &password_hash,
                updated_at: Utc::now(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        if updated == 0 {
            return Err(Error::not_found("user not found"));
        }
        info!(user = %row.id, "password changed");
        Ok(())
    }
}

use async_trait::async_trait;
use auth::CredentialStore;
use auth::ResetToken;
use auth::Role;
use auth::StoreError;
use auth::User;
use auth::UserId;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::domain::credentials::models::NewUser;
use crate::domain::credentials::ports::UserRepository;

const USER_COLUMNS: &str = "id, email, password_hash, role, reset_token, reset_token_expiry";

/// Credential store backed by the `users` table.
///
/// Expected columns: `id BIGSERIAL PRIMARY KEY`, `email TEXT UNIQUE NOT NULL`,
/// `password_hash TEXT NOT NULL`, `role TEXT NOT NULL`, `reset_token TEXT NULL`,
/// `reset_token_expiry TIMESTAMPTZ NULL`.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool for the configured database.
    ///
    /// # Errors
    /// * `sqlx::Error` - Connection failed
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        tracing::info!(
            max_connections = config.max_connections,
            database = "postgresql",
            "Database connection pool created"
        );

        Ok(Self::new(pool))
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.as_ref().map(user_from_row).transpose()
    }
}

fn database_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let id = UserId(row.try_get("id").map_err(database_error)?);
    let role: String = row.try_get("role").map_err(database_error)?;
    let reset_token: Option<String> = row.try_get("reset_token").map_err(database_error)?;
    let reset_token_expiry: Option<DateTime<Utc>> =
        row.try_get("reset_token_expiry").map_err(database_error)?;

    Ok(User {
        id,
        email: row.try_get("email").map_err(database_error)?,
        password_hash: row.try_get("password_hash").map_err(database_error)?,
        role: role
            .parse::<Role>()
            .map_err(|e| StoreError::Database(e.to_string()))?,
        reset_token: reset_token_from_columns(id, reset_token, reset_token_expiry)?,
    })
}

/// The token and its expiry are stored together or not at all.
fn reset_token_from_columns(
    id: UserId,
    value: Option<String>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<Option<ResetToken>, StoreError> {
    match (value, expires_at) {
        (Some(value), Some(expires_at)) => Ok(Some(ResetToken::new(value, expires_at))),
        (None, None) => Ok(None),
        _ => Err(StoreError::Database(format!(
            "user {} has a reset token without an expiry, or an expiry without a token",
            id
        ))),
    }
}

fn expect_one_row(id: UserId, rows_affected: u64) -> Result<(), StoreError> {
    if rows_affected == 0 {
        return Err(StoreError::UserNotFound(id));
    }
    Ok(())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_one("email", email).await
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id.0)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        expect_one_row(id, result.rows_affected())
    }

    async fn set_reset_token(&self, id: UserId, token: &ResetToken) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET reset_token = $2, reset_token_expiry = $3
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(token.value())
        .bind(token.expires_at())
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        expect_one_row(id, result.rows_affected())
    }

    async fn get_user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        self.find_one("reset_token", token).await
    }

    async fn clear_reset_token(&self, id: UserId, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET reset_token = NULL, reset_token_expiry = NULL
            WHERE id = $1 AND reset_token = $2
            "#,
        )
        .bind(id.0)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl UserRepository for PostgresCredentialStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StoreError::EmailAlreadyExists(user.email.clone());
                }
            }
            database_error(e)
        })?;

        Ok(User {
            id: UserId(row.try_get("id").map_err(database_error)?),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            reset_token: None,
        })
    }
}

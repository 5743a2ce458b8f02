use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{NewUser, TopicPreferences, User},
};

const USER_COLUMNS: &str = "id, email, password_hash, technology, business, science, health, \
                            entertainment, sports, created_at";

/// Persistence for user accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up an account by its normalized email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Creates an account; fails with `UserExists` if the email is taken
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    technology: bool,
    business: bool,
    science: bool,
    health: bool,
    entertainment: bool,
    sports: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            interests: TopicPreferences {
                technology: row.technology,
                business: row.business,
                science: row.science,
                health: row.health,
                entertainment: row.entertainment,
                sports: row.sports,
            },
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let interests = user.interests;

        let result = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, technology, business, science, health, entertainment, sports)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(interests.technology)
        .bind(interests.business)
        .bind(interests.science)
        .bind(interests.health)
        .bind(interests.entertainment)
        .bind(interests.sports)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::UserExists),
            Err(e) => Err(e.into()),
        }
    }
}

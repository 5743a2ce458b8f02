use std::sync::Arc;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{LoginRequest, NewUser, RegisterRequest, UserProfile},
};

/// Password registration and login over a `UserStore`
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    hash_cost: u32,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, hash_cost: u32) -> Self {
        Self { users, hash_cost }
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<UserProfile> {
        let email = normalize_email(&req.email);
        if email.is_empty() || !email.contains('@') || req.password.is_empty() {
            return Err(AppError::InvalidInput(
                "A valid email and a password are required".to_string(),
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::UserExists);
        }

        let cost = self.hash_cost;
        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                interests: req.interests,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(UserProfile::from(&user))
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<UserProfile> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = req.password;
        let password_hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            tracing::debug!(user_id = %user.id, "Rejected login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(UserProfile::from(&user))
    }

    /// Profile for the account the identity provider vouched for
    pub async fn profile(&self, email: &str) -> AppResult<UserProfile> {
        let email = normalize_email(email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserProfile::from(&user))
    }
}

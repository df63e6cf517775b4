use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    auth::{password, JwtService},
    errors::{AppError, AppResult},
    models::{
        domain::{refresh_token, RefreshToken, User, UserRole},
        dto::{
            request::{LoginRequest, RegisterRequest, UpdateUserRequest},
            response::{AuthResponse, RefreshTokenResponse, UserDto},
        },
    },
    repositories::{RefreshTokenRepository, UserRepository},
};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    jwt: Arc<JwtService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        if self
            .users
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "Username '{}' is already taken",
                request.username
            )));
        }

        let hash = password::hash_password(&request.password)?;
        let user = User::new(
            &request.username,
            &request.email,
            &request.display_name,
            &hash,
        );

        let user = self.users.create(user).await?;
        log::info!("Registered user {} ({})", user.username, user.id);

        self.issue_tokens(user).await
    }

    /// Missing user and wrong password produce the same error so the login
    /// endpoint cannot be used to probe for usernames.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        if !password::verify_password(&request.password, stored_hash)? {
            log::debug!("Failed login attempt for username {}", request.username);
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        self.issue_tokens(user).await
    }

    /// Rotates the refresh token: the presented one is revoked and a fresh
    /// pair is issued.
    pub async fn refresh(&self, raw_refresh_token: &str) -> AppResult<RefreshTokenResponse> {
        let claims = self.jwt.validate_refresh_token(raw_refresh_token)?;

        let hash = refresh_token::hash_token(raw_refresh_token);
        let stored = self
            .refresh_tokens
            .find_by_token_hash(&hash)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Refresh token not recognized".to_string()))?;

        if !stored.is_valid() || stored.user_id != claims.sub {
            return Err(AppError::Unauthorized(
                "Refresh token is revoked or expired".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_id(&stored.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        self.refresh_tokens.revoke_by_token_hash(&hash).await?;

        let token = self.jwt.create_token(&user)?;
        let new_refresh = self.store_refresh_token(&user.id).await?;

        Ok(RefreshTokenResponse {
            token,
            refresh_token: new_refresh,
        })
    }

    pub async fn logout(&self, raw_refresh_token: &str) -> AppResult<()> {
        let hash = refresh_token::hash_token(raw_refresh_token);
        self.refresh_tokens.revoke_by_token_hash(&hash).await
    }

    pub async fn get_user(&self, id: &str) -> AppResult<UserDto> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;
        Ok(user.into())
    }

    pub async fn get_user_by_username(&self, username: &str) -> AppResult<UserDto> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with username '{}' not found", username))
            })?;
        Ok(user.into())
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserDto>> {
        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn update_user(
        &self,
        username: &str,
        request: UpdateUserRequest,
    ) -> AppResult<UserDto> {
        let mut user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with username '{}' not found", username))
            })?;

        if let Some(display_name) = request.display_name {
            user.display_name = display_name;
        }
        if let Some(email) = request.email {
            user.email = email;
        }
        if let Some(role) = request.role {
            user.role = role;
        }

        let user = self.users.update(username, user).await?;
        Ok(user.into())
    }

    /// Deleting a user also revokes every refresh token they hold, so stolen
    /// tokens die with the account.
    pub async fn delete_user(&self, username: &str) -> AppResult<()> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with username '{}' not found", username))
            })?;

        self.users.delete(username).await?;
        let revoked = self.refresh_tokens.revoke_all_for_user(&user.id).await?;
        log::info!(
            "Deleted user {} and revoked {} refresh tokens",
            username,
            revoked
        );
        Ok(())
    }

    async fn issue_tokens(&self, user: User) -> AppResult<AuthResponse> {
        let token = self.jwt.create_token(&user)?;
        let refresh = self.store_refresh_token(&user.id).await?;

        Ok(AuthResponse {
            token,
            refresh_token: refresh,
            user: user.into(),
        })
    }

    async fn store_refresh_token(&self, user_id: &str) -> AppResult<String> {
        let raw = self.jwt.create_refresh_token(user_id)?;
        let expires_at = Utc::now() + Duration::hours(self.jwt.refresh_expiration_hours());
        let record = RefreshToken::new(
            user_id.to_string(),
            refresh_token::hash_token(&raw),
            expires_at,
        );
        self.refresh_tokens.create(record).await?;
        Ok(raw)
    }
}

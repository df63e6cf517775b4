use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::user::{User, UserRole};

/// Access-token payload. `sub` carries the user id; `exp`/`iat` are UTC
/// timestamps in seconds as jsonwebtoken expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(expiration_hours)).timestamp() as usize,
        }
    }
}

/// Refresh-token payload. `token_type` is always "refresh" and is checked
/// at validation so access tokens cannot be replayed against the refresh
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub token_type: String,
    pub exp: usize,
    pub iat: usize,
}

impl RefreshClaims {
    pub fn new(user_id: &str, expiration_hours: i64) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            token_type: "refresh".to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(expiration_hours)).timestamp() as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_claims_copy_the_user_identity() {
        let user = User::new("ada", "ada@example.com", "Ada", "hash");
        let claims = Claims::new(&user, 24);

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.role, UserRole::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_claims_carry_the_type_marker() {
        let claims = RefreshClaims::new("user-1", 168);

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.token_type, "refresh");
        assert!(claims.exp > claims.iat);
    }
}

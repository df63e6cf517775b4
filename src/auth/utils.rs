use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::user::UserRole,
};

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if claims.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

/// Admins pass unconditionally; everyone else must be the resource owner.
pub fn require_owner_or_admin(claims: &Claims, resource_owner: &str) -> AppResult<()> {
    if claims.role == UserRole::Admin || claims.sub == resource_owner {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You can only access your own resources".to_string(),
    ))
}

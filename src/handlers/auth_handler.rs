use std::sync::Arc;

use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{LoginRequest, RefreshTokenRequest, RegisterRequest},
};

#[post("/api/auth/register")]
async fn register(
    state: web::Data<Arc<AppState>>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let response = state.user_service.register(request).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/api/auth/login")]
async fn login(
    state: web::Data<Arc<AppState>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let response = state.user_service.login(request).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/auth/refresh")]
async fn refresh(
    state: web::Data<Arc<AppState>>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .user_service
        .refresh(&request.into_inner().refresh_token)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/auth/logout")]
async fn logout(
    state: web::Data<Arc<AppState>>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .user_service
        .logout(&request.into_inner().refresh_token)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

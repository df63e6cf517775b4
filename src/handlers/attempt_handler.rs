use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::SubmitAnswersRequest,
};

#[post("/api/quizzes/{id}/attempts")]
async fn start_attempt(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state.attempt_service.start_attempt(&id, &auth.0).await?;
    Ok(HttpResponse::Created().json(attempt))
}

#[post("/api/attempts/{id}/submit")]
async fn submit_attempt(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SubmitAnswersRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let summary = state
        .attempt_service
        .submit_attempt(&id, request.into_inner(), &auth.0)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/api/attempts/mine")]
async fn list_my_attempts(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempts = state.attempt_service.list_for_user(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(attempts))
}

#[get("/api/quizzes/{id}/attempts/leaderboard")]
async fn quiz_leaderboard(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let board = state.attempt_service.quiz_leaderboard(&id).await?;
    Ok(HttpResponse::Ok().json(board))
}

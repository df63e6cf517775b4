use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, MaybeAuthenticated},
    errors::AppError,
    models::dto::{
        request::{CreateSessionRequest, JoinSessionRequest, SubmitAnswersRequest},
        response::SessionView,
    },
};

#[post("/api/sessions")]
async fn create_session(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateSessionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let session = state
        .session_service
        .create_session(request, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(SessionView::from_session(&session, Utc::now())))
}

#[get("/api/sessions/{id}")]
async fn get_session(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(SessionView::from_session(&session, Utc::now())))
}

#[post("/api/sessions/{id}/start")]
async fn start_session(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.start_session(&id, &auth.0).await?;
    Ok(HttpResponse::Ok().json(SessionView::from_session(&session, Utc::now())))
}

#[post("/api/sessions/{id}/end")]
async fn end_session(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.end_session(&id, &auth.0).await?;
    Ok(HttpResponse::Ok().json(SessionView::from_session(&session, Utc::now())))
}

/// Public entry point: anyone with a live access code can join. A valid
/// bearer token is optional and binds the participant to the account.
#[post("/api/sessions/join")]
async fn join_session(
    state: web::Data<Arc<AppState>>,
    request: web::Json<JoinSessionRequest>,
    auth: MaybeAuthenticated,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let user_id = auth.0.as_ref().map(|claims| claims.sub.as_str());
    let response = state.session_service.join(request, user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// The participant id acts as the submission capability; no account needed.
#[post("/api/sessions/{id}/participants/{participant_id}/submit")]
async fn submit_answers(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, String)>,
    request: web::Json<SubmitAnswersRequest>,
) -> Result<HttpResponse, AppError> {
    let (session_id, participant_id) = path.into_inner();

    let summary = state
        .session_service
        .submit(&session_id, &participant_id, &request.selections)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/api/sessions/{id}/leaderboard")]
async fn session_leaderboard(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let board = state.session_service.leaderboard(&id).await?;
    Ok(HttpResponse::Ok().json(board))
}

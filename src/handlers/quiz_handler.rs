use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::{
        domain::Question,
        dto::request::{CreateQuizRequest, GenerateQuestionsRequest, PaginationParams},
        dto::response::PagedResponse,
    },
};

#[post("/api/quizzes")]
async fn create_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let quiz = state.quiz_service.create_quiz(request, &auth.0).await?;
    Ok(HttpResponse::Created().json(quiz))
}

/// Generates a quiz from source material in one call. The report flags
/// whether the model output needed repairs.
#[post("/api/quizzes/generate")]
async fn generate_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateQuestionsRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let report = state
        .generation_service
        .generate_quiz(request, &auth.0)
        .await?;
    Ok(HttpResponse::Created().json(report))
}

#[get("/api/quizzes")]
async fn list_quizzes(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PaginationParams>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let (items, total) = state
        .quiz_service
        .list_quizzes(pagination.offset(), pagination.limit())
        .await?;
    Ok(HttpResponse::Ok().json(PagedResponse { items, total }))
}

#[get("/api/quizzes/mine")]
async fn list_my_quizzes(
    state: web::Data<Arc<AppState>>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let (items, total) = state
        .quiz_service
        .list_by_author(&auth.0.sub, pagination.offset(), pagination.limit())
        .await?;
    Ok(HttpResponse::Ok().json(PagedResponse { items, total }))
}

#[get("/api/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[put("/api/quizzes/{id}/questions")]
async fn replace_questions(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<Vec<Question>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .replace_questions(&id, request.into_inner(), &auth.0)
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/api/quizzes/{id}")]
async fn delete_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id, &auth.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

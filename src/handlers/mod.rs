pub mod attempt_handler;
pub mod auth_handler;
pub mod quiz_handler;
pub mod session_handler;
pub mod user_handler;

use actix_web::web;

use crate::auth::AuthMiddleware;

/// Registers every route. Auth endpoints, joining and submitting by
/// participant id are public; everything else carries auth in the handler
/// or sits behind AuthMiddleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(user_handler::health_check)
        .service(user_handler::health_check_ready)
        .service(user_handler::health_check_live)
        .service(auth_handler::register)
        .service(auth_handler::login)
        .service(auth_handler::refresh)
        .service(auth_handler::logout)
        .service(quiz_handler::create_quiz)
        .service(quiz_handler::generate_quiz)
        .service(quiz_handler::list_quizzes)
        .service(quiz_handler::list_my_quizzes)
        .service(quiz_handler::get_quiz)
        .service(quiz_handler::replace_questions)
        .service(quiz_handler::delete_quiz)
        .service(session_handler::create_session)
        .service(session_handler::join_session)
        .service(session_handler::get_session)
        .service(session_handler::start_session)
        .service(session_handler::end_session)
        .service(session_handler::submit_answers)
        .service(session_handler::session_leaderboard)
        .service(attempt_handler::start_attempt)
        .service(attempt_handler::submit_attempt)
        .service(attempt_handler::list_my_attempts)
        .service(attempt_handler::quiz_leaderboard)
        .service(
            web::scope("/api/users")
                .wrap(AuthMiddleware)
                .route("", web::get().to(user_handler::get_all_users))
                .route("/me", web::get().to(user_handler::get_me))
                .route(
                    "/{username}",
                    web::get().to(user_handler::get_user_by_username),
                )
                .route("/{username}", web::put().to(user_handler::update_user))
                .route("/{username}", web::delete().to(user_handler::delete_user)),
        );
}

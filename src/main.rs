use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizrise_server::{
    app_state::AppState, config::Config, handlers, services::SessionWorker,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if config.is_production() {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = Arc::new(
        AppState::new(config)
            .await
            .expect("failed to initialize application state"),
    );

    let worker = SessionWorker::new(Arc::clone(&state.session_repository));
    worker.start().await;

    log::info!("Starting HTTP server on {}:{}", host, port);

    let app_state = Arc::clone(&state);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(Arc::clone(&app_state)))
            .app_data(web::Data::new(app_state.jwt_service.as_ref().clone()))
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    worker.stop().await;
    Ok(())
}

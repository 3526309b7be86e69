use actix_cors::Cors;
use actix_web::{self, App, HttpResponse, HttpServer, ResponseError, middleware::Logger, web};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use crate::{
    api::error,
    configs::{connect_database, run_migrations},
    constants::PROFILE_SYNC_TIMEOUT_SECS,
    modules::{
        chat::{provider::StreamChatClient, service::ChatService},
        friend::{repository_pg::FriendRepositoryPg, service::FriendService},
        session::service::SessionService,
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

async fn api_not_found() -> HttpResponse {
    error::Error::not_found("API Endpoint Not Found").error_response()
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected path parameters: {}", err);
        error::Error::bad_request("Invalid id in request path").into()
    })
}

fn api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(modules::user::route::auth_configure)
            .configure(modules::user::route::configure)
            .configure(modules::chat::route::configure)
            .default_service(web::to(api_not_found)),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    run_migrations(&db_pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Database migration error: {e}")))?;

    let stream_client =
        StreamChatClient::new(&ENV.stream_api_key, &ENV.stream_api_secret, &ENV.stream_base_url)
            .map_err(|_| std::io::Error::other("Chat client initialization error"))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendRepositoryPg::new(db_pool.clone()));

    let chat_service = ChatService::with_dependencies(
        Arc::new(stream_client),
        Duration::from_secs(PROFILE_SYNC_TIMEOUT_SECS),
    );
    let user_service = UserService::with_dependencies(user_repo.clone(), chat_service.clone());
    let session_service = SessionService::with_dependencies(
        &ENV.jwt_secret,
        ENV.session_expiration,
        ENV.cookie_secure,
        user_repo.clone(),
    );
    let friend_service = FriendService::with_dependencies(friend_repo, user_repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(session_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(chat_service.clone()))
            .app_data(path_config())
            .service(health_check)
            .configure(api_configure)
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware::Logger, App, HttpServer};
use dotenv::dotenv;

use escolar_api::config::Config;
use escolar_api::{configure_service, ensure_admin, init_logging};
use escolar_db::connection::create_connection_pool;
use escolar_db::run_migrations;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    init_logging();

    let config = Config::from_env();
    let pool = create_connection_pool();
    run_migrations(&pool);
    ensure_admin(&config, &pool);

    let bind_addr = config.bind_addr.clone();
    log::info!("escolar-api listening on {}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .data(pool.clone())
            .data(config.clone())
            .configure(configure_service)
    })
    .bind(&bind_addr)?
    .run()
    .await
}

mod cors;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    HttpServer::new(move || {
        let burst = config_data.burst.clone();
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .wrap(limiter::global_middleware(config_data.global_rate_limit)) // process-wide ceiling
            .wrap(logger::middleware()) // 3rd
            .wrap(extractor::middleware()) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(
                web::scope("/api")
                    .service(api_subs::mount_subs())
                    .service(api_usage::mount_usage())
                    .service(
                        api_courses::mount_courses()
                            .wrap(limiter::burst_middleware(burst.max, burst.window_ms)),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}

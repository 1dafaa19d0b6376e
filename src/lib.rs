pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use db::{create_pool, DbPool};

use handlers::{catalog, delivery_points, orders};
use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> std::io::Result<()> {
    let mut conn = pool.get().map_err(std::io::Error::other)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(std::io::Error::other)?;
    if !applied.is_empty() {
        log::info!("applied {} migration(s)", applied.len());
    }
    Ok(())
}

fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(orders::create_order))
            .route("", web::get().to(orders::list_orders))
            .route("/quote", web::post().to(orders::quote_order))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}", web::put().to(orders::update_order)),
    )
    .service(
        web::scope("/shops")
            .route("", web::post().to(catalog::create_shop))
            .route("/{id}", web::get().to(catalog::get_shop))
            .route("/{id}/default", web::post().to(catalog::set_default_shop)),
    )
    .route("/coupons", web::post().to(catalog::create_coupon))
    .service(
        web::resource("/settings/service-fee")
            .route(web::get().to(catalog::get_service_fee))
            .route(web::put().to(catalog::set_service_fee)),
    )
    .service(
        web::scope("/delivery-points")
            .route("", web::post().to(delivery_points::create_delivery_point))
            .route("/nearest", web::get().to(delivery_points::nearest_delivery_points))
            .route(
                "/{id}/active",
                web::put().to(delivery_points::set_delivery_point_active),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `config.host:config.port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(pool: DbPool, config: &AppConfig) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState::new(pool, config.default_service_fee.clone()));
    let openapi = openapi::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((config.host.clone(), config.port))?
    .run())
}

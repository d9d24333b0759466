pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::{OrderService, SharedOrderService};
use config::Config;
use domain::ports::{ImageStore, OrderRepository};
use errors::StartupError;
use infrastructure::cloudinary::CloudinaryImageStore;
use infrastructure::memory_repo::InMemoryOrderRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), StartupError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StartupError::Migrations(e.to_string()))?;
    Ok(())
}

/// Shared handles injected into every request.
#[derive(Clone)]
pub struct AppState {
    pub orders: web::Data<SharedOrderService>,
    pub images: web::Data<dyn ImageStore>,
}

impl AppState {
    pub fn new(repo: Arc<dyn OrderRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self {
            orders: web::Data::new(OrderService::new(repo)),
            images: web::Data::from(images),
        }
    }

    /// Connects to Postgres (running migrations) when `DATABASE_URL` is set,
    /// otherwise falls back to the in-memory store.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let repo: Arc<dyn OrderRepository> = match &config.database_url {
            Some(url) => {
                let pool = create_pool(url)?;
                run_migrations(&pool)?;
                Arc::new(DieselOrderRepository::new(pool))
            }
            None => {
                log::warn!("DATABASE_URL is not set; orders are kept in memory only");
                Arc::new(InMemoryOrderRepository::new())
            }
        };
        let images = Arc::new(CloudinaryImageStore::new(config.cloudinary.clone())?);

        Ok(Self::new(repo, images))
    }
}

/// Registers shared state and every route. Used by the server and by tests.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    use handlers::{images, orders};

    cfg.app_data(state.orders.clone())
        .app_data(state.images.clone())
        .route("/upload-image", web::post().to(images::upload_image))
        .service(
            web::scope("/orders")
                .route("", web::post().to(orders::create_order))
                .route("", web::get().to(orders::list_orders))
                .route("/{order_id}", web::get().to(orders::get_order))
                .route("/{order_id}", web::put().to(orders::update_order))
                .route("/{order_id}", web::delete().to(orders::delete_order)),
        );
}

/// Any origin, method and header is allowed, credentials included.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let api_doc = openapi::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(Logger::default())
            .configure(|cfg| configure(cfg, &state))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", api_doc.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}

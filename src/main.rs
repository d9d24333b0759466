use dotenvy::dotenv;
use order_desk::config::Config;
use order_desk::{build_server, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}

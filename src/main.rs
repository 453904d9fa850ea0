mod config;
mod error;
mod json;
mod routes;
mod utils;
mod ytdlp_download;

pub struct State {
    pub config: config::Config,
}

pub fn app(state: std::sync::Arc<State>) -> axum::Router {
    // Any website may embed the downloader
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    axum::Router::new()
        .route("/youtube", axum::routing::post(routes::post_youtube))
        .layer(tower::ServiceBuilder::new().layer(cors))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c, running until killed: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

#[tokio::main]
async fn main() {
    // Load .env first so it can also set RUST_LOG
    let dotenv_result = dotenv::dotenv();
    env_logger::init();
    if let Err(e) = dotenv_result {
        log::debug!("not loading .env: {}", e);
    }

    let config = config::Config::from_env().expect("invalid configuration");
    log::info!(
        "listening on {}, downloader `{}`, timeout {:?}, workspaces in {}",
        config.bind,
        config.ytdlp.join(" "),
        config.timeout,
        config.workspace_dir.display(),
    );
    let bind = config.bind;
    let state = std::sync::Arc::new(State { config });

    axum::Server::try_bind(&bind)
        .expect("failed to open HTTP server")
        .serve(app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("failed to run HTTP server");
}

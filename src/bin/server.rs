use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wildfire::RunReport;
use wildfire::config::Config;
use wildfire::rng::seed_from_clock;

#[derive(Deserialize)]
struct SimulateRequest {
    #[serde(default)]
    config: Config,
    seed: Option<u64>,
    frames: Option<bool>,
}

#[derive(Deserialize)]
struct TextParams {
    seed: Option<u64>,
    frames: Option<bool>,
}

#[derive(Serialize, Debug)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult = Result<Json<RunReport>, ApiError>;

fn api_error(status: StatusCode, error: String) -> ApiError {
    warn!(%status, "rejected request: {error}");
    (status, Json(ErrorBody { error }))
}

/// Simulations are CPU-bound, so they run on the blocking pool.
async fn run(config: Config, seed: Option<u64>, frames: Option<bool>) -> ApiResult {
    let seed = seed.unwrap_or_else(seed_from_clock);
    let keep_frames = frames.unwrap_or(true);
    tokio::task::spawn_blocking(move || wildfire::simulate(&config, seed, keep_frames))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map(Json)
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

async fn simulate_handler(Json(req): Json<SimulateRequest>) -> ApiResult {
    run(req.config, req.seed, req.frames).await
}

/// Same as `simulate_handler` but the body is the `KEY=value` config format.
async fn simulate_text_handler(Query(params): Query<TextParams>, body: String) -> ApiResult {
    let (config, warnings) = Config::parse(&body);
    if !warnings.is_empty() {
        info!(count = warnings.len(), "config text had warnings");
    }
    run(config, params.seed, params.frames).await
}

fn app() -> Router {
    Router::new()
        .route("/api/simulate", post(simulate_handler))
        .route("/api/simulate/text", post(simulate_text_handler))
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wildfire=info,server=info")),
        )
        .init();

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("wildfire server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app()).await?;
    Ok(())
}

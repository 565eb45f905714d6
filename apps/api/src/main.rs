mod config;
mod errors;
mod routes;
mod screening;
mod state;
mod text_extraction;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::screening::collaborators::{RegionPhoneMatcher, StaticGazetteer};
use crate::screening::extractor::AttributeExtractor;
use crate::screening::pipeline::ScreeningPipeline;
use crate::screening::scoring::ScoreCalculator;
use crate::state::AppState;
use crate::text_extraction::PdfTextExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Bias policy: {:?} (threshold {}), phone region: {:?}",
        config.bias_policy.kind, config.bias_policy.threshold, config.phone_region
    );

    let extractor = AttributeExtractor::new(
        Arc::new(RegionPhoneMatcher::new(config.phone_region)),
        Arc::new(StaticGazetteer),
    );
    let pipeline = ScreeningPipeline::new(
        Arc::new(PdfTextExtractor::new(config.max_concurrent_parses)),
        extractor,
        ScoreCalculator::default(),
        config.bias_policy,
        config.extraction_timeout,
    );
    info!(
        "Screening pipeline ready ({} scoring rules, {}s extraction timeout, {} parallel parses)",
        pipeline.scorer().rules().len(),
        config.extraction_timeout.as_secs(),
        config.max_concurrent_parses
    );

    let state = AppState {
        config: config.clone(),
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

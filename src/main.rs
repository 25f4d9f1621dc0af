//! IELTS Maestro · Exam Practice Backend
//!
//! - Axum HTTP API (writing/reading/listening generation + assessment)
//! - Optional Anthropic integration (via environment variables)
//! - Optional MongoDB persistence for attempt counters and assessments
//!
//! Important env variables:
//!   PORT              : u16 (default 8080)
//!   ANTHROPIC_API_KEY : enables model-generated content if present
//!   ANTHROPIC_BASE_URL: default "https://api.anthropic.com"
//!   ANTHROPIC_MODEL   : default "claude-3-opus-20240229"
//!   MONGODB_URI       : enables persistence if present
//!   MONGODB_DB        : default "ielts_maestro"
//!   PROMPT_CONFIG_PATH: path to TOML config overriding the built-in prompts
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod seeds;
mod extract;
mod anthropic;
mod store;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (prompts, Anthropic client, store).
  let state = Arc::new(AppState::new().await);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 8080.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "maestro_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}

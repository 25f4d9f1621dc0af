//! Application state: prompts, the Anthropic client, and the MongoDB store.
//!
//! Both collaborators are optional so the server always comes up: without an
//! API key every generation serves fallback content, and without a database
//! counters degrade to best-effort defaults.

use tracing::{info, instrument};

use crate::anthropic::Claude;
use crate::config::{load_prompt_config_from_env, Prompts};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub claude: Option<Claude>,
    pub store: Option<Store>,
    pub prompts: Prompts,
}

impl AppState {
    /// Build state from env: load prompt config, init the Anthropic client,
    /// connect the store.
    #[instrument(level = "info", skip_all)]
    pub async fn new() -> Self {
        let prompts = load_prompt_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let claude = Claude::from_env();
        match &claude {
            Some(c) => {
                info!(target: "maestro_backend", base_url = %c.base_url, model = %c.model, "Anthropic API enabled.")
            }
            None => {
                info!(target: "maestro_backend", "Anthropic API disabled (no ANTHROPIC_API_KEY). Serving fallback content.")
            }
        }

        let store = Store::connect_from_env().await;
        if store.is_none() {
            info!(target: "maestro_backend", "Persistence disabled (no MONGODB_URI or connection failed). Counters are best-effort.");
        }

        Self { claude, store, prompts }
    }
}

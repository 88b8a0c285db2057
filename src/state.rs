//! Application state: document store, chat client, prompts, and topic bank.
//!
//! Built once at startup and passed into every handler through axum `State`,
//! so tests can assemble the same struct around fakes.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{load_agent_config_from_env, Prompts};
use crate::domain::Topic;
use crate::error::AppError;
use crate::openai::{ChatApi, OpenAI};
use crate::seeds::seed_topics;
use crate::store::DocStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocStore>,
    pub chat: Option<Arc<dyn ChatApi>>,
    pub prompts: Prompts,
    pub topics: Vec<Topic>,
}

impl AppState {
    /// Build state from env: load config, pick the topic bank, init OpenAI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        // Load TOML config if provided (prompts + optional topic bank).
        let cfg_opt = load_agent_config_from_env();
        let prompts = cfg_opt
            .as_ref()
            .map(|c| c.prompts.clone())
            .unwrap_or_default();
        let topics = cfg_opt
            .as_ref()
            .filter(|c| !c.topics.is_empty())
            .map(|c| c.topics.clone())
            .unwrap_or_else(seed_topics);
        info!(target: "content", topic_count = topics.len(), "Bulk topic bank ready");

        // Build optional OpenAI client (if API key present).
        let openai = OpenAI::from_env();
        match &openai {
            Some(oa) => {
                info!(target: "mathquest_backend", base_url = %oa.base_url, fast_model = %oa.fast_model, strong_model = %oa.strong_model, "OpenAI enabled.");
            }
            None => {
                warn!(target: "mathquest_backend", "OpenAI disabled (no OPENAI_API_KEY); model-backed endpoints will fail.");
            }
        }

        Self {
            store: Arc::new(DocStore::new()),
            chat: openai.map(|oa| Arc::new(oa) as Arc<dyn ChatApi>),
            prompts,
            topics,
        }
    }

    /// The chat client, or the defined "not configured" error.
    pub fn chat(&self) -> Result<&Arc<dyn ChatApi>, AppError> {
        self.chat.as_ref().ok_or(AppError::ModelUnavailable)
    }
}

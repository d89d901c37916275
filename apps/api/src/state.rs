use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::scrape::JobFetcher;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Default generator, built from the configured region and profile.
    /// Sessions with their own AWS settings carry a separate one.
    pub llm: Arc<dyn TextGenerator>,
    pub fetcher: JobFetcher,
    pub sessions: SessionStore,
}

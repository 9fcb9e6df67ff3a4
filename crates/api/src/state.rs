use std::sync::Arc;

use storyreel_pipeline::Orchestrator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the orchestrator shares its store, clients and task
/// tracker internally.
#[derive(Clone)]
pub struct AppState {
    /// Drives every story, shot and asset operation.
    pub orchestrator: Orchestrator,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

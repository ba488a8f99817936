//! HTTP/SSE surface for the browser UI

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::runtime::ProductionRuntime;
use std::sync::Arc;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ProductionRuntime>,
}

impl AppState {
    pub fn new(runtime: Arc<ProductionRuntime>) -> Self {
        Self { runtime }
    }
}

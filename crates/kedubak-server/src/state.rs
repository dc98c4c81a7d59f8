use std::sync::Arc;

use kedubak_store::{PostStore, UserStore};

use crate::config::ServerConfig;

/// Shared application state. The stores are constructed once at startup and
/// injected here; handlers never touch a global client handle.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            users,
            posts,
            config: Arc::new(config),
        }
    }
}

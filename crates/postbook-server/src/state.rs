use std::sync::Arc;

use postbook_store::Blog;

use crate::config::ServerConfig;

/// Shared application state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub blog: Blog,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(blog: Blog, config: ServerConfig) -> Self {
        Self {
            blog,
            config: Arc::new(config),
        }
    }
}

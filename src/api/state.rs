use std::sync::Arc;

use crate::{
    db::Store,
    services::{Gateway, ModelRegistry, TokenService},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub gateway: Gateway,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, registry: ModelRegistry, tokens: TokenService) -> Self {
        let gateway = Gateway::new(Arc::new(registry), store.clone());
        Self {
            store,
            gateway,
            tokens,
        }
    }
}

use std::sync::Arc;

use crate::{config::AppConfig, pdf::PdfRenderer, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub renderer: Arc<PdfRenderer>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig, renderer: Arc<PdfRenderer>) -> Self {
        Self {
            store,
            config: Arc::new(config),
            renderer,
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

use std::sync::Arc;

use crate::visit::VisitSink;
use unfurl_service::LinkResolver;

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<dyn LinkResolver>,
    visits: Arc<dyn VisitSink>,
    base_url: String,
}

impl AppState {
    pub fn new(
        resolver: Arc<dyn LinkResolver>,
        visits: Arc<dyn VisitSink>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            visits,
            base_url: public_base_url.into(),
        }
    }

    pub fn resolver(&self) -> &Arc<dyn LinkResolver> {
        &self.resolver
    }

    pub fn visits(&self) -> &Arc<dyn VisitSink> {
        &self.visits
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

use async_trait::async_trait;
use std::sync::Arc;

/// Best-effort visit telemetry.
///
/// Sinks run off the request path via [`record_detached`]; a slow or
/// failing sink must never block or fail the response being served.
#[async_trait]
pub trait VisitSink: Send + Sync + 'static {
    async fn record(&self, short_id: &str, user_agent: Option<&str>);
}

/// Default sink: structured log lines only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogVisitSink;

#[async_trait]
impl VisitSink for LogVisitSink {
    async fn record(&self, short_id: &str, user_agent: Option<&str>) {
        tracing::info!(short_id, user_agent = user_agent.unwrap_or("-"), "visit");
    }
}

/// Fire-and-forget dispatch to a sink.
pub fn record_detached(sink: Arc<dyn VisitSink>, short_id: String, user_agent: Option<String>) {
    tokio::spawn(async move {
        sink.record(&short_id, user_agent.as_deref()).await;
    });
}

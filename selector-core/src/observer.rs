use tracing::info;
use tracing::warn;

/// Receives the diagnostics produced while reparsing and resolving.
pub trait SelectorObserver: Send + Sync {
    fn on_info(&self, message: &str);
    fn on_warning(&self, message: &str);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SelectorObserver for TracingObserver {
    fn on_info(&self, message: &str) {
        info!(target: "prompt_selector", "{message}");
    }

    fn on_warning(&self, message: &str) {
        warn!(target: "prompt_selector", "{message}");
    }
}

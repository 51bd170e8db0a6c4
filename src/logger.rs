/// Logging port consumed by the import service. Implementations must be safe
/// for concurrent use; the service only ever reads through a shared handle.
pub trait Logger: Send + Sync {
    fn debug(&self, scope: &str, message: &str);
    fn info(&self, scope: &str, message: &str);
    fn warn(&self, scope: &str, message: &str);
    fn error(&self, scope: &str, message: &str);
}

/// Adapter forwarding to the `tracing` ecosystem. The subscriber itself is
/// installed by the binary, not here.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, scope: &str, message: &str) {
        tracing::debug!(scope, "{message}");
    }

    fn info(&self, scope: &str, message: &str) {
        tracing::info!(scope, "{message}");
    }

    fn warn(&self, scope: &str, message: &str) {
        tracing::warn!(scope, "{message}");
    }

    fn error(&self, scope: &str, message: &str) {
        tracing::error!(scope, "{message}");
    }
}

/// Discards everything. Useful for embedders and tests that do not care
/// about log output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _scope: &str, _message: &str) {}
    fn info(&self, _scope: &str, _message: &str) {}
    fn warn(&self, _scope: &str, _message: &str) {}
    fn error(&self, _scope: &str, _message: &str) {}
}

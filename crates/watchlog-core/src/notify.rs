//! User-facing notification seam.
//!
//! Session expiry and swallowed passthrough failures are surfaced to the
//! user, not propagated as errors. Consumers inject their own presentation
//! (the CLI prints to stderr); the default forwards to the `tracing` log.

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Warning,
    Error,
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Notice, message: &str);
}

/// Default notifier that forwards notices to the `tracing` log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: Notice, message: &str) {
        match level {
            Notice::Info => tracing::info!("{message}"),
            Notice::Warning => tracing::warn!("{message}"),
            Notice::Error => tracing::error!("{message}"),
        }
    }
}

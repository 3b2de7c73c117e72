//! Operator-facing diagnostics.
//!
//! The consultant never surfaces errors to its caller. Failures are turned
//! into fallback replies and reported to a [`DiagnosticSink`] instead, so
//! operators can still find out what went wrong.

use std::sync::Arc;

use devflow_model::ErrorKind;

/// A failure the consultant recovered from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticEvent {
    /// No API key is configured, the request was not sent.
    MissingCredential,
    /// The model provider returned an error.
    RequestFailed {
        /// The kind reported by the provider.
        kind: ErrorKind,
        /// The provider's error message.
        message: String,
    },
}

/// Receives diagnostic events.
pub trait DiagnosticSink: Send + Sync + 'static {
    /// Records one event.
    fn record(&self, event: DiagnosticEvent);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    #[inline]
    fn record(&self, event: DiagnosticEvent) {
        (**self).record(event)
    }
}

/// The default sink, which writes events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::MissingCredential => {
                warn!("no API key configured, consultation unavailable");
            }
            DiagnosticEvent::RequestFailed { kind, message } => {
                error!(%kind, "consultation request failed: {message}");
            }
        }
    }
}

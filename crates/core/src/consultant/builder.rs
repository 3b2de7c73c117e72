use std::sync::Arc;

use devflow_model::ModelProvider;

use super::Consultant;
use crate::diagnostics::{DiagnosticSink, TracingSink};

/// [`Consultant`] builder.
pub struct ConsultantBuilder<F> {
    connect: F,
    api_key: Option<Arc<str>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl<P, F> ConsultantBuilder<F>
where
    P: ModelProvider + 'static,
    F: Fn(&str) -> P + Send + Sync + 'static,
{
    /// Creates a new builder with the function that builds a model
    /// provider from an API key.
    ///
    /// The connector is invoked once per consultation, and only when an
    /// API key is present.
    #[inline]
    pub fn with_connector(connect: F) -> Self {
        Self {
            connect,
            api_key: None,
            sink: None,
        }
    }

    /// Sets the API key. A blank key counts as no key at all.
    #[inline]
    pub fn with_api_key<S: AsRef<str>>(mut self, api_key: S) -> Self {
        let api_key = api_key.as_ref().trim();
        self.api_key = (!api_key.is_empty()).then(|| Arc::from(api_key));
        self
    }

    /// Replaces the default [`TracingSink`].
    #[inline]
    pub fn with_diagnostics<S: DiagnosticSink>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Builds the consultant.
    #[inline]
    pub fn build(self) -> Consultant {
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        Consultant::new(self.api_key, self.connect, sink)
    }
}

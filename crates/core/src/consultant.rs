//! The consultant: turns a visitor's message into a reply to display.

mod builder;

use std::pin::Pin;
use std::sync::Arc;

use devflow_model::{
    ModelMessage, ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};
use tracing::Instrument;

pub use builder::ConsultantBuilder;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};

/// The fixed instruction sent with every request.
pub const PERSONA_INSTRUCTION: &str = include_str!("./persona.md");

/// The fixed sampling temperature.
pub const TEMPERATURE: f32 = 0.7;

/// Returned when no API key is configured.
pub const FALLBACK_UNAVAILABLE: &str = "Der KI-Berater ist derzeit nicht verfügbar. Bitte kontaktieren Sie uns direkt per E-Mail.";

/// Returned when the request fails.
pub const FALLBACK_TECHNICAL_ERROR: &str = "Es gab ein technisches Problem. Bitte kontaktieren Sie uns direkt per E-Mail.";

/// Returned when the model answers without any text.
pub const FALLBACK_EMPTY_REPLY: &str = "Entschuldigung, ich konnte keine Antwort generieren. Bitte versuchen Sie es später erneut.";

type ConnectResult = Result<ModelReply, Box<dyn ModelProviderError>>;
type BoxedConnectFuture = Pin<Box<dyn Future<Output = ConnectResult> + Send>>;
type ConnectFn =
    Arc<dyn Fn(&str, ModelRequest) -> BoxedConnectFuture + Send + Sync>;

/// Anything that turns a visitor's message into a reply to display.
///
/// Implementations must always resolve to some text, failures included.
pub trait Consult: Send + Sync + 'static {
    /// Produces the reply for `user_message`.
    ///
    /// The returned future must be independent of `self`.
    fn consult(
        &self,
        user_message: &str,
    ) -> impl Future<Output = String> + Send + 'static;
}

/// Forwards visitor messages to a hosted model and normalizes every
/// outcome into a displayable string.
///
/// The model provider is not created up front. Each consultation checks the
/// credential first and only then builds a provider through the connector,
/// so a missing credential is an ordinary outcome rather than a setup
/// failure.
#[derive(Clone)]
pub struct Consultant {
    api_key: Option<Arc<str>>,
    connect_fn: ConnectFn,
    sink: Arc<dyn DiagnosticSink>,
}

impl Consultant {
    fn new<P, F>(
        api_key: Option<Arc<str>>,
        connect: F,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self
    where
        P: ModelProvider + 'static,
        F: Fn(&str) -> P + Send + Sync + 'static,
    {
        // Erase `P` so that `Consultant` stays a plain, clonable type.
        let connect_fn: ConnectFn = Arc::new(
            move |api_key: &str, req: ModelRequest| -> BoxedConnectFuture {
                let provider = connect(api_key);
                let fut = provider.send_request(&req);
                Box::pin(async move {
                    fut.await.map_err(|err| {
                        Box::new(err) as Box<dyn ModelProviderError>
                    })
                })
            },
        );
        Self {
            api_key,
            connect_fn,
            sink,
        }
    }

    /// Returns whether an API key is configured.
    #[inline]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Asks the model about `user_message`.
    ///
    /// This never fails: every error is reported to the diagnostic sink and
    /// replaced by one of the fallback texts.
    pub fn consult(
        &self,
        user_message: &str,
    ) -> impl Future<Output = String> + Send + 'static {
        let api_key = self.api_key.clone();
        let connect_fn = Arc::clone(&self.connect_fn);
        let sink = Arc::clone(&self.sink);
        let req = create_request(user_message);

        async move {
            let Some(api_key) = api_key else {
                sink.record(DiagnosticEvent::MissingCredential);
                return FALLBACK_UNAVAILABLE.to_owned();
            };

            trace!("sending request: {req:?}");
            let reply = match connect_fn(&*api_key, req).await {
                Ok(reply) => reply,
                Err(err) => {
                    sink.record(DiagnosticEvent::RequestFailed {
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                    return FALLBACK_TECHNICAL_ERROR.to_owned();
                }
            };

            match reply.usable_text() {
                Some(text) => text.to_owned(),
                None => {
                    debug!(
                        "model replied without text: {:?}",
                        reply.finish_reason
                    );
                    FALLBACK_EMPTY_REPLY.to_owned()
                }
            }
        }
        .instrument(trace_span!("consult"))
    }
}

impl Consult for Consultant {
    #[inline]
    fn consult(
        &self,
        user_message: &str,
    ) -> impl Future<Output = String> + Send + 'static {
        Consultant::consult(self, user_message)
    }
}

#[inline]
fn create_request(user_message: &str) -> ModelRequest {
    ModelRequest {
        messages: vec![
            ModelMessage::System(PERSONA_INSTRUCTION.to_owned()),
            ModelMessage::User(user_message.to_owned()),
        ],
        temperature: Some(TEMPERATURE),
    }
}

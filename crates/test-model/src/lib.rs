//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use devflow_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Shared {
    script: VecDeque<PresetReply>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should answer the upcoming requests. Each request consumes one
/// reply in order. If the script runs out, the request fails.
///
/// Clones share the same script and request log, so a provider built per
/// request from a cloned template still observes every request.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    shared: Arc<Mutex<Shared>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Appends a reply to the script.
    #[inline]
    pub fn add_reply(&mut self, preset: PresetReply) {
        self.lock().script.push_back(preset);
    }

    /// Sets how long each request takes before it answers. Defaults to
    /// one millisecond.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns how many requests have been sent so far.
    #[inline]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Returns a copy of every request received so far.
    #[inline]
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        // A panicking test may poison the lock; the data is still usable.
        self.shared.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let shared = self.lock();
        f.debug_struct("TestModelProvider")
            .field("remaining", &shared.script.len())
            .field("requests", &shared.requests.len())
            .field("delay", &self.delay)
            .finish()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let preset = {
            let mut shared = self.lock();
            shared.requests.push(req.clone());
            shared.script.pop_front()
        };
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;
            match preset {
                Some(PresetReply::Text(text)) => Ok(ModelReply::with_text(text)),
                Some(PresetReply::Empty) => Ok(ModelReply::default()),
                Some(PresetReply::Failure(message)) => Err(Error {
                    message,
                    kind: ErrorKind::Other,
                }),
                Some(PresetReply::RateLimited) => Err(Error {
                    message: "rate limited".to_owned(),
                    kind: ErrorKind::RateLimitExceeded,
                }),
                None => Err(Error {
                    message: "no enough replies".to_owned(),
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}

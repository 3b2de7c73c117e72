use std::sync::Arc;

use super::{BoxedReplyFuture, ConsultFn, IdleFn, TranscriptFn, Widget};
use crate::consultant::Consult;
use crate::conversation::{ChatMessage, GREETING};

/// [`Widget`] builder.
pub struct WidgetBuilder {
    pub(crate) consult_fn: ConsultFn,
    pub(crate) greeting: String,
    pub(crate) on_transcript: Option<TranscriptFn>,
    pub(crate) on_idle: Option<IdleFn>,
}

impl WidgetBuilder {
    /// Creates a new builder that sends submissions to `consultant`.
    #[inline]
    pub fn with_consultant<C: Consult>(consultant: C) -> Self {
        let consult_fn: ConsultFn = Arc::new(move |text: String| {
            Box::pin(consultant.consult(&text)) as BoxedReplyFuture
        });
        Self {
            consult_fn,
            greeting: GREETING.to_owned(),
            on_transcript: None,
            on_idle: None,
        }
    }

    /// Replaces the greeting the transcript starts with.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Attaches a callback invoked with every message appended to the
    /// transcript, which is where a view scrolls to the newest message.
    #[inline]
    pub fn on_transcript(
        mut self,
        on_transcript: impl Fn(&ChatMessage) + Send + Sync + 'static,
    ) -> Self {
        self.on_transcript = Some(Box::new(on_transcript));
        self
    }

    /// Attaches a callback invoked when a reply has been appended and the
    /// widget accepts input again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Mounts the widget. It starts closed.
    ///
    /// Must be called within a tokio runtime.
    #[inline]
    pub fn build(self) -> Widget {
        Widget::mount(self)
    }
}

mod builder;
mod state;

use std::error::Error;
use std::fmt::{self, Debug};
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

pub use builder::WidgetBuilder;
use state::WidgetState;
pub use state::{WidgetSnapshot, WidgetStage, WidgetView};

use crate::conversation::ChatMessage;

type BoxedReplyFuture = Pin<Box<dyn Future<Output = String> + Send>>;
type ConsultFn = Arc<dyn Fn(String) -> BoxedReplyFuture + Send + Sync>;
type TranscriptFn = Box<dyn Fn(&ChatMessage) + Send + Sync>;
type IdleFn = Box<dyn Fn() + Send + Sync>;

/// Returned when talking to a widget that has been unmounted.
pub struct UnmountedError;

impl Debug for UnmountedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnmountedError").finish()
    }
}

impl fmt::Display for UnmountedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the widget has been unmounted")
    }
}

impl Error for UnmountedError {}

#[derive(Debug)]
enum Command {
    Open,
    Close,
    SetInput(String),
    Submit,
    ReplyReceived(String),
    Snapshot(oneshot::Sender<WidgetSnapshot>),
    Unmount,
}

/// A mounted consultation widget.
///
/// The widget state lives in its own task and is only changed by commands
/// sent through this handle, one at a time and in order. Commands that
/// don't apply to the current stage (submitting while closed, a blank
/// input, or a reply still pending) are dropped silently.
///
/// Replies are applied even if the widget was closed in the meantime. They
/// are discarded once the widget is unmounted, or when every handle has
/// been dropped.
#[derive(Clone)]
pub struct Widget {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl Widget {
    /// Shows the widget.
    #[inline]
    pub fn open(&self) -> Result<(), UnmountedError> {
        self.send(Command::Open)
    }

    /// Hides the widget. A pending consultation keeps running.
    #[inline]
    pub fn close(&self) -> Result<(), UnmountedError> {
        self.send(Command::Close)
    }

    /// Replaces the composer text.
    #[inline]
    pub fn set_input<S: Into<String>>(
        &self,
        input: S,
    ) -> Result<(), UnmountedError> {
        self.send(Command::SetInput(input.into()))
    }

    /// Submits the composer text.
    #[inline]
    pub fn submit(&self) -> Result<(), UnmountedError> {
        self.send(Command::Submit)
    }

    /// Types `message` into the composer and submits it.
    #[inline]
    pub fn send_message<S: Into<String>>(
        &self,
        message: S,
    ) -> Result<(), UnmountedError> {
        self.set_input(message)?;
        self.submit()
    }

    /// Returns the state after every command sent before this call has
    /// been handled.
    pub async fn snapshot(&self) -> Result<WidgetSnapshot, UnmountedError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| UnmountedError)
    }

    /// Destroys the widget along with its transcript.
    ///
    /// Commands sent earlier are still handled, later ones fail.
    #[inline]
    pub fn unmount(&self) {
        self.send(Command::Unmount).ok();
    }

    #[inline]
    fn send(&self, cmd: Command) -> Result<(), UnmountedError> {
        self.cmd_tx.send(cmd).map_err(|_| UnmountedError)
    }

    fn mount(builder: WidgetBuilder) -> Self {
        let WidgetBuilder {
            consult_fn,
            greeting,
            on_transcript,
            on_idle,
        } = builder;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let task = WidgetTask {
            state: WidgetState::new(greeting),
            consult_fn,
            on_transcript,
            on_idle,
            weak_tx: cmd_tx.downgrade(),
        };
        tokio::spawn(task.run(cmd_rx).instrument(trace_span!("widget")));
        Self { cmd_tx }
    }
}

struct WidgetTask {
    state: WidgetState,
    consult_fn: ConsultFn,
    on_transcript: Option<TranscriptFn>,
    on_idle: Option<IdleFn>,
    // Consultations only hold a weak sender, so dropping every `Widget`
    // handle stops the task even with a reply in flight.
    weak_tx: mpsc::WeakUnboundedSender<Command>,
}

impl WidgetTask {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        debug!("mounted");
        while let Some(cmd) = cmd_rx.recv().await {
            trace!("received command: {cmd:?}");
            match cmd {
                Command::Open => self.state.open(),
                Command::Close => self.state.close(),
                Command::SetInput(input) => {
                    if !self.state.set_input(input) {
                        trace!("input ignored while awaiting a reply");
                    }
                }
                Command::Submit => self.submit(),
                Command::ReplyReceived(reply) => self.apply_reply(reply),
                Command::Snapshot(tx) => {
                    tx.send(self.state.snapshot()).ok();
                }
                Command::Unmount => break,
            }
            trace!(stage = ?self.state.stage(), "handled command");
        }
        debug!("unmounted");
    }

    fn submit(&mut self) {
        let Some(msg) = self.state.begin_submit() else {
            trace!("submit ignored");
            return;
        };
        if let Some(on_transcript) = &self.on_transcript {
            on_transcript(msg);
        }

        let fut = (self.consult_fn)(msg.content.clone());
        let weak_tx = self.weak_tx.clone();
        tokio::spawn(
            async move {
                let reply = fut.await;
                let sent = weak_tx
                    .upgrade()
                    .is_some_and(|tx| tx.send(Command::ReplyReceived(reply)).is_ok());
                if !sent {
                    debug!("widget is gone, reply discarded");
                }
            }
            .instrument(trace_span!("consultation")),
        );
    }

    fn apply_reply(&mut self, reply: String) {
        let Some(msg) = self.state.finish_submit(reply) else {
            warn!("received a reply without a pending request");
            return;
        };
        if let Some(on_transcript) = &self.on_transcript {
            on_transcript(msg);
        }
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }
}

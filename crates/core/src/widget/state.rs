use crate::conversation::ChatMessage;

/// The observable stage of a widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WidgetStage {
    /// Nothing is rendered.
    #[default]
    Closed,
    /// The widget is open and accepts input.
    Idle,
    /// The widget is open and waiting for a reply.
    AwaitingReply,
}

#[inline]
fn stage_of(is_open: bool, pending: bool) -> WidgetStage {
    match (is_open, pending) {
        (false, _) => WidgetStage::Closed,
        (true, false) => WidgetStage::Idle,
        (true, true) => WidgetStage::AwaitingReply,
    }
}

/// The state owned by one mounted widget.
#[derive(Clone, Debug)]
pub(crate) struct WidgetState {
    is_open: bool,
    transcript: Vec<ChatMessage>,
    pending: bool,
    input: String,
}

impl WidgetState {
    #[inline]
    pub fn new(greeting: String) -> Self {
        Self {
            is_open: false,
            transcript: vec![ChatMessage::assistant(greeting)],
            pending: false,
            input: String::new(),
        }
    }

    #[inline]
    pub fn open(&mut self) {
        self.is_open = true;
    }

    #[inline]
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Replaces the input buffer. The composer is disabled while a reply is
    /// pending, so edits are dropped then.
    pub fn set_input(&mut self, input: String) -> bool {
        if self.pending {
            return false;
        }
        self.input = input;
        true
    }

    /// Starts a submit cycle and returns the text to consult about.
    ///
    /// Returns `None` and leaves the state untouched if the widget is
    /// closed, a reply is pending, or the input is blank.
    pub fn begin_submit(&mut self) -> Option<&ChatMessage> {
        if !self.is_open || self.pending {
            return None;
        }
        let text = self.input.trim();
        if text.is_empty() {
            return None;
        }
        let msg = ChatMessage::user(text);
        self.input.clear();
        self.transcript.push(msg);
        self.pending = true;
        self.transcript.last()
    }

    /// Completes the submit cycle with the consultant's reply.
    pub fn finish_submit(&mut self, reply: String) -> Option<&ChatMessage> {
        if !self.pending {
            return None;
        }
        self.transcript.push(ChatMessage::assistant(reply));
        self.pending = false;
        self.transcript.last()
    }

    #[inline]
    pub fn stage(&self) -> WidgetStage {
        stage_of(self.is_open, self.pending)
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            is_open: self.is_open,
            transcript: self.transcript.clone(),
            pending: self.pending,
            input: self.input.clone(),
        }
    }
}

/// A copy of the widget's state at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetSnapshot {
    /// Whether the widget is shown.
    pub is_open: bool,
    /// Every message so far, oldest first.
    pub transcript: Vec<ChatMessage>,
    /// Whether a reply is being waited for.
    pub pending: bool,
    /// The uncommitted composer text.
    pub input: String,
}

impl WidgetSnapshot {
    /// Returns what to render, or `None` when the widget is closed.
    #[inline]
    pub fn view(&self) -> Option<WidgetView<'_>> {
        self.is_open.then(|| WidgetView {
            transcript: &self.transcript,
            pending: self.pending,
            input: &self.input,
        })
    }

    /// Returns the stage this snapshot was taken in.
    #[inline]
    pub fn stage(&self) -> WidgetStage {
        stage_of(self.is_open, self.pending)
    }

    /// Whether the send button is enabled.
    #[inline]
    pub fn can_submit(&self) -> bool {
        self.is_open && !self.pending && !self.input.trim().is_empty()
    }
}

/// The renderable part of an open widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetView<'a> {
    /// Messages to render top to bottom.
    pub transcript: &'a [ChatMessage],
    /// Whether to show the typing indicator below the last message.
    pub pending: bool,
    /// The composer text.
    pub input: &'a str,
}

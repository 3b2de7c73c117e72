use devflow_core::{
    ChatMessage, Consult, UnmountedError, Widget, WidgetBuilder,
    WidgetSnapshot,
};

/// Label of the floating button that opens the consultant.
pub const TOGGLE_LABEL: &str = "KI Berater öffnen";

/// A page builder.
///
/// See [`Page`].
pub struct PageBuilder {
    widget_builder: WidgetBuilder,
}

impl PageBuilder {
    /// Creates a page builder whose widget asks `consultant`.
    pub fn with_consultant<C: Consult>(consultant: C) -> Self {
        let widget_builder = WidgetBuilder::with_consultant(consultant);
        Self { widget_builder }
    }

    /// Attaches a callback to be invoked when a message is appended to the
    /// transcript.
    #[inline]
    pub fn on_transcript(
        mut self,
        on_transcript: impl Fn(&ChatMessage) + Send + Sync + 'static,
    ) -> Self {
        self.widget_builder = self.widget_builder.on_transcript(on_transcript);
        self
    }

    /// Attaches a callback to be invoked when a reply has arrived.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.widget_builder = self.widget_builder.on_idle(on_idle);
        self
    }

    /// Builds the page and mounts its widget.
    pub fn build(self) -> Page {
        Page {
            widget: self.widget_builder.build(),
        }
    }
}

/// The page hosting the consultant.
///
/// The page owns the only way to open the widget: the hero's call-to-action
/// and the floating toggle button, which is shown only while the widget is
/// closed.
pub struct Page {
    widget: Widget,
}

impl Page {
    /// Opens the consultant, as the hero call-to-action and the toggle
    /// button do.
    #[inline]
    pub fn open_consultant(&self) -> Result<(), UnmountedError> {
        self.widget.open()
    }

    /// Closes the consultant.
    #[inline]
    pub fn close_consultant(&self) -> Result<(), UnmountedError> {
        self.widget.close()
    }

    /// Submits a message through the widget's form.
    #[inline]
    pub fn send_message(&self, message: &str) -> Result<(), UnmountedError> {
        self.widget.send_message(message)
    }

    /// Returns the current state of the widget.
    #[inline]
    pub async fn snapshot(&self) -> Result<WidgetSnapshot, UnmountedError> {
        self.widget.snapshot().await
    }

    /// Returns the toggle button's label if it should be shown.
    #[inline]
    pub fn toggle_button(snapshot: &WidgetSnapshot) -> Option<&'static str> {
        (!snapshot.is_open).then_some(TOGGLE_LABEL)
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        debug!("page dropped, unmounting the widget");
        self.widget.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use devflow_core::{ConsultantBuilder, Role};
    use devflow_test_model::{PresetReply, TestModelProvider};
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_toggle_button_follows_widget() {
        let page = PageBuilder::with_consultant(
            ConsultantBuilder::with_connector(|_| {
                TestModelProvider::default()
            })
            .build(),
        )
        .build();

        let snapshot = page.snapshot().await.unwrap();
        assert_eq!(Page::toggle_button(&snapshot), Some(TOGGLE_LABEL));
        assert!(snapshot.view().is_none());

        page.open_consultant().unwrap();
        let snapshot = page.snapshot().await.unwrap();
        assert_eq!(Page::toggle_button(&snapshot), None);
        assert!(snapshot.view().is_some());

        page.close_consultant().unwrap();
        let snapshot = page.snapshot().await.unwrap();
        assert_eq!(Page::toggle_button(&snapshot), Some(TOGGLE_LABEL));
    }

    #[tokio::test]
    async fn test_send_message() {
        let mut provider = TestModelProvider::default();
        provider.add_reply(PresetReply::text("Eine Landingpage reicht oft."));
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let page = PageBuilder::with_consultant(
            ConsultantBuilder::with_connector(move |_| provider.clone())
                .with_api_key("key")
                .build(),
        )
        .on_transcript(move |msg| {
            event_tx.send(msg.clone()).ok();
        })
        .build();

        page.open_consultant().unwrap();
        page.send_message("Brauche ich einen Onlineshop?").unwrap();

        let first = timeout(Duration::from_millis(500), event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.role, Role::User);
        let second = timeout(Duration::from_millis(500), event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.role, Role::Assistant);
        assert_eq!(second.content, "Eine Landingpage reicht oft.");
    }
}

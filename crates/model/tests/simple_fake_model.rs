use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use devflow_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelReply,
    ModelRequest,
};
use tokio::time::sleep;

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message back, after a short delay.
struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let input = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        async move {
            sleep(Duration::from_millis(1)).await;
            let Some(input) = input else {
                return Err(FakeModelProviderError(ErrorKind::Other));
            };
            Ok(ModelReply::with_text(format!("Sie sagten: {input}")))
        }
    }
}

#[tokio::test]
async fn test_completion() {
    let provider = FakeModelProvider;
    let req = ModelRequest {
        messages: vec![
            ModelMessage::System("Antworte knapp.".to_string()),
            ModelMessage::User("Guten Morgen".to_string()),
        ],
        temperature: Some(0.7),
    };
    let reply = provider.send_request(&req).await.unwrap();
    assert_eq!(reply.usable_text(), Some("Sie sagten: Guten Morgen"));
}

#[tokio::test]
async fn test_future_outlives_request() {
    let provider = FakeModelProvider;
    let fut = {
        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hallo".to_string())],
            temperature: None,
        };
        provider.send_request(&req)
    };
    let reply = fut.await.unwrap();
    assert_eq!(reply.text.as_deref(), Some("Sie sagten: Hallo"));
}

#[tokio::test]
async fn test_error() {
    let provider = FakeModelProvider;
    let req = ModelRequest::default();
    let err = provider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);
}

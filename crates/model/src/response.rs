use serde::{Deserialize, Serialize};

/// The reason why a model reply has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFinishReason {
    /// The model has finished generating text.
    Stop,
    /// The output hit the token limit.
    MaxTokens,
    /// The output was withheld by a safety filter.
    Safety,
    /// Any other reason reported by the provider.
    Other,
}

/// A complete reply from the model provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelReply {
    /// The reply text. `None` means the model produced no text at all.
    pub text: Option<String>,
    /// The reason the model finished generating, if reported.
    pub finish_reason: Option<ModelFinishReason>,
}

impl ModelReply {
    /// Creates a reply that carries the given text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: Some(ModelFinishReason::Stop),
        }
    }

    /// Returns the reply text if it contains anything besides whitespace.
    #[inline]
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_text() {
        assert_eq!(
            ModelReply::with_text("Guten Tag!").usable_text(),
            Some("Guten Tag!")
        );
        assert_eq!(ModelReply::with_text("  \n").usable_text(), None);
        assert_eq!(ModelReply::default().usable_text(), None);
    }
}

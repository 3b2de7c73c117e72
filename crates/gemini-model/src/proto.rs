use devflow_model::{ModelFinishReason, ModelMessage, ModelReply, ModelRequest};
use serde::{Deserialize, Serialize};

// ----------------------
// Types shared both ways
// ----------------------

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(ToOwned::to_owned),
            parts: vec![Part {
                text: Some(text.to_owned()),
            }],
        }
    }
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(req: &ModelRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: req.messages.iter().filter_map(create_content).collect(),
        system_instruction: req
            .system_instruction()
            .map(|text| Content::text(None, &text)),
        generation_config: req
            .temperature
            .map(|temperature| GenerationConfig { temperature }),
    }
}

#[inline]
fn create_content(msg: &ModelMessage) -> Option<Content> {
    match msg {
        // System messages travel in `systemInstruction`.
        ModelMessage::System(_) => None,
        ModelMessage::User(text) => Some(Content::text(Some("user"), text)),
        ModelMessage::Assistant(text) => {
            Some(Content::text(Some("model"), text))
        }
    }
}

/// Converts a decoded response into a reply.
///
/// Only the first candidate is considered, and its text parts are
/// concatenated. A prompt blocked by the server yields a reply without
/// text rather than an error.
pub fn create_reply(resp: GenerateContentResponse) -> ModelReply {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        let block_reason = resp.prompt_feedback.and_then(|f| f.block_reason);
        if let Some(reason) = &block_reason {
            debug!("prompt blocked: {reason}");
        }
        return ModelReply {
            text: None,
            finish_reason: block_reason.map(|_| ModelFinishReason::Safety),
        };
    };

    let text = candidate.content.and_then(|content| {
        content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .reduce(|mut acc, text| {
                acc.push_str(&text);
                acc
            })
    });
    let finish_reason =
        candidate
            .finish_reason
            .as_deref()
            .map(|reason| match reason {
                "STOP" => ModelFinishReason::Stop,
                "MAX_TOKENS" => ModelFinishReason::MaxTokens,
                "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" => {
                    ModelFinishReason::Safety
                }
                _ => ModelFinishReason::Other,
            });

    ModelReply {
        text,
        finish_reason,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let request = ModelRequest {
            messages: vec![
                ModelMessage::System("Du bist ein Berater.".to_owned()),
                ModelMessage::User("Hallo".to_owned()),
            ],
            temperature: Some(0.5),
        };
        let payload = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(
            payload,
            json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "Hallo" }] }
                ],
                "systemInstruction": {
                    "parts": [{ "text": "Du bist ein Berater." }]
                },
                "generationConfig": { "temperature": 0.5 }
            })
        );
    }

    #[test]
    fn test_create_request_without_options() {
        let request = ModelRequest {
            messages: vec![
                ModelMessage::User("Hallo".to_owned()),
                ModelMessage::Assistant("Guten Tag!".to_owned()),
            ],
            temperature: None,
        };
        let payload = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(
            payload,
            json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "Hallo" }] },
                    { "role": "model", "parts": [{ "text": "Guten Tag!" }] }
                ]
            })
        );
    }

    #[test]
    fn test_create_reply() {
        let resp: GenerateContentResponse = serde_json::from_str(
            include_str!("../fixtures/generate_content_response.json"),
        )
        .unwrap();
        let reply = create_reply(resp);
        assert_eq!(
            reply.text.as_deref(),
            Some(
                "Guten Tag! Gerne helfe ich Ihnen weiter. Um welche Art von Webseite geht es?"
            )
        );
        assert_eq!(reply.finish_reason, Some(ModelFinishReason::Stop));
    }

    #[test]
    fn test_blocked_prompt() {
        let resp: GenerateContentResponse = serde_json::from_str(
            include_str!("../fixtures/blocked_prompt_response.json"),
        )
        .unwrap();
        let reply = create_reply(resp);
        assert_eq!(reply.text, None);
        assert_eq!(reply.finish_reason, Some(ModelFinishReason::Safety));
    }

    #[test]
    fn test_candidate_without_text() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        }))
        .unwrap();
        let reply = create_reply(resp);
        assert_eq!(reply.text, None);
        assert_eq!(reply.finish_reason, Some(ModelFinishReason::MaxTokens));
    }
}

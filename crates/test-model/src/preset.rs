use serde::{Deserialize, Serialize};

/// How the fake model answers one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// Reply with the given text.
    #[serde(rename = "text")]
    Text(String),
    /// Reply successfully, but without any text.
    #[serde(rename = "empty")]
    Empty,
    /// Fail the request with the given message.
    #[serde(rename = "failure")]
    Failure(String),
    /// Fail the request as if rate limited.
    #[serde(rename = "rate_limited")]
    RateLimited,
}

impl PresetReply {
    /// Creates a text reply.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(text.into())
    }

    /// Creates a failing reply.
    #[inline]
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self::Failure(message.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_script() {
        let script: Vec<PresetReply> = serde_json::from_value(json!([
            { "type": "text", "data": "Guten Tag!" },
            { "type": "empty" },
            { "type": "failure", "data": "connection reset" },
        ]))
        .unwrap();
        assert_eq!(
            script,
            vec![
                PresetReply::text("Guten Tag!"),
                PresetReply::Empty,
                PresetReply::failure("connection reset"),
            ]
        );
    }
}

/// A request to be sent to the model provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelRequest {
    /// The input messages.
    pub messages: Vec<ModelMessage>,
    /// Sampling temperature. Providers use their own default when unset.
    pub temperature: Option<f32>,
}

impl ModelRequest {
    /// Returns the concatenated system instructions of this request, or
    /// `None` if there are no system messages.
    pub fn system_instruction(&self) -> Option<String> {
        let mut instruction: Option<String> = None;
        for msg in &self.messages {
            if let ModelMessage::System(text) = msg {
                let buf = instruction.get_or_insert_default();
                if !buf.is_empty() {
                    buf.push_str("\n\n");
                }
                buf.push_str(text);
            }
        }
        instruction
    }
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
    /// An assistant text.
    Assistant(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction() {
        let req = ModelRequest {
            messages: vec![
                ModelMessage::System("Be brief.".to_owned()),
                ModelMessage::User("Hi".to_owned()),
                ModelMessage::System("Answer in German.".to_owned()),
            ],
            temperature: None,
        };
        assert_eq!(
            req.system_instruction().as_deref(),
            Some("Be brief.\n\nAnswer in German.")
        );

        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_owned())],
            temperature: None,
        };
        assert_eq!(req.system_instruction(), None);
    }
}

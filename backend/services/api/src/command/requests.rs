use serde::Deserialize;

pub const NEXT_TICKET_COMMAND: &str = "getnextticket";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandSender {
    #[serde(rename = "aadObjectId")]
    pub aad_object_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Conversation {
    pub id: Option<String>,
}

/// Bot activity as delivered by the chat channel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub text: Option<String>,
    pub from: Option<CommandSender>,
    pub service_url: Option<String>,
    pub conversation: Option<Conversation>,
}

impl CommandRequest {
    pub fn command_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn sender_id(&self) -> Option<&str> {
        self.from
            .as_ref()
            .and_then(|f| f.aad_object_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    pub fn is_next_ticket(&self) -> bool {
        self.command_text()
            .map(|t| t.to_ascii_lowercase().starts_with(NEXT_TICKET_COMMAND))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> CommandRequest {
        serde_json::from_value(serde_json::json!({
            "text": text,
            "from": {"aadObjectId": "00000000-aaaa"},
            "serviceUrl": "https://smba.example.com",
            "conversation": {"id": "conv-1"}
        }))
        .expect("should deserialize")
    }

    #[test]
    fn recognizes_next_ticket_command() {
        assert!(request("getnextticket").is_next_ticket());
        assert!(request("  GetNextTicket please ").is_next_ticket());
        assert!(!request("askRabbit how do I reset MFA").is_next_ticket());
    }

    #[test]
    fn extracts_sender() {
        let req = request("getnextticket");
        assert_eq!(req.sender_id(), Some("00000000-aaaa"));
        assert_eq!(req.conversation.and_then(|c| c.id).as_deref(), Some("conv-1"));
    }

    #[test]
    fn blank_fields_are_missing() {
        let req: CommandRequest =
            serde_json::from_value(serde_json::json!({"text": "  ", "from": {"aadObjectId": ""}}))
                .unwrap();
        assert!(req.command_text().is_none());
        assert!(req.sender_id().is_none());
    }
}

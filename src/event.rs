//! Inbound events as the transport adapter posts them.

use serde::{Deserialize, Serialize};

use crate::participant::{ParticipantId, Video};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Sender {
    pub id: ParticipantId,
    #[serde(default)]
    pub is_bot: bool,
}

/// The message a reply or a choice refers to. `text` is the text or the caption.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReferencedMessage {
    pub message_id: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub video: Option<Video>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoUpload {
    pub handle: String,
    pub key: String,
    /// Seconds.
    pub duration: u32,
}

impl VideoUpload {
    pub fn video(&self) -> Video {
        Video {
            handle: self.handle.clone(),
            key: self.key.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundKind {
    Text {
        message_id: i64,
        text: String,
        #[serde(default)]
        reply_to: Option<ReferencedMessage>,
    },
    Video {
        message_id: i64,
        video: VideoUpload,
    },
    VideoNote {
        message_id: i64,
    },
    OtherMedia {
        message_id: i64,
    },
    Choice {
        callback_id: String,
        data: String,
        #[serde(default)]
        message: Option<ReferencedMessage>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Inbound {
    pub from: Sender,
    #[serde(flatten)]
    pub kind: InboundKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_reply_to_a_video() {
        let event: Inbound = serde_json::from_str(
            r#"{
                "from": {"id": 42},
                "type": "text",
                "message_id": 7,
                "text": "hi!",
                "reply_to": {"message_id": 3, "video": {"handle": "f", "key": "k"}}
            }"#,
        )
        .unwrap();

        assert_eq!(event.from.id, ParticipantId(42));
        assert!(!event.from.is_bot);
        let InboundKind::Text { reply_to: Some(reply_to), .. } = event.kind else {
            panic!("expected a text reply");
        };
        assert_eq!(reply_to.video.unwrap().key, "k");
        assert_eq!(reply_to.text, None);
    }

    #[test]
    fn decodes_a_choice() {
        let event: Inbound = serde_json::from_str(
            r#"{"from": {"id": 1, "is_bot": false}, "type": "choice", "callback_id": "cb", "data": "report"}"#,
        )
        .unwrap();
        assert!(matches!(event.kind, InboundKind::Choice { ref data, message: None, .. } if data == "report"));
    }
}

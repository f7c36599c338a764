//! Actions handed back to the transport, and the choice data it echoes to us.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::participant::{ParticipantId, VisibleId};

/// Data attached to an interactive choice. The transport sends it back
/// verbatim when the choice is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Contact(bool),
    Delete(bool),
    Report,
    Show(VisibleId),
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Callback::Contact(true) => write!(f, "contact_yes"),
            Callback::Contact(false) => write!(f, "contact_no"),
            Callback::Delete(true) => write!(f, "delete_me"),
            Callback::Delete(false) => write!(f, "dont_delete"),
            Callback::Report => write!(f, "report"),
            Callback::Show(visible_id) => write!(f, "show:{visible_id}"),
        }
    }
}

impl FromStr for Callback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "contact_yes" => Callback::Contact(true),
            "contact_no" => Callback::Contact(false),
            "delete_me" => Callback::Delete(true),
            "dont_delete" => Callback::Delete(false),
            "report" => Callback::Report,
            _ => {
                let id = s
                    .strip_prefix("show:")
                    .and_then(|id| id.parse().ok())
                    .ok_or_else(|| format!("unknown choice {s:?}"))?;
                Callback::Show(VisibleId(id))
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub data: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, callback: Callback) -> Self {
        Choice {
            label: label.into(),
            data: callback.to_string(),
        }
    }
}

pub fn yes_no(yes: Callback, no: Callback) -> Vec<Choice> {
    vec![Choice::new("Yes", yes), Choice::new("No", no)]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Text {
        to: ParticipantId,
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reply_to: Option<i64>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        choices: Vec<Choice>,
    },
    Video {
        to: ParticipantId,
        handle: String,
        caption: String,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        choices: Vec<Choice>,
    },
    /// Short acknowledgement of a picked choice.
    Answer {
        callback_id: String,
        text: String,
    },
    ClearChoices {
        to: ParticipantId,
        message_id: i64,
    },
    DeleteMessage {
        to: ParticipantId,
        message_id: i64,
    },
}

impl Outbound {
    pub fn text(to: ParticipantId, text: impl Into<String>) -> Self {
        Outbound::Text {
            to,
            text: text.into(),
            reply_to: None,
            choices: Vec::new(),
        }
    }

    pub fn reply(to: ParticipantId, message_id: i64, text: impl Into<String>) -> Self {
        Outbound::Text {
            to,
            text: text.into(),
            reply_to: Some(message_id),
            choices: Vec::new(),
        }
    }

    pub fn answer(callback_id: &str, text: impl Into<String>) -> Self {
        Outbound::Answer {
            callback_id: callback_id.to_owned(),
            text: text.into(),
        }
    }

    pub fn with_choices(mut self, new: Vec<Choice>) -> Self {
        match &mut self {
            Outbound::Text { choices, .. } | Outbound::Video { choices, .. } => *choices = new,
            _ => {}
        }
        self
    }

    pub fn recipient(&self) -> Option<ParticipantId> {
        match self {
            Outbound::Text { to, .. }
            | Outbound::Video { to, .. }
            | Outbound::ClearChoices { to, .. }
            | Outbound::DeleteMessage { to, .. } => Some(*to),
            Outbound::Answer { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_data_round_trips() {
        for callback in [
            Callback::Contact(true),
            Callback::Contact(false),
            Callback::Delete(true),
            Callback::Delete(false),
            Callback::Report,
            Callback::Show(VisibleId(12345)),
        ] {
            assert_eq!(callback.to_string().parse::<Callback>(), Ok(callback));
        }
    }

    #[test]
    fn unknown_callback_data_is_rejected() {
        assert!("show:".parse::<Callback>().is_err());
        assert!("show:abc".parse::<Callback>().is_err());
        assert!("block".parse::<Callback>().is_err());
    }

    #[test]
    fn text_serializes_without_empty_fields() {
        let json = serde_json::to_value(Outbound::text(ParticipantId(5), "hi")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "to": 5, "text": "hi"}));
    }
}

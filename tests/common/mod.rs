//! Shared helpers: an in-memory bot and shorthand for building events.
#![allow(dead_code)]

use introbot::{
    Bot, Config, Inbound, Outbound, Store,
    event::{InboundKind, ReferencedMessage, Sender, VideoUpload},
    participant::{Participant, ParticipantId, RegistrationState, Video},
};

pub const MODERATOR: ParticipantId = ParticipantId(999);

pub async fn setup_bot() -> Bot {
    let store = Store::in_memory().await.expect("in-memory store");
    Bot::new(store, &Config::with_moderator(MODERATOR))
}

fn from(id: i64) -> Sender {
    Sender {
        id: ParticipantId(id),
        is_bot: false,
    }
}

pub fn text(id: i64, text: &str) -> Inbound {
    Inbound {
        from: from(id),
        kind: InboundKind::Text {
            message_id: 1,
            text: text.to_owned(),
            reply_to: None,
        },
    }
}

pub fn reply(id: i64, text: &str, replied_to: ReferencedMessage) -> Inbound {
    Inbound {
        from: from(id),
        kind: InboundKind::Text {
            message_id: 2,
            text: text.to_owned(),
            reply_to: Some(replied_to),
        },
    }
}

pub fn video(id: i64, key: &str, duration: u32) -> Inbound {
    Inbound {
        from: from(id),
        kind: InboundKind::Video {
            message_id: 3,
            video: VideoUpload {
                handle: format!("file-{key}"),
                key: key.to_owned(),
                duration,
            },
        },
    }
}

pub fn choice(id: i64, data: &str, message: Option<ReferencedMessage>) -> Inbound {
    Inbound {
        from: from(id),
        kind: InboundKind::Choice {
            callback_id: format!("cb-{id}"),
            data: data.to_owned(),
            message,
        },
    }
}

/// The message a presentation of `p` would be, as the transport quotes it back.
pub fn quoted_video(p: &Participant) -> ReferencedMessage {
    ReferencedMessage {
        message_id: 10,
        text: Some(format!("This is {}.", p.name)),
        video: p.video.clone(),
    }
}

pub fn quoted_text(text: &str) -> ReferencedMessage {
    ReferencedMessage {
        message_id: 11,
        text: Some(text.to_owned()),
        video: None,
    }
}

pub async fn send(bot: &Bot, event: Inbound) -> Vec<Outbound> {
    bot.handle(event).await.expect("event handled")
}

/// Name, contact preference and a 10 second video.
pub async fn onboard(bot: &Bot, id: i64, name: &str, can_contact: bool) -> Participant {
    send(bot, text(id, name)).await;
    let data = if can_contact { "contact_yes" } else { "contact_no" };
    send(bot, choice(id, data, None)).await;
    send(bot, video(id, &format!("key-{id}"), 10)).await;

    let p = participant(bot, id).await.expect("registered");
    assert_eq!(p.state(), RegistrationState::FullyOnboarded);
    p
}

pub async fn participant(bot: &Bot, id: i64) -> Option<Participant> {
    bot.store().find(ParticipantId(id)).await.expect("store lookup")
}

/// Texts sent to `to`, in order.
pub fn texts_to(out: &[Outbound], to: i64) -> Vec<String> {
    out.iter()
        .filter_map(|o| match o {
            Outbound::Text { to: t, text, .. } if *t == ParticipantId(to) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

pub fn answers(out: &[Outbound]) -> Vec<String> {
    out.iter()
        .filter_map(|o| match o {
            Outbound::Answer { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Video handles presented to `to`.
pub fn videos_to(out: &[Outbound], to: i64) -> Vec<String> {
    out.iter()
        .filter_map(|o| match o {
            Outbound::Video { to: t, handle, .. } if *t == ParticipantId(to) => Some(handle.clone()),
            _ => None,
        })
        .collect()
}

pub fn handle_of(p: &Participant) -> String {
    p.video.as_ref().map(|v: &Video| v.handle.clone()).unwrap_or_default()
}

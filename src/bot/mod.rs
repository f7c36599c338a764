//! Event dispatch.
//!
//! Each inbound event is handled to completion and turned into a list of
//! outbound actions. Participant mistakes become messages; only store
//! failures escape [`Bot::handle`].

mod choice;
mod command;
mod media;
mod message;
pub(crate) mod prompts;

pub use command::Command;

use tracing::{debug, warn};

use crate::{
    Error, Result,
    config::Config,
    db::Store,
    event::{Inbound, InboundKind},
    identity::Identity,
    matching::Matching,
    moderation::Moderation,
    outbound::Outbound,
    participant::ParticipantId,
    registration::{Registration, VideoBounds},
    relay::Relay,
};

#[derive(Clone, Debug)]
pub struct Bot {
    store: Store,
    registration: Registration,
    matching: Matching,
    relay: Relay,
    moderation: Moderation,
    video_bounds: VideoBounds,
}

impl Bot {
    pub fn new(store: Store, config: &Config) -> Self {
        let identity = Identity::new(store.clone(), config.visible_ids);
        Bot {
            registration: Registration::new(store.clone(), identity.clone(), config.video_bounds),
            matching: Matching::new(store.clone(), config.search_limit),
            relay: Relay::new(identity.clone()),
            moderation: Moderation::new(store.clone(), identity, config.moderator_id),
            video_bounds: config.video_bounds,
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn handle(&self, event: Inbound) -> Result<Vec<Outbound>> {
        if event.from.is_bot {
            return Ok(Vec::new());
        }
        let from = event.from.id;

        let handled = match &event.kind {
            InboundKind::Text { message_id, text, reply_to } => {
                message::on_text(self, from, *message_id, text, reply_to.as_ref()).await
            }
            InboundKind::Video { video, .. } => media::on_video(self, from, video).await,
            InboundKind::VideoNote { message_id } => media::on_video_note(self, from, *message_id).await,
            InboundKind::OtherMedia { message_id } => media::on_other_media(self, from, *message_id).await,
            InboundKind::Choice { callback_id, data, message } => {
                choice::on_choice(self, from, callback_id, data, message.as_ref()).await
            }
        };

        match handled {
            Err(e) if e.is_user_facing() => {
                debug!("{from}: {e}");
                Ok(self.explain(from, &event.kind, e))
            }
            Err(e) => {
                warn!("event from {from} failed: {e}");
                Err(e)
            }
            ok => ok,
        }
    }

    /// Turns a user-facing error into what the participant sees.
    fn explain(&self, to: ParticipantId, kind: &InboundKind, error: Error) -> Vec<Outbound> {
        let mut out = Vec::new();
        let text = match error {
            Error::NotRegistered(state) => {
                if let InboundKind::Choice { callback_id, .. } = kind {
                    out.push(Outbound::answer(callback_id, "Please finish registering first."));
                }
                out.push(prompts::next_step(to, state, self.video_bounds));
                return out;
            }
            e => e.to_string(),
        };

        out.push(match kind {
            InboundKind::Choice { callback_id, .. } => Outbound::answer(callback_id, text),
            InboundKind::Text { message_id, .. }
            | InboundKind::VideoNote { message_id }
            | InboundKind::OtherMedia { message_id }
            | InboundKind::Video { message_id, .. } => Outbound::reply(to, *message_id, text),
        });
        out
    }
}

//! Report and block.
//!
//! Pressing the report affordance means "block" for the moderator and
//! "escalate to the moderator" for everyone else.

use tracing::info;

use crate::{
    Error, Result,
    db::Store,
    event::ReferencedMessage,
    identity::{Anchor, Identity},
    participant::{Participant, ParticipantId, RegistrationState},
};

pub const UNRESOLVED: &str = "Could not find who sent this.";

/// A copy of the reported message for the moderator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forwarded {
    Video { handle: String, caption: String },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Blocked(Participant),
    Escalated {
        moderator: ParticipantId,
        content: Forwarded,
        /// Set when the sender could be resolved, so the moderator can block
        /// straight from the copy.
        reported: Option<Participant>,
    },
}

#[derive(Clone, Debug)]
pub struct Moderation {
    store: Store,
    identity: Identity,
    moderator: ParticipantId,
}

impl Moderation {
    pub fn new(store: Store, identity: Identity, moderator: ParticipantId) -> Self {
        Moderation {
            store,
            identity,
            moderator,
        }
    }

    pub fn moderator(&self) -> ParticipantId {
        self.moderator
    }

    pub fn is_moderator(&self, actor: ParticipantId) -> bool {
        actor == self.moderator
    }

    pub async fn report(&self, actor: ParticipantId, message: &ReferencedMessage) -> Result<ReportOutcome> {
        if self.is_moderator(actor) {
            return self.block(message).await.map(ReportOutcome::Blocked);
        }
        let state = RegistrationState::of(self.store.find(actor).await?.as_ref());
        if !state.can_look_up() {
            return Err(Error::NotRegistered(state));
        }

        let reported = match Anchor::of(message) {
            Some(anchor) => self.identity.resolve(&anchor).await?,
            None => None,
        };
        let content = match (&message.video, &message.text) {
            (Some(video), caption) => Forwarded::Video {
                handle: video.handle.clone(),
                caption: caption.clone().unwrap_or_default(),
            },
            (None, Some(text)) => Forwarded::Text(text.clone()),
            (None, None) => return Err(Error::NotFound("Nothing to report here.".to_owned())),
        };

        info!(
            "{actor} reported {}",
            reported
                .as_ref()
                .map_or("an unknown sender".to_owned(), |p| format!("[{}]", p.visible_id))
        );
        Ok(ReportOutcome::Escalated {
            moderator: self.moderator,
            content,
            reported: reported.filter(|p| p.user_id != self.moderator),
        })
    }

    /// Idempotent: blocking a blocked participant succeeds again.
    async fn block(&self, message: &ReferencedMessage) -> Result<Participant> {
        let anchor = Anchor::of(message).ok_or_else(|| Error::NotFound(UNRESOLVED.to_owned()))?;
        let target = self
            .identity
            .resolve(&anchor)
            .await?
            .ok_or_else(|| Error::NotFound(UNRESOLVED.to_owned()))?;
        if target.user_id == self.moderator {
            return Err(Error::PermissionDenied("You cannot block yourself.".to_owned()));
        }
        if target.state() != RegistrationState::FullyOnboarded {
            return Err(Error::InvalidInput(format!(
                "{} [{}] has not finished registering.",
                target.name, target.visible_id
            )));
        }

        self.store.set_blocked(target.user_id).await?;
        info!("moderator blocked [{}] {}", target.visible_id, target.name);
        Ok(Participant {
            is_blocked: true,
            ..target
        })
    }
}

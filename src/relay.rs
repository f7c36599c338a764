//! Anonymous replies.
//!
//! A reply to a presented video opens a thread; a reply to a relayed text
//! continues it. Only the opening respects the target's contact opt-out, and
//! only the opening is confirmed back to the sender. Senders need a video of
//! their own first, so everyone who can be reached or blocked through a header
//! is fully onboarded.

use tracing::debug;

use crate::{
    Error, Result,
    event::ReferencedMessage,
    identity::{Anchor, Identity, relayed_text},
    participant::{Participant, RegistrationState},
};

pub const SENDER_BLOCKED: &str = "Sorry, you are blocked.";
pub const UNRESOLVED: &str = "Sorry, could not find the user to forward your reply to.";
pub const NO_CONTACT: &str = "Sorry, the user asked not to contact them.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub target: Participant,
    /// Body prefixed with the sender's header.
    pub text: String,
    /// Whether the copy gets a report affordance; never for messages to oneself.
    pub reportable: bool,
    /// Whether the sender hears back that the message went out.
    pub confirm: bool,
}

#[derive(Clone, Debug)]
pub struct Relay {
    identity: Identity,
}

impl Relay {
    pub fn new(identity: Identity) -> Self {
        Relay { identity }
    }

    pub async fn relay(
        &self,
        sender: &Participant,
        replied_to: &ReferencedMessage,
        body: &str,
    ) -> Result<Delivery> {
        if sender.is_blocked {
            return Err(Error::PermissionDenied(SENDER_BLOCKED.to_owned()));
        }
        let state = sender.state();
        if state != RegistrationState::FullyOnboarded {
            return Err(Error::NotRegistered(state));
        }

        let anchor = Anchor::of(replied_to).ok_or_else(|| Error::NotFound(UNRESOLVED.to_owned()))?;
        let target = self
            .identity
            .resolve(&anchor)
            .await?
            .ok_or_else(|| Error::NotFound(UNRESOLVED.to_owned()))?;

        let opening = matches!(anchor, Anchor::Video(_));
        if opening && !target.contact.accepts() {
            return Err(Error::PermissionDenied(NO_CONTACT.to_owned()));
        }

        debug!(
            "relaying [{}] -> [{}] ({})",
            sender.visible_id,
            target.visible_id,
            if opening { "opening" } else { "thread" }
        );
        Ok(Delivery {
            text: relayed_text(&sender.name, sender.visible_id, body),
            reportable: sender.user_id != target.user_id,
            confirm: opening,
            target,
        })
    }
}

//! Onboarding: name, then contact preference, then video.
//!
//! The current step is always derived from the stored participant
//! ([`Participant::state`]); nothing here keeps per-user state in memory.

use tracing::{info, warn};

use crate::{
    Error, Result,
    db::Store,
    event::VideoUpload,
    identity::Identity,
    participant::{Participant, ParticipantId, RegistrationState, is_full_name, normalize_name},
};

pub const NAME_PROMPT: &str = "Please write your full name, at least two words.";

/// Accepted video length in seconds, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoBounds {
    pub min_secs: u32,
    pub max_secs: u32,
}

impl Default for VideoBounds {
    fn default() -> Self {
        VideoBounds { min_secs: 7, max_secs: 20 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOutcome {
    First,
    Replaced,
}

#[derive(Clone, Debug)]
pub struct Registration {
    store: Store,
    identity: Identity,
    video_bounds: VideoBounds,
}

impl Registration {
    pub fn new(store: Store, identity: Identity, video_bounds: VideoBounds) -> Self {
        Registration {
            store,
            identity,
            video_bounds,
        }
    }

    pub async fn state(&self, user_id: ParticipantId) -> Result<RegistrationState> {
        Ok(RegistrationState::of(self.store.find(user_id).await?.as_ref()))
    }

    /// `Unregistered -> NameCollected`. An already registered participant is
    /// returned unchanged.
    pub async fn register_name(&self, user_id: ParticipantId, text: &str) -> Result<Participant> {
        if let Some(existing) = self.store.find(user_id).await? {
            return Ok(existing);
        }
        if !is_full_name(text) {
            return Err(Error::InvalidInput(NAME_PROMPT.to_owned()));
        }

        let participant = self.identity.register(user_id, &normalize_name(text)).await?;
        info!(
            "registered {} as [{}] {}",
            participant.user_id, participant.visible_id, participant.name
        );
        Ok(participant)
    }

    /// `NameCollected -> ContactSet`, or a later change of mind.
    pub async fn set_contact(&self, user_id: ParticipantId, can_contact: bool) -> Result<Participant> {
        if !self.store.set_contact(user_id, can_contact).await? {
            return Err(Error::NotRegistered(RegistrationState::Unregistered));
        }
        self.store
            .find(user_id)
            .await?
            .ok_or(Error::NotRegistered(RegistrationState::Unregistered))
    }

    /// `ContactSet -> FullyOnboarded`, or a replacement video.
    pub async fn upload_video(&self, user_id: ParticipantId, upload: &VideoUpload) -> Result<VideoOutcome> {
        let participant = self.store.find(user_id).await?;
        let state = RegistrationState::of(participant.as_ref());
        let Some(participant) = participant.filter(|_| state.can_look_up()) else {
            return Err(Error::NotRegistered(state));
        };

        let VideoBounds { min_secs, max_secs } = self.video_bounds;
        if upload.duration < min_secs {
            warn!("{user_id} sent a {}s video", upload.duration);
            return Err(Error::InvalidInput(format!(
                "Please record another one, at least {min_secs} seconds long."
            )));
        }
        if upload.duration > max_secs {
            warn!("{user_id} sent a {}s video", upload.duration);
            return Err(Error::InvalidInput(format!(
                "Please record another one, at most {max_secs} seconds long."
            )));
        }

        match self.store.set_video(user_id, &upload.video()).await {
            Ok(_) => {}
            Err(Error::Conflict(_)) => {
                return Err(Error::InvalidInput(
                    "This video already belongs to another participant. Please record your own.".to_owned(),
                ));
            }
            Err(e) => return Err(e),
        }

        Ok(match participant.video {
            None => {
                info!("{user_id} is fully onboarded");
                VideoOutcome::First
            }
            Some(_) => VideoOutcome::Replaced,
        })
    }

    /// Only for fully onboarded participants. The search entry follows in the
    /// same transaction.
    pub async fn rename(&self, user_id: ParticipantId, text: &str) -> Result<Participant> {
        let state = self.state(user_id).await?;
        if state != RegistrationState::FullyOnboarded {
            return Err(Error::NotRegistered(state));
        }
        if !is_full_name(text) {
            return Err(Error::InvalidInput(NAME_PROMPT.to_owned()));
        }

        let name = normalize_name(text);
        if !self.store.rename(user_id, &name).await? {
            return Err(Error::NotRegistered(RegistrationState::Unregistered));
        }
        info!("{user_id} renamed to {name}");
        self.store
            .find(user_id)
            .await?
            .ok_or(Error::NotRegistered(RegistrationState::Unregistered))
    }

    /// Removes the participant and their search entry. No soft delete.
    pub async fn delete(&self, user_id: ParticipantId) -> Result<()> {
        if !self.store.delete(user_id).await? {
            return Err(Error::NotRegistered(RegistrationState::Unregistered));
        }
        info!("{user_id} deleted themselves");
        Ok(())
    }
}

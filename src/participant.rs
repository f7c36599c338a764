use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Raw transport identifier. Never shown to other participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub i64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque number shown to other participants in place of the raw identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibleId(pub u32);

impl fmt::Display for VisibleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPreference {
    /// Never asked yet. Blocks the rest of registration.
    Unset,
    Accepts,
    Declines,
}

impl ContactPreference {
    pub(crate) fn from_column(value: Option<bool>) -> Self {
        match value {
            None => ContactPreference::Unset,
            Some(true) => ContactPreference::Accepts,
            Some(false) => ContactPreference::Declines,
        }
    }

    pub fn accepts(self) -> bool {
        self == ContactPreference::Accepts
    }
}

impl From<bool> for ContactPreference {
    fn from(value: bool) -> Self {
        if value {
            ContactPreference::Accepts
        } else {
            ContactPreference::Declines
        }
    }
}

/// Introduction video. `handle` is what the transport needs to send it again,
/// `key` is the content-derived id replies are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub handle: String,
    pub key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    NameCollected,
    ContactSet,
    FullyOnboarded,
}

impl RegistrationState {
    pub fn of(participant: Option<&Participant>) -> Self {
        participant.map_or(RegistrationState::Unregistered, Participant::state)
    }

    /// Search and random match open up once the contact preference is known.
    /// Relaying waits for the video.
    pub fn can_look_up(self) -> bool {
        matches!(
            self,
            RegistrationState::ContactSet | RegistrationState::FullyOnboarded
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: ParticipantId,
    pub visible_id: VisibleId,
    pub name: String,
    pub video: Option<Video>,
    pub contact: ContactPreference,
    pub is_blocked: bool,
    pub registered_at: OffsetDateTime,
}

impl Participant {
    pub fn state(&self) -> RegistrationState {
        match (self.contact, &self.video) {
            (ContactPreference::Unset, _) => RegistrationState::NameCollected,
            (_, None) => RegistrationState::ContactSet,
            (_, Some(_)) => RegistrationState::FullyOnboarded,
        }
    }
}

/// The stored form of a name: words joined by single spaces, so a name always
/// fits on the first line of a relay header.
pub fn normalize_name(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A name needs at least two whitespace-separated words.
pub fn is_full_name(text: &str) -> bool {
    let text = text.trim();
    text.chars().count() >= 2 && text.split_whitespace().count() >= 2
}

//! Visible IDs and the relay header.
//!
//! # Header convention (v1)
//!
//! A relayed text starts with `"{name} [{visible_id}]: "`. When the recipient
//! replies, the transport hands back the quoted text and [`parse_header`]
//! recovers the visible ID from its first line. Square brackets inside the name
//! are rewritten to parentheses on the way out so a crafted name can never
//! carry a header of its own.

use rand::Rng;
use tracing::debug;

use crate::{
    Error, Result,
    db::Store,
    event::ReferencedMessage,
    participant::{Participant, ParticipantId, VisibleId},
};

const MAX_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleIdRange {
    pub min: u32,
    pub max: u32,
}

impl VisibleIdRange {
    fn pick(&self) -> VisibleId {
        VisibleId(rand::rng().random_range(self.min..=self.max))
    }
}

impl Default for VisibleIdRange {
    fn default() -> Self {
        VisibleIdRange { min: 10000, max: 99999 }
    }
}

pub fn format_header(name: &str, visible_id: VisibleId) -> String {
    let name = name.replace('[', "(").replace(']', ")");
    format!("{name} [{visible_id}]:")
}

pub fn relayed_text(name: &str, visible_id: VisibleId, body: &str) -> String {
    format!("{} {body}", format_header(name, visible_id))
}

pub fn parse_header(text: &str) -> Option<VisibleId> {
    let line = text.lines().next()?;
    for (end, _) in line.match_indices("]:") {
        let head = &line[..end];
        let Some(open) = head.rfind('[') else {
            continue;
        };
        let digits = &head[open + 1..];
        let name = &head[..open];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if !name.ends_with(' ') || name.trim().is_empty() {
            continue;
        }
        if let Ok(id) = digits.parse() {
            return Some(VisibleId(id));
        }
    }
    None
}

/// What a reply points back at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// A presented introduction video, by content key.
    Video(String),
    /// A relayed text carrying a visible-ID header.
    Thread(VisibleId),
}

impl Anchor {
    /// Videos win over text: a caption never counts as a header.
    pub fn of(message: &ReferencedMessage) -> Option<Anchor> {
        if let Some(video) = &message.video {
            return Some(Anchor::Video(video.key.clone()));
        }
        message.text.as_deref().and_then(parse_header).map(Anchor::Thread)
    }
}

/// Assigns visible IDs and maps them (and video keys) back to participants.
#[derive(Clone, Debug)]
pub struct Identity {
    store: Store,
    range: VisibleIdRange,
}

impl Identity {
    pub fn new(store: Store, range: VisibleIdRange) -> Self {
        Identity { store, range }
    }

    /// Creates the participant under a fresh visible ID, drawing again
    /// whenever the store reports the number as taken.
    pub async fn register(&self, user_id: ParticipantId, name: &str) -> Result<Participant> {
        for attempt in 1..=MAX_ATTEMPTS {
            let visible_id = self.range.pick();
            if self.store.visible_id_taken(visible_id).await? {
                debug!("visible id {visible_id} taken, attempt {attempt}");
                continue;
            }

            match self.store.insert(user_id, visible_id, name).await {
                Err(Error::Conflict(column)) if column == "visible_id" => {
                    debug!("visible id {visible_id} raced, attempt {attempt}");
                }
                Err(Error::Conflict(_)) => {
                    // registered concurrently by another event from the same user
                    return self
                        .store
                        .find(user_id)
                        .await?
                        .ok_or_else(|| Error::Internal(format!("{user_id} vanished after conflict")));
                }
                other => return other,
            }
        }

        Err(Error::Internal(format!(
            "no free visible id in {}..={} after {MAX_ATTEMPTS} attempts",
            self.range.min, self.range.max
        )))
    }

    pub async fn visible_id_of(&self, user_id: ParticipantId) -> Result<Option<VisibleId>> {
        Ok(self.store.find(user_id).await?.map(|p| p.visible_id))
    }

    pub async fn resolve(&self, anchor: &Anchor) -> Result<Option<Participant>> {
        match anchor {
            Anchor::Video(key) => self.store.find_by_video_key(key).await,
            Anchor::Thread(visible_id) => self.store.find_by_visible_id(*visible_id).await,
        }
    }
}

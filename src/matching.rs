//! Finding someone to present: exact, random or by name.
//!
//! Every mode skips the requester and anyone without a video.

use tracing::debug;

use crate::{
    Error, Result,
    db::{Store, search::FtsQuery},
    participant::{Participant, VisibleId},
};

pub const NOBODY_ELSE: &str = "Sorry, there is nobody else.";
pub const NO_SUCH_NAME: &str = "Sorry, could not find anyone with that name. Try /random.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    One(Participant),
    /// Index order, capped at the configured limit.
    Many(Vec<Participant>),
}

#[derive(Clone, Debug)]
pub struct Matching {
    store: Store,
    search_limit: u32,
}

fn ensure_can_look_up(requester: &Participant) -> Result<()> {
    let state = requester.state();
    if state.can_look_up() {
        Ok(())
    } else {
        Err(Error::NotRegistered(state))
    }
}

impl Matching {
    pub fn new(store: Store, search_limit: u32) -> Self {
        Matching { store, search_limit }
    }

    pub async fn exact(&self, requester: &Participant, visible_id: VisibleId) -> Result<Participant> {
        ensure_can_look_up(requester)?;
        self.store
            .find_by_visible_id(visible_id)
            .await?
            .filter(|p| p.user_id != requester.user_id && p.video.is_some())
            .ok_or_else(|| Error::NotFound("Could not find that participant.".to_owned()))
    }

    pub async fn random(&self, requester: &Participant) -> Result<Participant> {
        ensure_can_look_up(requester)?;
        self.store
            .random(requester.user_id)
            .await?
            .ok_or_else(|| Error::NotFound(NOBODY_ELSE.to_owned()))
    }

    /// Literal match first; on zero hits, one retry with the last word as a prefix.
    pub async fn search(&self, requester: &Participant, text: &str) -> Result<SearchOutcome> {
        ensure_can_look_up(requester)?;

        let mut found = Vec::new();
        if let Some(query) = FtsQuery::literal(text) {
            found = self.pass(requester, &query).await?;
        }
        if found.is_empty() {
            if let Some(query) = FtsQuery::prefix(text) {
                found = self.pass(requester, &query).await?;
            }
        }

        match found.len() {
            0 => Err(Error::NotFound(NO_SUCH_NAME.to_owned())),
            1 => Ok(SearchOutcome::One(found.remove(0))),
            _ => Ok(SearchOutcome::Many(found)),
        }
    }

    async fn pass(&self, requester: &Participant, query: &FtsQuery) -> Result<Vec<Participant>> {
        let found = self
            .store
            .search_names(query, requester.user_id, self.search_limit)
            .await?;
        debug!("search {} for {}: {} hits", query.as_str(), requester.user_id, found.len());
        Ok(found)
    }
}

//! Full-text name search over `participant_search`.
//!
//! User text never reaches FTS5 verbatim: every word is wrapped in a quoted
//! string, so quotes, colons or `-` in a name cannot turn into query syntax.

use super::{Store, participant_columns, participants::{ParticipantRow, from_row}};
use crate::{
    Result,
    participant::{Participant, ParticipantId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtsQuery(String);

impl FtsQuery {
    /// Every word must match a whole token.
    pub fn literal(text: &str) -> Option<FtsQuery> {
        let words = quoted_words(text);
        (!words.is_empty()).then(|| FtsQuery(words.join(" ")))
    }

    /// Like [`FtsQuery::literal`] but the last word only has to be a prefix.
    pub fn prefix(text: &str) -> Option<FtsQuery> {
        FtsQuery::literal(text).map(|FtsQuery(query)| FtsQuery(query + "*"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn quoted_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .map(|word| format!("\"{}\"", word.replace('"', "\"\"")))
        .collect()
}

impl Store {
    /// Matchable participants whose name matches `query`, in index rank order.
    /// The requester, blocked participants and anyone without a video are
    /// filtered before the limit applies.
    pub async fn search_names(
        &self,
        query: &FtsQuery,
        requester: ParticipantId,
        limit: u32,
    ) -> Result<Vec<Participant>> {
        let rows: Vec<ParticipantRow> = sqlx::query_as(concat!(
            "SELECT ",
            participant_columns!(),
            " FROM participant_search JOIN participants p ON p.user_id = participant_search.rowid",
            " WHERE participant_search MATCH ? AND p.user_id!=? AND p.is_blocked=0",
            " AND p.video_key IS NOT NULL AND p.can_contact IS NOT NULL",
            " ORDER BY participant_search.rank LIMIT ?"
        ))
        .bind(query.as_str())
        .bind(requester.0)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(from_row).collect()
    }
}

use time::OffsetDateTime;

use super::{Store, participant_columns};
use crate::{
    Error, Result,
    participant::{ContactPreference, Participant, ParticipantId, Video, VisibleId},
};

pub(crate) type ParticipantRow = (
    i64,
    u32,
    String,
    Option<String>,
    Option<String>,
    Option<bool>,
    bool,
    i64,
);

pub(crate) fn from_row(
    (user_id, visible_id, name, video_handle, video_key, can_contact, is_blocked, registered_at): ParticipantRow,
) -> Result<Participant> {
    let video = match (video_handle, video_key) {
        (Some(handle), Some(key)) => Some(Video { handle, key }),
        _ => None,
    };
    let registered_at = OffsetDateTime::from_unix_timestamp(registered_at)
        .map_err(|e| Error::Internal(format!("bad registered_at for {user_id}: {e}")))?;

    Ok(Participant {
        user_id: ParticipantId(user_id),
        visible_id: VisibleId(visible_id),
        name,
        video,
        contact: ContactPreference::from_column(can_contact),
        is_blocked,
        registered_at,
    })
}

/// Which unique column a failed insert or update collided on, if any.
fn unique_violation(err: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db) = err else {
        return None;
    };
    if !db.is_unique_violation() {
        return None;
    }
    let message = db.message();
    Some(if message.contains("visible_id") {
        "visible_id"
    } else if message.contains("video_key") {
        "video_key"
    } else {
        "user_id"
    })
}

impl Store {
    pub async fn find(&self, user_id: ParticipantId) -> Result<Option<Participant>> {
        let row: Option<ParticipantRow> = sqlx::query_as(concat!(
            "SELECT ",
            participant_columns!(),
            " FROM participants p WHERE p.user_id=?"
        ))
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(from_row).transpose()
    }

    pub async fn find_by_visible_id(&self, visible_id: VisibleId) -> Result<Option<Participant>> {
        let row: Option<ParticipantRow> = sqlx::query_as(concat!(
            "SELECT ",
            participant_columns!(),
            " FROM participants p WHERE p.visible_id=?"
        ))
        .bind(visible_id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(from_row).transpose()
    }

    pub async fn find_by_video_key(&self, key: &str) -> Result<Option<Participant>> {
        let row: Option<ParticipantRow> = sqlx::query_as(concat!(
            "SELECT ",
            participant_columns!(),
            " FROM participants p WHERE p.video_key=?"
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(from_row).transpose()
    }

    pub async fn visible_id_taken(&self, visible_id: VisibleId) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM participants WHERE visible_id=?")
            .bind(visible_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Inserts the row and its search entry together. A collision on either
    /// unique column comes back as [`Error::Conflict`] naming the column.
    pub async fn insert(
        &self,
        user_id: ParticipantId,
        visible_id: VisibleId,
        name: &str,
    ) -> Result<Participant> {
        let registered_at = OffsetDateTime::now_utc().unix_timestamp();

        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query(
            "INSERT INTO participants (user_id,visible_id,name,registered_at) VALUES (?,?,?,?)",
        )
        .bind(user_id.0)
        .bind(visible_id.0)
        .bind(name)
        .bind(registered_at)
        .execute(&mut *tx)
        .await;
        if let Err(e) = inserted {
            return Err(match unique_violation(&e) {
                Some(column) => Error::Conflict(column.to_owned()),
                None => e.into(),
            });
        }

        sqlx::query("INSERT INTO participant_search (rowid,name) VALUES (?,?)")
            .bind(user_id.0)
            .bind(name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        from_row((
            user_id.0,
            visible_id.0,
            name.to_owned(),
            None,
            None,
            None,
            false,
            registered_at,
        ))
    }

    /// Returns false when there is no such participant.
    pub async fn rename(&self, user_id: ParticipantId, name: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query("UPDATE participants SET name=? WHERE user_id=?")
            .bind(name)
            .bind(user_id.0)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE participant_search SET name=? WHERE rowid=?")
            .bind(name)
            .bind(user_id.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    pub async fn set_contact(&self, user_id: ParticipantId, can_contact: bool) -> Result<bool> {
        let updated = sqlx::query("UPDATE participants SET can_contact=? WHERE user_id=?")
            .bind(can_contact)
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// A video key already owned by someone else comes back as
    /// [`Error::Conflict`]`("video_key")`.
    pub async fn set_video(&self, user_id: ParticipantId, video: &Video) -> Result<bool> {
        let updated = sqlx::query("UPDATE participants SET video_handle=?, video_key=? WHERE user_id=?")
            .bind(&video.handle)
            .bind(&video.key)
            .bind(user_id.0)
            .execute(&self.pool)
            .await;

        match updated {
            Ok(updated) => Ok(updated.rows_affected() > 0),
            Err(e) => Err(match unique_violation(&e) {
                Some(column) => Error::Conflict(column.to_owned()),
                None => e.into(),
            }),
        }
    }

    pub async fn set_blocked(&self, user_id: ParticipantId) -> Result<bool> {
        let updated = sqlx::query("UPDATE participants SET is_blocked=1 WHERE user_id=?")
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;
        Ok(updated.rows_affected() > 0)
    }

    /// Removes the row and its search entry together.
    pub async fn delete(&self, user_id: ParticipantId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM participants WHERE user_id=?")
            .bind(user_id.0)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM participant_search WHERE rowid=?")
            .bind(user_id.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(deleted.rows_affected() > 0)
    }

    /// Uniformly random matchable participant other than `requester`.
    pub async fn random(&self, requester: ParticipantId) -> Result<Option<Participant>> {
        let row: Option<ParticipantRow> = sqlx::query_as(concat!(
            "SELECT ",
            participant_columns!(),
            " FROM participants p",
            " WHERE p.user_id!=? AND p.video_key IS NOT NULL AND p.can_contact IS NOT NULL AND p.is_blocked=0",
            " ORDER BY random() LIMIT 1"
        ))
        .bind(requester.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(from_row).transpose()
    }
}

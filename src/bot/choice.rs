use tracing::debug;

use crate::{
    Error, Result,
    event::ReferencedMessage,
    moderation::{Forwarded, ReportOutcome},
    outbound::{Callback, Outbound},
    participant::{ParticipantId, RegistrationState, VisibleId},
};

use super::{Bot, prompts};

pub(super) async fn on_choice(
    bot: &Bot,
    from: ParticipantId,
    callback_id: &str,
    data: &str,
    message: Option<&ReferencedMessage>,
) -> Result<Vec<Outbound>> {
    let callback: Callback = data.parse().map_err(|e: String| {
        debug!("{from}: {e}");
        Error::InvalidInput("Sorry, this button no longer works.".to_owned())
    })?;

    match callback {
        Callback::Contact(can_contact) => {
            let me = bot.registration.set_contact(from, can_contact).await?;
            let next = match me.video {
                Some(_) => prompts::invite(from),
                None => prompts::video_prompt(from, bot.video_bounds),
            };
            Ok(vec![Outbound::answer(callback_id, "Saved."), next])
        }

        Callback::Delete(true) => {
            bot.registration.delete(from).await?;
            Ok(vec![Outbound::answer(callback_id, "You were deleted.")])
        }

        Callback::Delete(false) => {
            let mut out = vec![Outbound::answer(callback_id, "Nothing was deleted.")];
            if let Some(message) = message {
                out.push(Outbound::DeleteMessage {
                    to: from,
                    message_id: message.message_id,
                });
            }
            Ok(out)
        }

        Callback::Report => {
            let message = message.ok_or_else(|| Error::NotFound("Nothing to report here.".to_owned()))?;
            report(bot, from, callback_id, message).await
        }

        Callback::Show(visible_id) => show(bot, from, callback_id, visible_id).await,
    }
}

async fn report(
    bot: &Bot,
    from: ParticipantId,
    callback_id: &str,
    message: &ReferencedMessage,
) -> Result<Vec<Outbound>> {
    match bot.moderation.report(from, message).await? {
        ReportOutcome::Blocked(blocked) => Ok(vec![Outbound::answer(
            callback_id,
            format!("Blocked {} [{}].", blocked.name, blocked.visible_id),
        )]),

        ReportOutcome::Escalated {
            moderator,
            content,
            reported,
        } => {
            let choices = match reported {
                Some(_) => prompts::report_choices(moderator, moderator),
                None => Vec::new(),
            };
            let forward = match content {
                Forwarded::Video { handle, caption } => Outbound::Video {
                    to: moderator,
                    handle,
                    caption,
                    choices,
                },
                Forwarded::Text(text) => Outbound::text(moderator, text).with_choices(choices),
            };

            Ok(vec![
                forward,
                Outbound::ClearChoices {
                    to: from,
                    message_id: message.message_id,
                },
                Outbound::answer(callback_id, "Message reported."),
            ])
        }
    }
}

async fn show(bot: &Bot, from: ParticipantId, callback_id: &str, visible_id: VisibleId) -> Result<Vec<Outbound>> {
    let me = bot
        .store
        .find(from)
        .await?
        .ok_or(Error::NotRegistered(RegistrationState::Unregistered))?;
    let other = bot.matching.exact(&me, visible_id).await?;

    Ok(vec![
        Outbound::answer(callback_id, ""),
        prompts::presentation(from, &other, bot.moderation.moderator())?,
    ])
}

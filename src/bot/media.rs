use crate::{
    Error, Result,
    event::VideoUpload,
    outbound::Outbound,
    participant::{ParticipantId, RegistrationState},
    registration::VideoOutcome,
};

use super::{Bot, prompts};

pub(super) async fn on_video(bot: &Bot, from: ParticipantId, video: &VideoUpload) -> Result<Vec<Outbound>> {
    let thanks = match bot.registration.upload_video(from, video).await? {
        VideoOutcome::First => "Thank you for the video! Now people can find it and get acquainted with you.",
        VideoOutcome::Replaced => "Thank you for the new video!",
    };
    Ok(vec![Outbound::text(from, thanks), prompts::invite(from)])
}

pub(super) async fn on_video_note(bot: &Bot, from: ParticipantId, message_id: i64) -> Result<Vec<Outbound>> {
    ensure_past_contact(bot, from).await?;
    Ok(vec![Outbound::reply(
        from,
        message_id,
        "Please send (or attach) a proper video, not a video note.",
    )])
}

pub(super) async fn on_other_media(bot: &Bot, from: ParticipantId, message_id: i64) -> Result<Vec<Outbound>> {
    ensure_past_contact(bot, from).await?;
    Ok(vec![Outbound::reply(from, message_id, "Please record a video with sound.")])
}

async fn ensure_past_contact(bot: &Bot, from: ParticipantId) -> Result<()> {
    let state = bot.registration.state(from).await?;
    match state {
        RegistrationState::Unregistered | RegistrationState::NameCollected => Err(Error::NotRegistered(state)),
        _ => Ok(()),
    }
}

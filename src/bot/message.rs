use crate::{
    Error, Result,
    event::ReferencedMessage,
    matching::SearchOutcome,
    outbound::{Callback, Choice, Outbound},
    participant::{Participant, ParticipantId},
};

use super::{Bot, Command, command, prompts};

pub(super) async fn on_text(
    bot: &Bot,
    from: ParticipantId,
    message_id: i64,
    text: &str,
    reply_to: Option<&ReferencedMessage>,
) -> Result<Vec<Outbound>> {
    if let Some(cmd) = Command::parse(text) {
        return command::on_command(bot, from, message_id, cmd).await;
    }

    let Some(me) = bot.store.find(from).await? else {
        let me = bot.registration.register_name(from, text).await?;
        return Ok(vec![prompts::contact_question(
            from,
            &format!(
                "Thank you, {}! When you want to change it, type /name. Now, {}",
                me.name,
                prompts::CONTACT_QUESTION.to_lowercase()
            ),
        )]);
    };

    let state = me.state();
    if !state.can_look_up() {
        return Err(Error::NotRegistered(state));
    }
    if text.trim().chars().count() < 2 {
        return Ok(Vec::new());
    }

    match reply_to {
        Some(replied_to) => relay(bot, &me, replied_to, text).await,
        None => search(bot, &me, message_id, text).await,
    }
}

async fn relay(bot: &Bot, me: &Participant, replied_to: &ReferencedMessage, text: &str) -> Result<Vec<Outbound>> {
    let delivery = bot.relay.relay(me, replied_to, text.trim()).await?;
    let target = delivery.target.user_id;

    let choices = if delivery.reportable {
        prompts::report_choices(target, bot.moderation.moderator())
    } else {
        Vec::new()
    };
    let mut out = vec![Outbound::text(target, delivery.text).with_choices(choices)];
    if delivery.confirm {
        out.push(Outbound::text(me.user_id, "Forwarded them your message."));
    }
    Ok(out)
}

async fn search(bot: &Bot, me: &Participant, message_id: i64, text: &str) -> Result<Vec<Outbound>> {
    Ok(vec![match bot.matching.search(me, text.trim()).await? {
        SearchOutcome::One(other) => prompts::presentation(me.user_id, &other, bot.moderation.moderator())?,
        SearchOutcome::Many(others) => Outbound::reply(me.user_id, message_id, "Found multiple participants:")
            .with_choices(
                others
                    .iter()
                    .map(|other| Choice::new(&other.name, Callback::Show(other.visible_id)))
                    .collect(),
            ),
    }])
}

use crate::{
    Error, Result,
    outbound::{Callback, Outbound, yes_no},
    participant::{Participant, ParticipantId, RegistrationState},
};

use super::{Bot, prompts};

const NAME_USAGE: &str = "Type /name followed by your full name, for example: /name Alice Smith";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Me,
    Random,
    Name(String),
    Contact,
    Delete,
    Unknown(String),
}

impl Command {
    /// `None` for anything that is not a slash command.
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim().strip_prefix('/')?;
        let (head, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        let name = head.split('@').next().unwrap_or_default().to_lowercase();

        Some(match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "me" => Command::Me,
            "random" => Command::Random,
            "name" => Command::Name(rest.trim().to_owned()),
            "contact" => Command::Contact,
            "delete" => Command::Delete,
            _ => Command::Unknown(name),
        })
    }
}

async fn registered(bot: &Bot, from: ParticipantId) -> Result<Participant> {
    bot.store
        .find(from)
        .await?
        .ok_or(Error::NotRegistered(RegistrationState::Unregistered))
}

pub(super) async fn on_command(
    bot: &Bot,
    from: ParticipantId,
    message_id: i64,
    command: Command,
) -> Result<Vec<Outbound>> {
    match command {
        Command::Start => Ok(vec![match bot.store.find(from).await? {
            None => prompts::welcome(from),
            Some(me) => prompts::next_step(from, me.state(), bot.video_bounds),
        }]),

        Command::Help => Ok(vec![prompts::help(from)]),

        Command::Me => {
            let me = registered(bot, from).await?;
            if me.state() != RegistrationState::FullyOnboarded {
                return Err(Error::NotRegistered(me.state()));
            }
            Ok(vec![prompts::presentation(from, &me, bot.moderation.moderator())?])
        }

        Command::Random => {
            let me = registered(bot, from).await?;
            let other = bot.matching.random(&me).await?;
            Ok(vec![prompts::presentation(from, &other, bot.moderation.moderator())?])
        }

        Command::Name(name) => {
            let me = bot.registration.rename(from, &name).await.map_err(|e| match e {
                Error::InvalidInput(_) => Error::InvalidInput(NAME_USAGE.to_owned()),
                e => e,
            })?;
            Ok(vec![Outbound::reply(
                from,
                message_id,
                format!("Saved. Others will now see you as {}.", me.name),
            )])
        }

        Command::Contact => {
            registered(bot, from).await?;
            Ok(vec![prompts::contact_question(from, prompts::CONTACT_QUESTION)])
        }

        Command::Delete => {
            registered(bot, from).await?;
            Ok(vec![
                Outbound::text(from, "Delete your name and video from the database?")
                    .with_choices(yes_no(Callback::Delete(true), Callback::Delete(false))),
            ])
        }

        Command::Unknown(name) => Err(Error::InvalidInput(format!(
            "Sorry, I don't know /{name}. Try /help."
        ))),
    }
}

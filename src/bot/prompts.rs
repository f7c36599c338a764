//! Everything the bot says on its own initiative.

use crate::{
    Error, Result,
    outbound::{Callback, Choice, Outbound, yes_no},
    participant::{Participant, ParticipantId, RegistrationState},
    registration::{NAME_PROMPT, VideoBounds},
};

macro_rules! include_res {
    (str, $p:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub(crate) const CONTACT_QUESTION: &str = "Do you want other people contacting you (via this bot)?";
pub(crate) const INVITE: &str =
    "Please enter a name to find a person, or tap on /random to get a random introduction.";

pub(crate) fn welcome(to: ParticipantId) -> Outbound {
    Outbound::text(to, include_res!(str, "/texts/welcome.txt").trim_end())
}

pub(crate) fn help(to: ParticipantId) -> Outbound {
    Outbound::text(to, include_res!(str, "/texts/help.txt").trim_end())
}

pub(crate) fn contact_question(to: ParticipantId, text: &str) -> Outbound {
    Outbound::text(to, text).with_choices(yes_no(Callback::Contact(true), Callback::Contact(false)))
}

pub(crate) fn video_prompt(to: ParticipantId, bounds: VideoBounds) -> Outbound {
    Outbound::text(
        to,
        include_res!(str, "/texts/video_prompt.txt")
            .trim_end()
            .replace("{min}", &bounds.min_secs.to_string())
            .replace("{max}", &bounds.max_secs.to_string()),
    )
}

pub(crate) fn invite(to: ParticipantId) -> Outbound {
    Outbound::text(to, INVITE)
}

/// The one thing the participant should do next.
pub(crate) fn next_step(to: ParticipantId, state: RegistrationState, bounds: VideoBounds) -> Outbound {
    match state {
        RegistrationState::Unregistered => Outbound::text(to, NAME_PROMPT),
        RegistrationState::NameCollected => contact_question(to, CONTACT_QUESTION),
        RegistrationState::ContactSet => video_prompt(to, bounds),
        RegistrationState::FullyOnboarded => invite(to),
    }
}

/// The moderator sees the same affordance labelled as what it does for them.
pub(crate) fn report_choices(recipient: ParticipantId, moderator: ParticipantId) -> Vec<Choice> {
    let label = if recipient == moderator { "Block" } else { "Report" };
    vec![Choice::new(label, Callback::Report)]
}

/// The video card for `target`, sent to `me`.
pub(crate) fn presentation(me: ParticipantId, target: &Participant, moderator: ParticipantId) -> Result<Outbound> {
    let video = target
        .video
        .as_ref()
        .ok_or_else(|| Error::NotFound(format!("{} has no video yet.", target.name)))?;

    let own = me == target.user_id;
    let caption = if target.contact.accepts() && !own {
        include_res!(str, "/texts/contactable.txt")
            .trim_end()
            .replace("{name}", &target.name)
    } else {
        format!("{}.\nPress /random for another participant.", target.name)
    };

    Ok(Outbound::Video {
        to: me,
        handle: video.handle.clone(),
        caption,
        choices: if own { Vec::new() } else { report_choices(me, moderator) },
    })
}

//! Anonymous reply routing.

mod common;

use common::*;
use introbot::{
    Outbound,
    identity::parse_header,
    participant::ParticipantId,
};

#[tokio::test]
async fn video_reply_reaches_the_owner_with_a_header() {
    let bot = setup_bot().await;
    let alice = onboard(&bot, 1, "Alice Smith", true).await;
    let bob = onboard(&bot, 2, "Bob Jones", true).await;

    let out = send(&bot, reply(1, "Hi Bob!", quoted_video(&bob))).await;

    let expected = format!("Alice Smith [{}]: Hi Bob!", alice.visible_id);
    assert_eq!(texts_to(&out, 2), vec![expected.clone()]);
    assert_eq!(texts_to(&out, 1), vec!["Forwarded them your message."]);
    assert_eq!(parse_header(&expected), Some(alice.visible_id));

    let Outbound::Text { choices, .. } = &out[0] else {
        panic!("expected the relayed text first, got {out:?}");
    };
    assert_eq!(choices[0].data, "report");
}

#[tokio::test]
async fn thread_replies_go_back_silently() {
    let bot = setup_bot().await;
    let alice = onboard(&bot, 1, "Alice Smith", true).await;
    let bob = onboard(&bot, 2, "Bob Jones", true).await;

    let out = send(&bot, reply(1, "Hi Bob!", quoted_video(&bob))).await;
    let relayed = texts_to(&out, 2).remove(0);

    let out = send(&bot, reply(2, "Hello Alice", quoted_text(&relayed))).await;
    assert_eq!(
        out.iter().filter_map(Outbound::recipient).collect::<Vec<_>>(),
        vec![ParticipantId(1)]
    );
    let back = texts_to(&out, 1).remove(0);
    assert_eq!(back, format!("Bob Jones [{}]: Hello Alice", bob.visible_id));

    let out = send(&bot, reply(1, "How are you?", quoted_text(&back))).await;
    assert_eq!(
        texts_to(&out, 2),
        vec![format!("Alice Smith [{}]: How are you?", alice.visible_id)]
    );
    assert!(texts_to(&out, 1).is_empty());
}

#[tokio::test]
async fn opt_out_blocks_first_contact_but_not_an_open_thread() {
    let bot = setup_bot().await;
    let alice = onboard(&bot, 1, "Alice Smith", true).await;
    let bob = onboard(&bot, 2, "Bob Jones", false).await;

    let out = send(&bot, reply(1, "Hi Bob!", quoted_video(&bob))).await;
    assert_eq!(texts_to(&out, 1), vec!["Sorry, the user asked not to contact them."]);
    assert!(texts_to(&out, 2).is_empty());

    // Bob wrote to Alice first; Alice answers in that thread.
    let out = send(&bot, reply(2, "Hi Alice", quoted_video(&alice))).await;
    let relayed = texts_to(&out, 1).remove(0);
    let out = send(&bot, reply(1, "Hi yourself", quoted_text(&relayed))).await;
    assert_eq!(
        texts_to(&out, 2),
        vec![format!("Alice Smith [{}]: Hi yourself", alice.visible_id)]
    );
}

#[tokio::test]
async fn unresolvable_references_are_reported() {
    let bot = setup_bot().await;
    onboard(&bot, 1, "Alice Smith", true).await;
    let unresolved = vec!["Sorry, could not find the user to forward your reply to.".to_owned()];

    let out = send(&bot, reply(1, "hello?", quoted_text("Please enter a name to find a person"))).await;
    assert_eq!(texts_to(&out, 1), unresolved);

    let out = send(&bot, reply(1, "hello?", quoted_text("Ghost Person [5]: boo"))).await;
    assert_eq!(texts_to(&out, 1), unresolved);

    let mut gone = quoted_text("");
    gone.video = Some(introbot::participant::Video { handle: "x".into(), key: "deleted".into() });
    let out = send(&bot, reply(1, "hello?", gone)).await;
    assert_eq!(texts_to(&out, 1), unresolved);
}

#[tokio::test]
async fn replying_to_oneself_has_no_report_button() {
    let bot = setup_bot().await;
    let alice = onboard(&bot, 1, "Alice Smith", true).await;

    let out = send(&bot, reply(1, "note to self", quoted_video(&alice))).await;
    let Outbound::Text { to, choices, .. } = &out[0] else {
        panic!("expected a text, got {out:?}");
    };
    assert_eq!(*to, ParticipantId(1));
    assert!(choices.is_empty());
}

#[tokio::test]
async fn moderator_copies_carry_a_block_button() {
    let bot = setup_bot().await;
    onboard(&bot, 1, "Alice Smith", true).await;
    let moderator = onboard(&bot, MODERATOR.0, "Mod Erator", true).await;

    let out = send(&bot, reply(1, "hi mod", quoted_video(&moderator))).await;
    let Outbound::Text { to, choices, .. } = &out[0] else {
        panic!("expected a text, got {out:?}");
    };
    assert_eq!(*to, MODERATOR);
    assert_eq!(choices[0].label, "Block");
}

#[tokio::test]
async fn multi_line_names_still_carry_a_readable_header() {
    let bot = setup_bot().await;
    let alice = onboard(&bot, 1, "Alice\nSmith", true).await;
    let bob = onboard(&bot, 2, "Bob Jones", true).await;
    assert_eq!(alice.name, "Alice Smith");

    let out = send(&bot, reply(1, "Hi Bob!", quoted_video(&bob))).await;
    let relayed = texts_to(&out, 2).remove(0);
    assert_eq!(relayed, format!("Alice Smith [{}]: Hi Bob!", alice.visible_id));

    let out = send(&bot, reply(2, "Hello Alice", quoted_text(&relayed))).await;
    assert_eq!(
        texts_to(&out, 1),
        vec![format!("Bob Jones [{}]: Hello Alice", bob.visible_id)]
    );
}

#[tokio::test]
async fn relaying_waits_for_the_senders_video() {
    let bot = setup_bot().await;
    let bob = onboard(&bot, 2, "Bob Jones", true).await;
    send(&bot, text(3, "Carol White")).await;
    send(&bot, choice(3, "contact_yes", None)).await;

    let out = send(&bot, reply(3, "Hi Bob!", quoted_video(&bob))).await;
    assert!(texts_to(&out, 2).is_empty());
    assert!(texts_to(&out, 3)[0].starts_with("Great! Now please record a video"), "{out:?}");
}

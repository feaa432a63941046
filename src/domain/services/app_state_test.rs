use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::AppState;
use super::TurnPhase;
use crate::domain::models::Action;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::TurnEvent;
use crate::domain::models::FALLBACK_ERROR_TEXT;
use crate::domain::models::INITIAL_GREETING;

fn create_app_state() -> AppState {
    let mut app_state = AppState::default();
    app_state.set_rect(Rect::new(0, 0, 100, 300));
    return app_state;
}

fn last_text(app_state: &AppState) -> String {
    return app_state
        .conversation
        .last()
        .map(|message| return message.text().to_string())
        .unwrap_or_default();
}

#[test]
fn it_starts_with_the_greeting() {
    let app_state = create_app_state();

    assert_eq!(app_state.conversation.len(), 1);
    assert_eq!(last_text(&app_state), INITIAL_GREETING);
    assert!(!app_state.is_pending());
}

#[test]
fn it_submits_trimmed_input() {
    let mut app_state = create_app_state();

    let text = app_state.submit("  销量下降原因  \n");

    assert_eq!(text, Some("销量下降原因".to_string()));
    assert_eq!(app_state.phase, TurnPhase::Sending);
    assert_eq!(app_state.conversation.len(), 2);
    let last = app_state.conversation.last().unwrap();
    assert_eq!(last.role, Role::User);
    assert_eq!(last.text(), "销量下降原因");
}

#[test]
fn it_ignores_blank_input() {
    let mut app_state = create_app_state();

    assert_eq!(app_state.submit(""), None);
    assert_eq!(app_state.submit("   \n\t"), None);

    assert_eq!(app_state.conversation.len(), 1);
    assert!(!app_state.is_pending());
}

#[test]
fn it_rejects_input_while_a_turn_is_pending() {
    let mut app_state = create_app_state();
    app_state.submit("first");

    assert_eq!(app_state.submit("second"), None);
    app_state.handle_turn_event(TurnEvent::Streaming());
    assert_eq!(app_state.submit("third"), None);

    assert_eq!(app_state.conversation.len(), 3);
}

#[test]
fn it_streams_fragments_into_one_message() {
    let mut app_state = create_app_state();
    app_state.submit("销量下降原因");

    app_state.handle_turn_event(TurnEvent::Streaming());
    assert_eq!(app_state.conversation.len(), 3);
    assert_eq!(app_state.conversation.streaming_count(), 1);
    assert_eq!(last_text(&app_state), "");

    app_state.handle_turn_event(TurnEvent::Fragment("销量".to_string()));
    assert_eq!(last_text(&app_state), "销量");

    app_state.handle_turn_event(TurnEvent::Fragment("".to_string()));
    app_state.handle_turn_event(TurnEvent::Fragment("下降可能与...".to_string()));
    assert_eq!(last_text(&app_state), "销量下降可能与...");
    assert!(app_state.conversation.last().unwrap().is_streaming());

    app_state.handle_turn_event(TurnEvent::Finished());

    let last = app_state.conversation.last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.text(), "销量下降可能与...");
    assert!(!last.is_streaming());
    assert_eq!(app_state.conversation.streaming_count(), 0);
    assert_eq!(app_state.conversation.len(), 3);
    assert_eq!(app_state.phase, TurnPhase::Idle);
}

#[test]
fn it_keeps_tabs_in_stored_text() {
    let mut app_state = create_app_state();
    app_state.submit("a\tb");
    assert_eq!(last_text(&app_state), "a\tb");

    app_state.handle_turn_event(TurnEvent::Streaming());
    app_state.handle_turn_event(TurnEvent::Fragment("```\n".to_string()));
    app_state.handle_turn_event(TurnEvent::Fragment("\tfoo()".to_string()));
    app_state.handle_turn_event(TurnEvent::Finished());

    let messages = app_state.conversation.messages();
    assert_eq!(messages[1].text(), "a\tb");
    assert_eq!(messages[2].text(), "```\n\tfoo()");
}

#[test]
fn it_shows_the_fallback_when_the_session_cannot_start() {
    let mut app_state = create_app_state();
    app_state.submit("hi");

    app_state.handle_turn_event(TurnEvent::Failed(
        "API key is missing".to_string(),
    ));

    assert!(!app_state.is_pending());
    assert_eq!(app_state.conversation.len(), 3);
    assert_eq!(app_state.conversation.streaming_count(), 0);
    let last = app_state.conversation.last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert_eq!(last.message_type(), MessageType::Error);
    assert_eq!(last.text(), FALLBACK_ERROR_TEXT);
}

#[test]
fn it_keeps_partial_text_when_the_stream_fails() {
    let mut app_state = create_app_state();
    app_state.submit("hi");
    app_state.handle_turn_event(TurnEvent::Streaming());
    app_state.handle_turn_event(TurnEvent::Fragment("Partial".to_string()));

    app_state.handle_turn_event(TurnEvent::Failed("connection reset".to_string()));

    let messages = app_state.conversation.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2].text(), "Partial");
    assert!(!messages[2].is_streaming());
    assert_eq!(messages[3].text(), FALLBACK_ERROR_TEXT);
    assert_eq!(app_state.conversation.streaming_count(), 0);
    assert!(!app_state.is_pending());
}

#[test]
fn it_ignores_fragments_outside_a_stream() {
    let mut app_state = create_app_state();
    app_state.submit("hi");

    app_state.handle_turn_event(TurnEvent::Fragment("stray".to_string()));

    assert_eq!(app_state.conversation.len(), 2);
    assert_eq!(app_state.phase, TurnPhase::Sending);
}

#[test]
fn it_keeps_at_most_one_streaming_message_across_turns() {
    let mut app_state = create_app_state();

    for turn in 0..3 {
        app_state.submit(&format!("question {turn}"));
        app_state.handle_turn_event(TurnEvent::Streaming());
        assert_eq!(app_state.conversation.streaming_count(), 1);
        app_state.handle_turn_event(TurnEvent::Fragment(format!("answer {turn}")));
        app_state.handle_turn_event(TurnEvent::Finished());
        assert_eq!(app_state.conversation.streaming_count(), 0);
    }

    assert_eq!(app_state.conversation.len(), 7);
}

#[test]
fn it_resets_back_to_the_greeting() {
    let mut app_state = create_app_state();
    for idx in 0..9 {
        app_state.add_message(Message::new(Role::User, &format!("message {idx}")));
    }
    assert_eq!(app_state.conversation.len(), 10);

    assert!(app_state.reset_conversation());

    assert_eq!(app_state.conversation.len(), 1);
    assert_eq!(last_text(&app_state), INITIAL_GREETING);
}

#[test]
fn it_refuses_to_reset_while_pending() {
    let mut app_state = create_app_state();
    app_state.submit("hi");

    assert!(!app_state.reset_conversation());
    assert_eq!(app_state.conversation.len(), 2);
}

#[test]
fn it_handles_the_quit_command() -> Result<()> {
    let (tx, _rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = create_app_state();

    assert_eq!(app_state.handle_slash_commands("/quit", &tx)?, (true, false));
    assert_eq!(app_state.handle_slash_commands("/q", &tx)?, (true, false));
    return Ok(());
}

#[test]
fn it_handles_the_help_command() -> Result<()> {
    let (tx, _rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = create_app_state();

    let res = app_state.handle_slash_commands("/help", &tx)?;

    assert_eq!(res, (false, true));
    assert_eq!(app_state.conversation.len(), 2);
    assert!(last_text(&app_state).starts_with("COMMANDS:"));
    return Ok(());
}

#[test]
fn it_handles_the_reset_command() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = create_app_state();
    app_state.add_message(Message::new(Role::User, "hello"));

    let res = app_state.handle_slash_commands("/new", &tx)?;

    assert_eq!(res, (false, true));
    assert_eq!(app_state.conversation.len(), 1);
    assert!(matches!(rx.try_recv()?, Action::ResetSession()));
    return Ok(());
}

#[test]
fn it_skips_commands_while_pending() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = create_app_state();
    app_state.submit("hi");

    let res = app_state.handle_slash_commands("/reset", &tx)?;

    assert_eq!(res, (false, true));
    assert_eq!(app_state.conversation.len(), 2);
    assert!(rx.try_recv().is_err());
    return Ok(());
}

#[test]
fn it_passes_through_plain_text() -> Result<()> {
    let (tx, _rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = create_app_state();

    let res = app_state.handle_slash_commands("销量下降原因", &tx)?;

    assert_eq!(res, (false, false));
    assert_eq!(app_state.conversation.len(), 1);
    return Ok(());
}

use anyhow::bail;
use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::AppState;
use super::ChatMode;
use super::HistoryDirection;
use crate::domain::models::Action;
use crate::domain::models::BackendResponse;
use crate::domain::models::KeyValueStore;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SpeechOutcome;
use crate::domain::models::StorageKey;
use crate::domain::models::ThemeName;
use crate::domain::services::Preferences;
use crate::infrastructure::storage::memory::MemoryStore;

impl Default for AppState<'static> {
    fn default() -> AppState<'static> {
        let mut app_state = AppState::new(
            Preferences::new(Box::<MemoryStore>::default()),
            Some(ThemeName::Dark),
            true,
        );
        app_state.set_rect(Rect::new(0, 0, 100, 300), None);
        return app_state;
    }
}

fn channel() -> (
    mpsc::UnboundedSender<Action>,
    mpsc::UnboundedReceiver<Action>,
) {
    return mpsc::unbounded_channel::<Action>();
}

fn assert_pin_invariant(app_state: &AppState) {
    for message in &app_state.messages {
        let id = message.id().unwrap_or_default();
        let in_pinned = app_state.pinned_messages.iter().any(|e| return e.has_id(id));
        assert_eq!(message.is_pinned(), in_pinned);
    }
}

mod submit {
    use super::*;

    #[test]
    fn it_ignores_empty_input() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("", &tx)?;
        app_state.submit("   \n\t ", &tx)?;

        assert!(app_state.messages.is_empty());
        assert!(app_state.input_history.is_empty());
        assert!(!app_state.is_loading());
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_sends_a_backend_request() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();
        app_state.set_input("Hello there");

        app_state.submit(" Hello there ", &tx)?;

        assert_eq!(app_state.messages.len(), 1);
        assert_eq!(app_state.messages[0].role(), Role::User);
        assert_eq!(app_state.messages[0].content(), " Hello there ");
        assert_eq!(app_state.input_history, vec!["Hello there".to_string()]);
        assert_eq!(app_state.history_index, None);
        assert_eq!(app_state.input(), "");
        assert!(app_state.is_loading());

        match rx.try_recv()? {
            Action::BackendRequest(prompt) => {
                assert_eq!(prompt.text, " Hello there ");
                assert_eq!(
                    app_state.mode,
                    ChatMode::AwaitingCompletion {
                        request_id: prompt.request_id
                    }
                );
            }
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[test]
    fn it_dedupes_only_the_latest_history_entry() -> Result<()> {
        let (tx, _rx) = channel();
        let mut app_state = AppState::default();

        for text in ["one", "one", "two", "one"] {
            app_state.submit(text, &tx)?;
            app_state.mode = ChatMode::Idle;
        }

        assert_eq!(
            app_state.input_history,
            vec!["one".to_string(), "two".to_string(), "one".to_string()]
        );

        return Ok(());
    }

    #[test]
    fn it_rejects_free_text_while_awaiting() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("first", &tx)?;
        rx.try_recv()?;
        app_state.submit("second", &tx)?;

        assert_eq!(app_state.messages.len(), 1);
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_allows_commands_while_awaiting() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("first", &tx)?;
        rx.try_recv()?;
        app_state.submit("/stats", &tx)?;

        assert_eq!(app_state.messages.len(), 2);
        assert!(app_state.messages[1].is_command());
        assert!(app_state.is_loading());

        return Ok(());
    }

    #[test]
    fn it_never_records_commands() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("  /HELP ", &tx)?;

        assert!(app_state
            .messages
            .iter()
            .all(|e| return e.role() != Role::User));
        assert!(app_state.input_history.is_empty());
        assert!(!app_state.is_loading());
        assert!(rx.try_recv().is_err());

        return Ok(());
    }
}

mod dispatch_command {
    use super::*;

    #[test]
    fn it_lists_every_command_on_help() -> Result<()> {
        let (tx, _rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("/help", &tx)?;

        assert_eq!(app_state.messages.len(), 1);
        let message = &app_state.messages[0];
        assert_eq!(message.role(), Role::System);
        for entry in app_state.commands.entries() {
            assert!(message.content().contains(&format!("/{}", entry.name)));
        }

        return Ok(());
    }

    #[test]
    fn it_reports_unknown_commands() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("/flibbertigibbet", &tx)?;

        assert_eq!(app_state.messages.len(), 1);
        assert_eq!(app_state.messages[0].role(), Role::System);
        assert_eq!(
            app_state.messages[0].content(),
            "Unknown command: /flibbertigibbet. Type /help to see available commands."
        );
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_clears_messages_but_keeps_pins() -> Result<()> {
        let (tx, _rx) = channel();
        let mut app_state = AppState::default();
        app_state.add_message(Message::new(Role::Assistant, "Keep me"));
        app_state.toggle_pin_last();

        app_state.submit("/clear", &tx)?;

        assert_eq!(app_state.messages.len(), 1);
        assert_eq!(app_state.messages[0].content(), "Chat cleared.");
        assert_eq!(app_state.pinned_messages.len(), 1);

        return Ok(());
    }

    #[test]
    fn it_resets_history() -> Result<()> {
        let (tx, _rx) = channel();
        let mut app_state = AppState::default();
        app_state.submit("hello", &tx)?;
        app_state.mode = ChatMode::Idle;
        app_state.navigate_history(HistoryDirection::Previous);

        app_state.submit("/reset", &tx)?;

        assert_eq!(app_state.messages.len(), 1);
        assert!(app_state.input_history.is_empty());
        assert_eq!(app_state.history_index, None);

        return Ok(());
    }

    #[test]
    fn it_toggles_and_persists_the_theme() -> Result<()> {
        let (tx, _rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("/theme", &tx)?;

        assert_eq!(app_state.theme, ThemeName::Light);
        assert_eq!(app_state.preferences.theme(), ThemeName::Light);

        return Ok(());
    }

    #[test]
    fn it_alerts_when_saving_nothing() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("/save", &tx)?;

        assert!(app_state.messages.is_empty());
        assert!(app_state.alert.is_some());
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_exports_messages() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();
        app_state.add_message(Message::new(Role::Assistant, "Hi"));

        app_state.submit("/save", &tx)?;

        match rx.try_recv()? {
            Action::ExportMessages(messages) => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].content(), "Hi");
            }
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[test]
    fn it_starts_listening() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("/voice", &tx)?;

        assert!(app_state.listening);
        match rx.try_recv()? {
            Action::SpeechStart() => {}
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[test]
    fn it_quits() -> Result<()> {
        let (tx, _rx) = channel();
        let mut app_state = AppState::default();

        app_state.submit("/quit", &tx)?;

        assert!(app_state.should_quit);

        return Ok(());
    }
}

mod navigate_history {
    use super::*;

    #[test]
    fn it_follows_the_mirrored_offset() -> Result<()> {
        let (tx, _rx) = channel();
        let mut app_state = AppState::default();
        for text in ["alpha", "beta", "gamma"] {
            app_state.submit(text, &tx)?;
            app_state.mode = ChatMode::Idle;
        }
        assert_eq!(app_state.input_history, vec!["gamma", "beta", "alpha"]);

        app_state.navigate_history(HistoryDirection::Previous);
        assert_eq!(app_state.input(), "alpha");
        app_state.navigate_history(HistoryDirection::Previous);
        assert_eq!(app_state.input(), "beta");
        app_state.navigate_history(HistoryDirection::Previous);
        assert_eq!(app_state.input(), "gamma");
        app_state.navigate_history(HistoryDirection::Previous);
        assert_eq!(app_state.input(), "gamma");
        assert_eq!(app_state.history_index, Some(2));

        app_state.navigate_history(HistoryDirection::Next);
        assert_eq!(app_state.input(), "beta");
        app_state.navigate_history(HistoryDirection::Next);
        assert_eq!(app_state.input(), "alpha");
        app_state.navigate_history(HistoryDirection::Next);
        assert_eq!(app_state.input(), "");
        assert_eq!(app_state.history_index, None);
        app_state.navigate_history(HistoryDirection::Next);
        assert_eq!(app_state.input(), "");

        return Ok(());
    }

    #[test]
    fn it_does_nothing_without_history() {
        let mut app_state = AppState::default();
        app_state.set_input("draft");

        app_state.navigate_history(HistoryDirection::Previous);

        assert_eq!(app_state.input(), "draft");
        assert_eq!(app_state.history_index, None);
    }
}

mod toggle_pin {
    use super::*;

    #[test]
    fn it_keeps_flags_in_sync_with_pins() {
        let mut app_state = AppState::default();
        for text in ["one", "two", "three"] {
            app_state.add_message(Message::new(Role::Assistant, text));
        }
        let ids = app_state
            .messages
            .iter()
            .map(|e| return e.id().unwrap_or_default().to_string())
            .collect::<Vec<String>>();

        for idx in [0, 2, 0, 1, 2, 2, 1, 0] {
            app_state.toggle_pin(Some(&ids[idx]));
            assert_pin_invariant(&app_state);
        }

        let pinned = app_state
            .pinned_messages
            .iter()
            .map(|e| return e.content())
            .collect::<Vec<&str>>();
        assert_eq!(pinned, vec!["three", "one"]);
    }

    #[test]
    fn it_ignores_missing_ids() {
        let mut app_state = AppState::default();
        app_state.add_message(Message::new(Role::User, "one"));

        app_state.toggle_pin(None);
        app_state.toggle_pin(Some("not-an-id"));

        assert!(app_state.pinned_messages.is_empty());
        assert_pin_invariant(&app_state);
    }

    #[test]
    fn it_persists_pins() -> Result<()> {
        let mut app_state = AppState::default();
        app_state.add_message(Message::new(Role::User, "remember"));

        app_state.toggle_pin_last();

        let restored = app_state.preferences.pinned_messages();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].content(), "remember");
        assert!(restored[0].is_pinned());

        return Ok(());
    }

    #[test]
    fn it_unpins_messages_from_an_earlier_session() -> Result<()> {
        let store = MemoryStore::default();
        let earlier = Message::new(Role::Assistant, "from yesterday").pinned_copy();
        store.set(
            StorageKey::PinnedMessages,
            &serde_json::to_string(&vec![earlier.clone()])?,
        )?;
        let mut app_state = AppState::new(Preferences::new(Box::new(store)), None, false);
        assert_eq!(app_state.pinned_messages.len(), 1);

        app_state.toggle_pin(earlier.id());

        assert!(app_state.pinned_messages.is_empty());
        assert!(app_state.preferences.pinned_messages().is_empty());

        return Ok(());
    }
}

mod handle_backend_response {
    use super::*;

    #[test]
    fn it_appends_the_reply_and_goes_idle() -> Result<()> {
        let (tx, mut rx) = channel();
        let mut app_state = AppState::default();
        app_state.submit("hello", &tx)?;

        let request_id = match rx.try_recv()? {
            Action::BackendRequest(prompt) => prompt.request_id,
            _ => bail!("Wrong enum"),
        };

        app_state.handle_backend_response(BackendResponse {
            request_id,
            message: Message::new(
                Role::Assistant,
                "Sorry, something went wrong while generating a response. Please try again.",
            ),
        });

        assert!(!app_state.is_loading());
        let assistant = app_state
            .messages
            .iter()
            .filter(|e| return e.role() == Role::Assistant)
            .collect::<Vec<&Message>>();
        assert_eq!(assistant.len(), 1);

        return Ok(());
    }

    #[test]
    fn it_keeps_waiting_on_a_stale_reply() -> Result<()> {
        let (tx, _rx) = channel();
        let mut app_state = AppState::default();
        app_state.submit("hello", &tx)?;

        app_state.handle_backend_response(BackendResponse {
            request_id: "stale".to_string(),
            message: Message::new(Role::Assistant, "late"),
        });

        assert!(app_state.is_loading());
        assert_eq!(app_state.messages.len(), 2);

        return Ok(());
    }
}

mod speech {
    use super::*;

    #[test]
    fn it_appends_transcripts_to_the_input() {
        let mut app_state = AppState::default();
        app_state.listening = true;
        app_state.set_input("Tell me");

        app_state.handle_speech_result(SpeechOutcome::Transcript("a joke".to_string()));

        assert_eq!(app_state.input(), "Tell me a joke");
        assert!(!app_state.listening);
    }

    #[test]
    fn it_alerts_on_no_speech() {
        let mut app_state = AppState::default();
        app_state.listening = true;

        app_state.handle_speech_result(SpeechOutcome::NoSpeech);

        assert!(app_state.alert.is_some());
        assert!(!app_state.listening);
        assert!(app_state.messages.is_empty());
    }

    #[test]
    fn it_reports_errors_as_a_message() {
        let mut app_state = AppState::default();
        app_state.listening = true;

        app_state.handle_speech_error("microphone unavailable");

        assert!(!app_state.listening);
        assert!(app_state.alert.is_none());
        assert_eq!(app_state.messages.len(), 1);
        assert_eq!(app_state.messages[0].role(), Role::System);
    }
}

mod message_id_at {
    use super::*;

    #[test]
    fn it_finds_messages_by_row() {
        let mut app_state = AppState::default();
        app_state.set_rect(Rect::new(0, 2, 100, 300), None);
        app_state.add_message(Message::new(Role::User, "one"));
        app_state.add_message(Message::new(Role::Assistant, "two"));

        // Each single line bubble takes three rows.
        assert_eq!(
            app_state.message_id_at(10, 2).as_deref(),
            app_state.messages[0].id()
        );
        assert_eq!(
            app_state.message_id_at(10, 5).as_deref(),
            app_state.messages[1].id()
        );
        assert_eq!(app_state.message_id_at(10, 8), None);
        assert_eq!(app_state.message_id_at(10, 0), None);
    }

    #[test]
    fn it_finds_pinned_messages() {
        let mut app_state = AppState::default();
        app_state.add_message(Message::new(Role::User, "one"));
        app_state.toggle_pin_last();
        app_state.set_rect(Rect::new(0, 0, 70, 300), Some(Rect::new(70, 0, 30, 300)));

        assert_eq!(
            app_state.message_id_at(75, 1).as_deref(),
            app_state.pinned_messages[0].id()
        );
        assert_eq!(app_state.message_id_at(75, 0), None);
        assert_eq!(app_state.message_id_at(75, 2), None);
    }
}

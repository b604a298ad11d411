use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::completion_message;
use super::ActionsService;
use super::FALLBACK_REPLY;
use super::MISSING_KEY_REPLY;
use crate::domain::models::Action;
use crate::domain::models::Backend;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendRef;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SpeechOutcome;
use crate::domain::models::SpeechRecognizer;
use crate::domain::models::SpeechRef;

struct FakeBackend {
    configured: bool,
    reply: Option<String>,
}

#[async_trait]
impl Backend for FakeBackend {
    async fn health_check(&self) -> Result<()> {
        if !self.configured {
            bail!("API key is missing");
        }
        return Ok(());
    }

    async fn get_completion(&self, _prompt: &BackendPrompt) -> Result<String> {
        return self
            .reply
            .clone()
            .ok_or_else(|| return anyhow!("500 Internal Server Error"));
    }
}

struct FakeSpeech {
    outcome: Option<SpeechOutcome>,
}

#[async_trait]
impl SpeechRecognizer for FakeSpeech {
    fn is_supported(&self) -> bool {
        return true;
    }

    async fn listen(&self) -> Result<SpeechOutcome> {
        return self
            .outcome
            .clone()
            .ok_or_else(|| return anyhow!("microphone unavailable"));
    }
}

fn backend(configured: bool, reply: Option<&str>) -> BackendRef {
    return Arc::new(FakeBackend {
        configured,
        reply: reply.map(|e| return e.to_string()),
    });
}

fn speech(outcome: Option<SpeechOutcome>) -> SpeechRef {
    return Arc::new(FakeSpeech { outcome });
}

async fn run_actions(service: ActionsService, actions: Vec<Action>) -> Result<Vec<Event>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    for action in actions {
        action_tx.send(action)?;
    }
    drop(action_tx);

    service.start(event_tx, &mut action_rx).await?;
    drop(service);

    let mut events = vec![];
    while let Some(event) = event_rx.recv().await {
        events.push(event);
    }

    return Ok(events);
}

mod completion_message {
    use super::*;

    #[tokio::test]
    async fn it_returns_the_generated_text() {
        let prompt = BackendPrompt::new("1", "Hello");
        let message = completion_message(
            &backend(true, Some("Hi there")),
            &prompt,
            Duration::from_millis(0),
        )
        .await;

        assert_eq!(message.role(), Role::Assistant);
        assert_eq!(message.content(), "Hi there");
    }

    #[tokio::test]
    async fn it_falls_back_on_failure() {
        let prompt = BackendPrompt::new("1", "Hello");
        let message =
            completion_message(&backend(true, None), &prompt, Duration::from_millis(0)).await;

        assert_eq!(message.role(), Role::Assistant);
        assert_eq!(message.content(), FALLBACK_REPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn it_waits_before_reporting_a_missing_key() {
        let prompt = BackendPrompt::new("1", "Hello");
        let started = tokio::time::Instant::now();
        let message = completion_message(
            &backend(false, Some("unused")),
            &prompt,
            Duration::from_millis(1000),
        )
        .await;

        assert_eq!(message.content(), MISSING_KEY_REPLY);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}

mod start {
    use super::*;

    #[tokio::test]
    async fn it_answers_backend_requests() -> Result<()> {
        let service = ActionsService::new(
            backend(true, Some("Hi there")),
            speech(None),
            tempfile::tempdir()?.path().to_path_buf(),
            Duration::from_millis(0),
        );

        let events = run_actions(
            service,
            vec![Action::BackendRequest(BackendPrompt::new("abc", "Hello"))],
        )
        .await?;

        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::BackendResponse(response) => {
                assert_eq!(response.request_id, "abc");
                assert_eq!(response.message.content(), "Hi there");
            }
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_exports_transcripts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let service = ActionsService::new(
            backend(true, None),
            speech(None),
            dir.path().to_path_buf(),
            Duration::from_millis(0),
        );

        let events = run_actions(
            service,
            vec![Action::ExportMessages(vec![Message::new(
                Role::User,
                "Hello",
            )])],
        )
        .await?;

        assert!(events.is_empty());
        let files = std::fs::read_dir(dir.path())?.count();
        assert_eq!(files, 1);

        return Ok(());
    }

    #[tokio::test]
    async fn it_reports_failed_exports() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let service = ActionsService::new(
            backend(true, None),
            speech(None),
            dir.path().to_path_buf(),
            Duration::from_millis(0),
        );

        let events = run_actions(service, vec![Action::ExportMessages(vec![])]).await?;

        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::ActionMessage(message) => {
                assert_eq!(message.role(), Role::System);
                assert_eq!(message.content(), "Unable to save the chat transcript.");
            }
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_reports_speech_results() -> Result<()> {
        let service = ActionsService::new(
            backend(true, None),
            speech(Some(SpeechOutcome::Transcript("hello".to_string()))),
            tempfile::tempdir()?.path().to_path_buf(),
            Duration::from_millis(0),
        );

        let events = run_actions(service, vec![Action::SpeechStart()]).await?;

        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::SpeechResult(outcome) => {
                assert_eq!(*outcome, SpeechOutcome::Transcript("hello".to_string()));
            }
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }

    #[tokio::test]
    async fn it_reports_speech_errors() -> Result<()> {
        let service = ActionsService::new(
            backend(true, None),
            speech(None),
            tempfile::tempdir()?.path().to_path_buf(),
            Duration::from_millis(0),
        );

        let events = run_actions(service, vec![Action::SpeechStart()]).await?;

        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::SpeechError(reason) => {
                assert_eq!(reason, "microphone unavailable");
            }
            _ => bail!("Wrong enum"),
        }

        return Ok(());
    }
}

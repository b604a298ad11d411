#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::path;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tokio::sync::mpsc;
use tokio::time;

use super::clipboard::ClipboardService;
use super::Export;
use crate::domain::models::Action;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendRef;
use crate::domain::models::BackendResponse;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SpeechRef;

pub const FALLBACK_REPLY: &str =
    "Sorry, something went wrong while generating a response. Please try again.";
pub const MISSING_KEY_REPLY: &str =
    "API key is missing. Set CHATGATE_API_KEY or api-key in your config file to start chatting.";

/// Runs one completion and maps every outcome to a single assistant message.
pub async fn completion_message(
    backend: &BackendRef,
    prompt: &BackendPrompt,
    missing_key_delay: Duration,
) -> Message {
    if let Err(err) = backend.health_check().await {
        tracing::warn!(error = ?err, "Backend is not configured");
        time::sleep(missing_key_delay).await;
        return Message::new(Role::Assistant, MISSING_KEY_REPLY);
    }

    match backend.get_completion(prompt).await {
        Ok(text) => {
            tracing::debug!(request_id = prompt.request_id, "Completion received");
            return Message::new(Role::Assistant, &text);
        }
        Err(err) => {
            tracing::error!(
                request_id = prompt.request_id,
                error = ?err,
                "Completion request failed"
            );
            return Message::new(Role::Assistant, FALLBACK_REPLY);
        }
    }
}

fn worker_error(text: &str, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    tx.send(Event::ActionMessage(Message::new(Role::System, text)))?;
    return Ok(());
}

/// Background worker executing side effects requested by the chat view.
/// Results are reported back as events.
pub struct ActionsService {
    backend: BackendRef,
    export_dir: path::PathBuf,
    missing_key_delay: Duration,
    speech: SpeechRef,
}

impl ActionsService {
    pub fn new(
        backend: BackendRef,
        speech: SpeechRef,
        export_dir: path::PathBuf,
        missing_key_delay: Duration,
    ) -> ActionsService {
        return ActionsService {
            backend,
            export_dir,
            missing_key_delay,
            speech,
        };
    }

    pub async fn start(
        &self,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            let worker_tx = tx.clone();

            match action {
                Action::BackendRequest(prompt) => {
                    let backend = self.backend.clone();
                    let delay = self.missing_key_delay;
                    tokio::spawn(async move {
                        let message = completion_message(&backend, &prompt, delay).await;
                        worker_tx.send(Event::BackendResponse(BackendResponse {
                            request_id: prompt.request_id,
                            message,
                        }))?;

                        return Ok::<(), anyhow::Error>(());
                    });
                }
                Action::CopyMessages(messages) => {
                    if let Err(err) = ClipboardService::set(Export::format(&messages)) {
                        tracing::error!(error = ?err, "Failed to copy chat");
                        worker_error("Unable to copy the chat to your clipboard.", &tx)?;
                    }
                }
                Action::ExportMessages(messages) => {
                    let today = Local::now().date_naive();
                    match Export::write(&self.export_dir, today, &messages).await {
                        Ok(file_path) => {
                            tracing::info!(path = ?file_path, "Saved chat transcript");
                        }
                        Err(err) => {
                            tracing::error!(error = ?err, "Failed to save chat transcript");
                            worker_error("Unable to save the chat transcript.", &tx)?;
                        }
                    }
                }
                Action::SpeechStart() => {
                    let speech = self.speech.clone();
                    tokio::spawn(async move {
                        match speech.listen().await {
                            Ok(outcome) => {
                                worker_tx.send(Event::SpeechResult(outcome))?;
                            }
                            Err(err) => {
                                worker_tx.send(Event::SpeechError(err.to_string()))?;
                            }
                        }

                        return Ok::<(), anyhow::Error>(());
                    });
                }
            }
        }

        return Ok(());
    }
}

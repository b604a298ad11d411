use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechOutcome {
    Transcript(String),
    NoSpeech,
}

#[async_trait]
pub trait SpeechRecognizer {
    /// Checked once at start up. When false, voice affordances are hidden and
    /// `/voice` reports that speech input is unsupported.
    fn is_supported(&self) -> bool;

    /// Captures a single utterance. Capture is never continuous; callers start
    /// a new capture for every utterance.
    async fn listen(&self) -> Result<SpeechOutcome>;
}

pub type SpeechRef = Arc<dyn SpeechRecognizer + Send + Sync>;

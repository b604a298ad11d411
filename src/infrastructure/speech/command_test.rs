use anyhow::Result;

use super::CommandSpeech;
use crate::domain::models::SpeechOutcome;
use crate::domain::models::SpeechRecognizer;

#[test]
fn it_is_unsupported_without_a_command() {
    assert!(!CommandSpeech::new("").is_supported());
    assert!(!CommandSpeech::new("   ").is_supported());
}

#[test]
fn it_is_unsupported_when_the_program_is_missing() {
    assert!(!CommandSpeech::new("chatgate-no-such-program --once").is_supported());
    assert!(!CommandSpeech::new("/no/such/dir/listen").is_supported());
}

#[cfg(unix)]
mod unix {
    use super::*;

    #[test]
    fn it_resolves_programs_on_path() {
        assert!(CommandSpeech::new("sh -c true").is_supported());
    }

    #[tokio::test]
    async fn it_returns_the_trimmed_transcript() -> Result<()> {
        let speech = CommandSpeech::new("echo   hello world  ");
        let outcome = speech.listen().await?;

        assert_eq!(outcome, SpeechOutcome::Transcript("hello world".to_string()));

        return Ok(());
    }

    #[tokio::test]
    async fn it_detects_no_speech() -> Result<()> {
        let speech = CommandSpeech::new("true");
        let outcome = speech.listen().await?;

        assert_eq!(outcome, SpeechOutcome::NoSpeech);

        return Ok(());
    }

    #[tokio::test]
    async fn it_fails_on_a_non_zero_exit() {
        let speech = CommandSpeech::new("false");
        assert!(speech.listen().await.is_err());
    }
}

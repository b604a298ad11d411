#[cfg(test)]
#[path = "command_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::models::SpeechOutcome;
use crate::domain::models::SpeechRecognizer;

/// Speech input through an external speech-to-text program. The program
/// records one utterance and prints the transcript to stdout.
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
}

fn resolve(program: &str) -> Option<path::PathBuf> {
    let program_path = path::Path::new(program);
    if program_path.components().count() > 1 {
        if program_path.is_file() {
            return Some(program_path.to_path_buf());
        }
        return None;
    }

    let paths = env::var_os("PATH")?;
    return env::split_paths(&paths)
        .map(|dir| return dir.join(program))
        .find(|candidate| return candidate.is_file());
}

impl CommandSpeech {
    pub fn new(command: &str) -> CommandSpeech {
        let mut parts = command.split_whitespace().map(|e| return e.to_string());

        return CommandSpeech {
            program: parts.next().unwrap_or_default(),
            args: parts.collect(),
        };
    }
}

#[async_trait]
impl SpeechRecognizer for CommandSpeech {
    fn is_supported(&self) -> bool {
        if self.program.is_empty() {
            return false;
        }

        return resolve(&self.program).is_some();
    }

    #[allow(clippy::implicit_return)]
    async fn listen(&self) -> Result<SpeechOutcome> {
        if self.program.is_empty() {
            bail!("No speech command is configured");
        }

        tracing::debug!(program = self.program, "Starting speech capture");
        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                status = ?output.status.code(),
                stderr = stderr.trim(),
                "Speech command failed"
            );
            bail!("Speech command failed: {}", stderr.trim());
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Ok(SpeechOutcome::NoSpeech);
        }

        return Ok(SpeechOutcome::Transcript(transcript));
    }
}

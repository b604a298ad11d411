#[cfg(test)]
#[path = "export_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::NaiveDate;
use tokio::fs;

use crate::domain::models::Message;

const RECORD_DELIMITER: &str = "\n\n---\n\n";

pub struct Export {}

impl Export {
    pub fn file_name(date: NaiveDate) -> String {
        return format!("chat-{}.txt", date.format("%Y-%m-%d"));
    }

    pub fn format_message(message: &Message) -> String {
        let pinned = if message.is_pinned() { " [PINNED]" } else { "" };

        return format!(
            "{} ({}){pinned}: {}",
            message.role().to_string().to_uppercase(),
            message.timestamp().format("%Y-%m-%d %H:%M:%S"),
            message.content()
        );
    }

    /// Plain text transcript, one record per message.
    pub fn format(messages: &[Message]) -> String {
        return messages
            .iter()
            .map(Export::format_message)
            .collect::<Vec<String>>()
            .join(RECORD_DELIMITER);
    }

    /// Writes the transcript into `dir`, returning the file path. Nothing is
    /// written for an empty transcript.
    pub async fn write(dir: &path::Path, date: NaiveDate, messages: &[Message]) -> Result<path::PathBuf> {
        if messages.is_empty() {
            bail!("There are no messages to export");
        }

        if !dir.exists() {
            fs::create_dir_all(dir).await?;
        }

        let file_path = dir.join(Export::file_name(date));
        fs::write(&file_path, Export::format(messages)).await?;

        return Ok(file_path);
    }
}

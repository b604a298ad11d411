#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub const COMMAND_PREFIX: char = '/';

/// A directive typed into the prompt. The name is normalised (lower-cased,
/// trimmed, prefix stripped) but not validated against any registry.
#[derive(Debug, PartialEq, Eq)]
pub struct SlashCommand {
    pub name: String,
}

impl SlashCommand {
    pub fn is_command(text: &str) -> bool {
        return text.trim_start().starts_with(COMMAND_PREFIX);
    }

    pub fn parse(text: &str) -> Option<SlashCommand> {
        if !SlashCommand::is_command(text) {
            return None;
        }

        let normalized = text.to_lowercase().trim().to_string();
        let name = normalized
            .strip_prefix(COMMAND_PREFIX)
            .unwrap_or(&normalized)
            .to_string();

        return Some(SlashCommand { name });
    }
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;

use chrono::NaiveDate;
use strum::IntoEnumIterator;

use super::Export;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::ThemeName;

pub const PROMPT_TEMPLATES: [&str; 5] = [
    "Explain <topic> like I'm five.",
    "Summarize the following text in three bullet points: <text>",
    "Write a short poem about <subject>.",
    "Translate the following into French: <text>",
    "Give me three ideas for <goal>, with pros and cons for each.",
];

/// Side effects a command asks the session to carry out. They are applied in
/// order before the command's message is appended.
#[derive(Debug, PartialEq)]
pub enum CommandEffect {
    ClearMessages,
    ResetSession,
    SetTheme(ThemeName),
    Export(Vec<Message>),
    CopyToClipboard(Vec<Message>),
    StartListening,
    Quit,
}

#[derive(Debug, Default, PartialEq)]
pub struct CommandOutput {
    pub message: Option<String>,
    pub effects: Vec<CommandEffect>,
    pub alert: Option<String>,
}

impl CommandOutput {
    pub fn message(text: &str) -> CommandOutput {
        return CommandOutput {
            message: Some(text.to_string()),
            ..CommandOutput::default()
        };
    }

    pub fn alert(text: &str) -> CommandOutput {
        return CommandOutput {
            alert: Some(text.to_string()),
            ..CommandOutput::default()
        };
    }

    pub fn with_effect(mut self, effect: CommandEffect) -> CommandOutput {
        self.effects.push(effect);
        return self;
    }
}

/// Read-only view of the session handed to a command.
pub struct CommandContext<'a> {
    pub commands: &'a [CommandEntry],
    pub history_len: usize,
    pub listening: bool,
    pub messages: &'a [Message],
    pub model: String,
    pub pinned_messages: &'a [Message],
    pub speech_supported: bool,
    pub theme: ThemeName,
    pub today: NaiveDate,
}

pub struct CommandEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub run: fn(&CommandContext) -> CommandOutput,
}

pub fn unknown_command_text(name: &str) -> String {
    return format!("Unknown command: /{name}. Type /help to see available commands.");
}

fn help(ctx: &CommandContext) -> CommandOutput {
    let lines = ctx
        .commands
        .iter()
        .map(|cmd| return format!("- {} - {}", cmd.usage, cmd.description))
        .collect::<Vec<String>>()
        .join("\n");

    return CommandOutput::message(&format!("Available commands:\n{lines}"));
}

fn clear(_ctx: &CommandContext) -> CommandOutput {
    return CommandOutput::message("Chat cleared.").with_effect(CommandEffect::ClearMessages);
}

fn about(ctx: &CommandContext) -> CommandOutput {
    let mut model = ctx.model.to_string();
    if model.is_empty() {
        model = "not configured".to_string();
    }

    return CommandOutput::message(&format!(
        "chatgate v{}. A terminal chat client that sends your messages to a hosted language model. Active model: {model}.",
        env!("CARGO_PKG_VERSION")
    ));
}

fn theme(ctx: &CommandContext) -> CommandOutput {
    let next = ctx.theme.toggle();
    return CommandOutput::message(&format!("Switched to {next} theme."))
        .with_effect(CommandEffect::SetTheme(next));
}

fn save(ctx: &CommandContext) -> CommandOutput {
    if ctx.messages.is_empty() {
        return CommandOutput::alert("There are no messages to save yet.");
    }

    let file_name = Export::file_name(ctx.today);
    return CommandOutput::message(&format!("Saving chat to {file_name}."))
        .with_effect(CommandEffect::Export(ctx.messages.to_vec()));
}

fn copy(ctx: &CommandContext) -> CommandOutput {
    if ctx.messages.is_empty() {
        return CommandOutput::alert("There are no messages to copy yet.");
    }

    return CommandOutput::message("Copying chat to clipboard.")
        .with_effect(CommandEffect::CopyToClipboard(ctx.messages.to_vec()));
}

fn stats(ctx: &CommandContext) -> CommandOutput {
    let by_role = Role::iter()
        .map(|role| {
            let count = ctx
                .messages
                .iter()
                .filter(|message| return message.role() == role)
                .count();
            return format!("{role}: {count}");
        })
        .collect::<Vec<String>>()
        .join(", ");

    return CommandOutput::message(&format!(
        "Session stats:\n- Messages: {} ({by_role})\n- Pinned messages: {}\n- Input history entries: {}",
        ctx.messages.len(),
        ctx.pinned_messages.len(),
        ctx.history_len
    ));
}

fn reset(_ctx: &CommandContext) -> CommandOutput {
    return CommandOutput::message("Session reset. Messages and input history have been cleared.")
        .with_effect(CommandEffect::ResetSession);
}

fn templates(_ctx: &CommandContext) -> CommandOutput {
    let lines = PROMPT_TEMPLATES
        .iter()
        .enumerate()
        .map(|(idx, template)| return format!("{}. {template}", idx + 1))
        .collect::<Vec<String>>()
        .join("\n");

    return CommandOutput::message(&format!("Prompt templates:\n{lines}"));
}

fn voice(ctx: &CommandContext) -> CommandOutput {
    if !ctx.speech_supported {
        return CommandOutput::message("Voice input is not supported in this environment.");
    }
    if ctx.listening {
        return CommandOutput::message("Already listening.");
    }

    return CommandOutput::message("Listening... speak now.")
        .with_effect(CommandEffect::StartListening);
}

fn pinned(ctx: &CommandContext) -> CommandOutput {
    if ctx.pinned_messages.is_empty() {
        return CommandOutput::message(
            "No pinned messages. Long-press a message or press Ctrl+P to pin the latest one.",
        );
    }

    let lines = ctx
        .pinned_messages
        .iter()
        .enumerate()
        .map(|(idx, message)| {
            return format!(
                "{}. [{}] {}",
                idx + 1,
                message.role().to_string().to_uppercase(),
                message.content()
            );
        })
        .collect::<Vec<String>>()
        .join("\n");

    return CommandOutput::message(&format!("Pinned messages:\n{lines}"));
}

fn quit(_ctx: &CommandContext) -> CommandOutput {
    return CommandOutput::message("Goodbye!").with_effect(CommandEffect::Quit);
}

pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl Default for CommandRegistry {
    fn default() -> CommandRegistry {
        return CommandRegistry {
            entries: vec![
                CommandEntry {
                    name: "help",
                    usage: "/help",
                    description: "Shows this list of commands.",
                    run: help,
                },
                CommandEntry {
                    name: "clear",
                    usage: "/clear",
                    description: "Clears all messages. Pinned messages are kept.",
                    run: clear,
                },
                CommandEntry {
                    name: "about",
                    usage: "/about",
                    description: "Shows information about chatgate.",
                    run: about,
                },
                CommandEntry {
                    name: "theme",
                    usage: "/theme",
                    description: "Toggles between the light and dark theme.",
                    run: theme,
                },
                CommandEntry {
                    name: "save",
                    usage: "/save",
                    description: "Saves the chat to a text file named after today's date.",
                    run: save,
                },
                CommandEntry {
                    name: "copy",
                    usage: "/copy",
                    description: "Copies the chat to your clipboard.",
                    run: copy,
                },
                CommandEntry {
                    name: "stats",
                    usage: "/stats",
                    description: "Shows message, pin and history counts.",
                    run: stats,
                },
                CommandEntry {
                    name: "reset",
                    usage: "/reset",
                    description: "Clears all messages and your input history.",
                    run: reset,
                },
                CommandEntry {
                    name: "templates",
                    usage: "/templates",
                    description: "Lists prompt templates to get you started.",
                    run: templates,
                },
                CommandEntry {
                    name: "voice",
                    usage: "/voice",
                    description: "Records a single utterance and adds it to your message.",
                    run: voice,
                },
                CommandEntry {
                    name: "pinned",
                    usage: "/pinned",
                    description: "Lists your pinned messages.",
                    run: pinned,
                },
                CommandEntry {
                    name: "quit",
                    usage: "/quit",
                    description: "Exits chatgate.",
                    run: quit,
                },
            ],
        };
    }
}

impl CommandRegistry {
    pub fn entries(&self) -> &[CommandEntry] {
        return &self.entries;
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        return self.entries.iter().find(|e| return e.name == name);
    }

    /// Command reference used in `--help` output.
    pub fn help_text(&self) -> String {
        let lines = self
            .entries
            .iter()
            .map(|cmd| return format!("- {} - {}", cmd.usage, cmd.description))
            .collect::<Vec<String>>()
            .join("\n");

        return format!(
            "COMMANDS:\n{lines}\n\nHOTKEYS:\n- Up arrow - Previous entry in your input history\n- Down arrow - Next entry in your input history\n- PageUp / CTRL+U - Scroll up\n- PageDown / CTRL+D - Scroll down\n- CTRL+P - Pin or unpin the latest message\n- Long-press (hold the mouse button on a message) - Pin or unpin that message\n- CTRL+C - Exit"
        );
    }
}

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use chrono::Local;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::unknown_command_text;
use super::BubbleList;
use super::CommandContext;
use super::CommandEffect;
use super::CommandOutput;
use super::CommandRegistry;
use super::Preferences;
use super::Scroll;
use super::Themes;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendResponse;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::models::SpeechOutcome;
use crate::domain::models::TextArea;
use crate::domain::models::ThemeName;

/// Whether a completion request is outstanding. Free-text submissions are
/// only accepted while idle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatMode {
    Idle,
    AwaitingCompletion { request_id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryDirection {
    Previous,
    Next,
}

pub struct AppState<'a> {
    pub alert: Option<String>,
    pub bubble_list: BubbleList,
    pub chat_rect: Rect,
    pub commands: CommandRegistry,
    /// Cursor into `input_history`. `None` when not browsing.
    pub history_index: Option<usize>,
    /// Most recent entry first.
    pub input_history: Vec<String>,
    pub listening: bool,
    pub messages: Vec<Message>,
    pub mode: ChatMode,
    pub pinned_messages: Vec<Message>,
    pub pinned_rect: Option<Rect>,
    pub preferences: Preferences,
    pub scroll: Scroll,
    pub should_quit: bool,
    pub speech_supported: bool,
    pub textarea: tui_textarea::TextArea<'a>,
    pub theme: ThemeName,
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    return column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height);
}

impl<'a> AppState<'a> {
    /// Starts a fresh session. Pinned messages and the theme come from
    /// preferences; `theme_override` wins over the stored theme without being
    /// persisted.
    pub fn new(
        preferences: Preferences,
        theme_override: Option<ThemeName>,
        speech_supported: bool,
    ) -> AppState<'a> {
        let theme = theme_override.unwrap_or_else(|| return preferences.theme());
        let pinned_messages = preferences.pinned_messages();

        return AppState {
            alert: None,
            bubble_list: BubbleList::new(Themes::get(theme)),
            chat_rect: Rect::default(),
            commands: CommandRegistry::default(),
            history_index: None,
            input_history: vec![],
            listening: false,
            messages: vec![],
            mode: ChatMode::Idle,
            pinned_messages,
            pinned_rect: None,
            preferences,
            scroll: Scroll::default(),
            should_quit: false,
            speech_supported,
            textarea: TextArea::default(),
            theme,
        };
    }

    pub fn input(&self) -> String {
        return self.textarea.lines().join("\n");
    }

    pub fn set_input(&mut self, text: &str) {
        self.textarea = TextArea::with_text(text);
    }

    pub fn is_loading(&self) -> bool {
        return self.mode != ChatMode::Idle;
    }

    pub fn submit(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        if SlashCommand::is_command(text) {
            self.set_input("");
            return self.dispatch_command(text, tx);
        }

        if self.is_loading() {
            return Ok(());
        }

        self.add_message(Message::new(Role::User, text));

        let trimmed = text.trim();
        if self.input_history.first().map(|e| return e.as_str()) != Some(trimmed) {
            self.input_history.insert(0, trimmed.to_string());
        }
        self.history_index = None;
        self.set_input("");

        let request_id = Uuid::new_v4().to_string();
        self.mode = ChatMode::AwaitingCompletion {
            request_id: request_id.to_string(),
        };
        self.sync_dependants();

        tx.send(Action::BackendRequest(BackendPrompt::new(&request_id, text)))?;

        return Ok(());
    }

    pub fn dispatch_command(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let command = match SlashCommand::parse(text) {
            Some(command) => command,
            None => return Ok(()),
        };

        let output = match self.commands.get(&command.name) {
            Some(entry) => {
                let ctx = CommandContext {
                    commands: self.commands.entries(),
                    history_len: self.input_history.len(),
                    listening: self.listening,
                    messages: &self.messages,
                    model: Config::get(ConfigKey::Model),
                    pinned_messages: &self.pinned_messages,
                    speech_supported: self.speech_supported,
                    theme: self.theme,
                    today: Local::now().date_naive(),
                };
                (entry.run)(&ctx)
            }
            None => CommandOutput::message(&unknown_command_text(&command.name)),
        };

        tracing::debug!(
            command = command.name,
            effects = output.effects.len(),
            alert = output.alert.is_some(),
            "Dispatched command"
        );

        for effect in output.effects {
            self.apply_effect(effect, tx)?;
        }

        if let Some(alert) = output.alert {
            self.alert = Some(alert);
        }

        if let Some(message) = output.message {
            self.add_message(Message::command(&message));
        }

        return Ok(());
    }

    fn apply_effect(&mut self, effect: CommandEffect, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        match effect {
            CommandEffect::ClearMessages => {
                self.messages.clear();
                self.scroll = Scroll::default();
            }
            CommandEffect::ResetSession => {
                self.messages.clear();
                self.input_history.clear();
                self.history_index = None;
                self.scroll = Scroll::default();
            }
            CommandEffect::SetTheme(theme) => {
                self.set_theme(theme);
            }
            CommandEffect::Export(messages) => {
                tx.send(Action::ExportMessages(messages))?;
            }
            CommandEffect::CopyToClipboard(messages) => {
                tx.send(Action::CopyMessages(messages))?;
            }
            CommandEffect::StartListening => {
                self.listening = true;
                tx.send(Action::SpeechStart())?;
            }
            CommandEffect::Quit => {
                self.should_quit = true;
            }
        }

        return Ok(());
    }

    pub fn navigate_history(&mut self, direction: HistoryDirection) {
        let len = self.input_history.len();

        match direction {
            HistoryDirection::Previous => {
                let next = self.history_index.map_or(0, |idx| return idx + 1);
                if next < len {
                    self.history_index = Some(next);
                    let text = self.input_history[len - 1 - next].to_string();
                    self.set_input(&text);
                }
            }
            HistoryDirection::Next => match self.history_index {
                None => {}
                Some(0) => {
                    self.history_index = None;
                    self.set_input("");
                }
                Some(idx) => {
                    let next = idx - 1;
                    self.history_index = Some(next);
                    let text = self.input_history[len - 1 - next].to_string();
                    self.set_input(&text);
                }
            },
        }
    }

    /// Pins or unpins the message with the given id. Unknown ids are ignored.
    pub fn toggle_pin(&mut self, message_id: Option<&str>) {
        let id = match message_id {
            Some(id) => id,
            None => return,
        };

        if self.pinned_messages.iter().any(|e| return e.has_id(id)) {
            self.pinned_messages.retain(|e| return !e.has_id(id));
            for message in self.messages.iter_mut().filter(|e| return e.has_id(id)) {
                message.set_pinned(false);
            }
        } else {
            let message = match self.messages.iter_mut().find(|e| return e.has_id(id)) {
                Some(message) => message,
                None => return,
            };
            message.set_pinned(true);
            self.pinned_messages.push(message.pinned_copy());
        }

        self.preferences.set_pinned_messages(&self.pinned_messages);
        self.sync_dependants();
    }

    pub fn toggle_pin_last(&mut self) {
        let id = self
            .messages
            .iter()
            .rev()
            .find_map(|e| return e.id())
            .map(|e| return e.to_string());

        self.toggle_pin(id.as_deref());
    }

    pub fn handle_backend_response(&mut self, response: BackendResponse) {
        let outstanding = match &self.mode {
            ChatMode::AwaitingCompletion { request_id } => *request_id == response.request_id,
            ChatMode::Idle => false,
        };

        if outstanding {
            self.mode = ChatMode::Idle;
        } else {
            tracing::warn!(
                request_id = response.request_id,
                "Received a completion for a request that is not outstanding"
            );
        }

        self.add_message(response.message);
    }

    pub fn handle_speech_result(&mut self, outcome: SpeechOutcome) {
        self.listening = false;

        match outcome {
            SpeechOutcome::Transcript(transcript) => {
                let input = self.input();
                if input.trim().is_empty() {
                    self.set_input(&transcript);
                } else {
                    self.set_input(&format!("{input} {transcript}"));
                }
            }
            SpeechOutcome::NoSpeech => {
                self.alert = Some("No speech was detected. Please try again.".to_string());
            }
        }
    }

    pub fn handle_speech_error(&mut self, reason: &str) {
        self.listening = false;
        tracing::error!(reason, "Speech capture failed");
        self.add_message(Message::new(
            Role::System,
            "Voice input failed. Please try again.",
        ));
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn set_theme(&mut self, theme: ThemeName) {
        self.theme = theme;
        self.preferences.set_theme(theme);
        self.bubble_list.set_palette(Themes::get(theme));
        self.sync_dependants();
    }

    pub fn set_rect(&mut self, chat_rect: Rect, pinned_rect: Option<Rect>) {
        self.chat_rect = chat_rect;
        self.pinned_rect = pinned_rect;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.sync_dependants();
        self.scroll.last();
    }

    /// Id of the message drawn at the given terminal cell, looking at both the
    /// chat list and the pinned panel.
    pub fn message_id_at(&self, column: u16, row: u16) -> Option<String> {
        if let Some(pinned_rect) = self.pinned_rect {
            if rect_contains(pinned_rect, column, row) {
                // One line per pin, below the panel border.
                let idx = usize::from(row.checked_sub(pinned_rect.y + 1)?);
                return self
                    .pinned_messages
                    .get(idx)
                    .and_then(|e| return e.id())
                    .map(|e| return e.to_string());
            }
        }

        if !rect_contains(self.chat_rect, column, row) {
            return None;
        }

        let line = usize::from(row - self.chat_rect.y) + self.scroll.position;
        let idx = self.bubble_list.message_index_at(line)?;

        return self
            .messages
            .get(idx)
            .and_then(|e| return e.id())
            .map(|e| return e.to_string());
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(&self.messages, usize::from(self.chat_rect.width));

        self.scroll.set_state(
            self.bubble_list.len(),
            usize::from(self.chat_rect.height),
        );

        if self.is_loading() {
            self.scroll.last();
        }
    }
}

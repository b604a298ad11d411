#[cfg(test)]
#[path = "preferences_test.rs"]
mod tests;

use std::env;

use crate::domain::models::Message;
use crate::domain::models::StorageKey;
use crate::domain::models::StoreBox;
use crate::domain::models::ThemeName;

/// Theme and pinned message persistence. Reads never fail: missing or
/// invalid values fall back to defaults. Write failures are logged.
pub struct Preferences {
    store: StoreBox,
}

impl Preferences {
    pub fn new(store: StoreBox) -> Preferences {
        return Preferences { store };
    }

    pub fn theme(&self) -> ThemeName {
        match self.store.get(StorageKey::Theme) {
            Ok(Some(val)) => {
                if let Some(theme) = ThemeName::parse(&val) {
                    return theme;
                }
                tracing::warn!(value = val, "Stored theme is invalid");
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(error = ?err, "Failed to read theme");
            }
        }

        return ThemeName::from_colorfgbg(env::var("COLORFGBG").ok().as_deref());
    }

    pub fn set_theme(&self, theme: ThemeName) {
        if let Err(err) = self.store.set(StorageKey::Theme, &theme.to_string()) {
            tracing::error!(error = ?err, "Failed to save theme");
        }
    }

    pub fn pinned_messages(&self) -> Vec<Message> {
        let payload = match self.store.get(StorageKey::PinnedMessages) {
            Ok(Some(payload)) => payload,
            Ok(None) => return vec![],
            Err(err) => {
                tracing::error!(error = ?err, "Failed to read pinned messages");
                return vec![];
            }
        };

        match serde_json::from_str::<Vec<Message>>(&payload) {
            Ok(messages) => {
                return messages
                    .into_iter()
                    .map(|message| return message.pinned_copy())
                    .collect();
            }
            Err(err) => {
                tracing::error!(error = ?err, "Stored pinned messages are invalid");
                return vec![];
            }
        }
    }

    pub fn set_pinned_messages(&self, messages: &[Message]) {
        let payload = match serde_json::to_string(messages) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to serialize pinned messages");
                return;
            }
        };

        if let Err(err) = self.store.set(StorageKey::PinnedMessages, &payload) {
            tracing::error!(error = ?err, "Failed to save pinned messages");
        }
    }
}

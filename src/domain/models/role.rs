use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Name shown in the header of a chat bubble.
    pub fn display_name(&self) -> String {
        match self {
            Role::User => {
                let username = Config::get(ConfigKey::Username);
                if username.is_empty() {
                    return "You".to_string();
                }
                return username;
            }
            Role::Assistant => {
                let model = Config::get(ConfigKey::Model);
                if model.is_empty() {
                    return "Assistant".to_string();
                }
                return model;
            }
            Role::System => return "chatgate".to_string(),
        }
    }
}

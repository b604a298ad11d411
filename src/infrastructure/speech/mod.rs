pub mod command;

use std::sync::Arc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::SpeechRef;

pub struct SpeechManager {}

impl SpeechManager {
    pub fn get() -> SpeechRef {
        return Arc::new(command::CommandSpeech::new(&Config::get(
            ConfigKey::SpeechCommand,
        )));
    }
}

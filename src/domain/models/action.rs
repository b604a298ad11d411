use super::BackendPrompt;
use super::Message;

pub enum Action {
    BackendRequest(BackendPrompt),
    CopyMessages(Vec<Message>),
    ExportMessages(Vec<Message>),
    SpeechStart(),
}

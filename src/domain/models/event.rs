use tui_textarea::Input;

use super::BackendResponse;
use super::Message;
use super::SpeechOutcome;

pub enum Event {
    ActionMessage(Message),
    BackendResponse(BackendResponse),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLP(),
    KeyboardEnter(),
    KeyboardEsc(),
    KeyboardHistoryNext(),
    KeyboardHistoryPrevious(),
    KeyboardPaste(String),
    /// Press number and message id of a press held past the threshold.
    LongPress(u64, String),
    MouseDown(u16, u16),
    MouseDrag(),
    MouseUp(),
    SpeechError(String),
    SpeechResult(SpeechOutcome),
    UIResize(),
    UIScrollDown(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UIScrollUp(),
    UITick(),
}

use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use tui_textarea::CursorMove;

pub struct TextArea {}

impl<'a> TextArea {
    pub fn default() -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::default();
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title("Enter message (/help for commands)")
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }

    /// A prompt pre-filled with `text`, cursor placed at the end.
    pub fn with_text(text: &str) -> tui_textarea::TextArea<'a> {
        let mut textarea = TextArea::default();
        textarea.insert_str(text);
        textarea.move_cursor(CursorMove::Bottom);
        textarea.move_cursor(CursorMove::End);

        return textarea;
    }
}

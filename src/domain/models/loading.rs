use ratatui::prelude::Alignment;
use ratatui::prelude::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Default)]
pub struct Loading {
    frame_idx: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.frame_idx = (self.frame_idx + 1) % SPINNER.len();
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect, label: &str) {
        let spinner = SPINNER[self.frame_idx];
        frame.render_widget(
            Paragraph::new(format!("{spinner} {label}"))
                .style(Style::default().add_modifier(Modifier::ITALIC))
                .alignment(Alignment::Left),
            rect,
        );
    }
}

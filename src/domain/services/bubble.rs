#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use super::Palette;
use crate::domain::models::Message;
use crate::domain::models::Role;

#[derive(PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    palette: &'a Palette,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

fn width(text: &str) -> usize {
    return text.chars().count();
}

fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    if line.trim().is_empty() {
        return vec!["".to_string()];
    }

    let mut lines: Vec<String> = vec![];
    let mut current = String::new();

    for word in line.split(' ') {
        let mut word = word.to_string();
        // Words longer than a full line are hard broken.
        while width(&word) > max_width {
            if !current.is_empty() {
                lines.push(current);
                current = String::new();
            }
            let head = word.chars().take(max_width).collect::<String>();
            word = word.chars().skip(max_width).collect::<String>();
            lines.push(head);
        }

        if current.is_empty() {
            current = word;
        } else if width(&current) + 1 + width(&word) > max_width {
            lines.push(current);
            current = word;
        } else {
            current = format!("{current} {word}");
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    return lines;
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
        palette: &'a Palette,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            palette,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // Unicode character border + padding.
            bubble_padding: 8,
            // left border + left padding + (text, not counted) + right padding + right border +
            // scrollbar.
            border_elements_length: 5,
            outer_padding_percentage: 0.04,
        };
    }

    pub fn header(&self) -> String {
        let mut header = format!(
            "{} {}",
            self.message.role().display_name(),
            self.message.timestamp().format("%H:%M")
        );
        if self.message.is_pinned() {
            header = format!("{header} [pinned]");
        }

        return header;
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_length = self.get_max_line_length();

        let lines = self
            .display_content()
            .lines()
            .flat_map(|line| return wrap_line(line, max_line_length))
            .map(|line| return self.text_line(line, max_line_length))
            .collect::<Vec<Line<'static>>>();

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    // Tabs have no fixed terminal width.
    fn display_content(&self) -> String {
        return self.message.content().replace('\t', "  ");
    }

    fn text_line(&self, text: String, max_line_length: usize) -> Line<'static> {
        let fill = " ".repeat(max_line_length.saturating_sub(width(&text)));
        let formatted_line_length =
            max_line_length + Bubble::style_config().bubble_padding;
        let outer_bubble_padding =
            " ".repeat(self.window_max_width.saturating_sub(formatted_line_length));

        let mut text_style = Style::default().fg(self.palette.foreground);
        if self.message.is_command() {
            text_style = text_style.add_modifier(Modifier::ITALIC);
        }

        let mut spans = vec![
            self.border_span("│ ".to_string()),
            Span::styled(text, text_style),
            self.border_span(format!("{fill} │")),
        ];

        if self.alignment == BubbleAlignment::Left {
            spans.push(Span::from(outer_bubble_padding));
        } else {
            spans.insert(0, Span::from(outer_bubble_padding));
        }

        return Line::from(spans);
    }

    fn get_max_line_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let available = self.window_max_width.saturating_sub(line_border_width).max(1);

        let mut max_line_length = self
            .display_content()
            .lines()
            .map(width)
            .max()
            .unwrap_or(0)
            .min(available);

        // The header is drawn into the top border and must fit.
        max_line_length = max_line_length.max(width(&self.header()));

        return max_line_length;
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        let header = self.header();
        // Add 2 for the vertical bars.
        let inner_bar_length = max_line_length + 2;
        let top_bar = format!(
            "╭{header}{}╮",
            "─".repeat(inner_bar_length.saturating_sub(width(&header)))
        );
        let bottom_bar = format!("╰{}╯", "─".repeat(inner_bar_length));
        let bar_bubble_padding = " ".repeat(
            self.window_max_width
                .saturating_sub(max_line_length + Bubble::style_config().bubble_padding),
        );

        let (top, bottom) = if self.alignment == BubbleAlignment::Left {
            (
                format!("{top_bar}{bar_bubble_padding}"),
                format!("{bottom_bar}{bar_bubble_padding}"),
            )
        } else {
            (
                format!("{bar_bubble_padding}{top_bar}"),
                format!("{bar_bubble_padding}{bottom_bar}"),
            )
        };

        let mut res = vec![Line::from(self.border_span(top))];
        res.extend(lines);
        res.push(Line::from(self.border_span(bottom)));

        return res;
    }

    fn border_span(&self, text: String) -> Span<'static> {
        let colour = if self.message.is_pinned() {
            self.palette.pinned
        } else {
            self.palette.role_colour(self.message.role())
        };

        return Span::styled(text, Style::default().fg(colour));
    }
}

pub fn alignment_for(message: &Message) -> BubbleAlignment {
    if message.role() == Role::User {
        return BubbleAlignment::Right;
    }

    return BubbleAlignment::Left;
}

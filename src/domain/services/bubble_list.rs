use std::collections::HashMap;

use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::alignment_for;
use super::Bubble;
use super::Palette;
use crate::domain::models::Message;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

struct BubbleCacheEntry {
    id: Option<String>,
    pinned: bool,
    lines: Vec<Line<'static>>,
}

pub struct BubbleList {
    cache: HashMap<usize, BubbleCacheEntry>,
    line_width: usize,
    /// Start line of each message, in message order.
    offsets: Vec<usize>,
    lines_len: usize,
    palette: Palette,
}

impl BubbleList {
    pub fn new(palette: Palette) -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            line_width: 0,
            offsets: vec![],
            lines_len: 0,
            palette,
        };
    }

    pub fn set_palette(&mut self, palette: Palette) {
        if self.palette != palette {
            self.cache.clear();
            self.palette = palette;
        }
    }

    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }
        self.cache.retain(|idx, _| return *idx < messages.len());

        self.offsets = vec![];
        self.lines_len = 0;

        for (idx, message) in messages.iter().enumerate() {
            self.offsets.push(self.lines_len);

            if let Some(entry) = self.cache.get(&idx) {
                if entry.id.as_deref() == message.id() && entry.pinned == message.is_pinned() {
                    self.lines_len += entry.lines.len();
                    continue;
                }
            }

            let lines = Bubble::new(message, alignment_for(message), line_width, &self.palette)
                .as_lines();
            self.lines_len += lines.len();

            self.cache.insert(
                idx,
                BubbleCacheEntry {
                    id: message.id().map(|id| return id.to_string()),
                    pinned: message.is_pinned(),
                    lines,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    /// Index of the message drawn on the given line of the full list.
    pub fn message_index_at(&self, line: usize) -> Option<usize> {
        if line >= self.lines_len {
            return None;
        }

        return self
            .offsets
            .iter()
            .rposition(|offset| return *offset <= line);
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect, scroll: usize) {
        let mut indexes: Vec<usize> = self.cache.keys().cloned().collect();
        indexes.sort();
        let lines: Vec<Line<'static>> = indexes
            .iter()
            .filter_map(|idx| return self.cache.get(idx))
            .flat_map(|entry| return entry.lines.to_owned())
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
            rect,
        );
    }
}

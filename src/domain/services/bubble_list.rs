use std::collections::HashMap;
use std::collections::HashSet;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Message;
use crate::domain::models::MessageId;
use crate::domain::models::Role;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

struct BubbleCacheEntry {
    streaming: bool,
    text_len: usize,
    lines: Vec<Line<'static>>,
}

/// Rendered lines for every message, in display order. Only messages whose
/// text or streaming state changed since the last call are re-wrapped.
#[derive(Default)]
pub struct BubbleList {
    cache: HashMap<MessageId, BubbleCacheEntry>,
    order: Vec<MessageId>,
    line_width: u16,
    lines_len: usize,
}

impl BubbleList {
    pub fn set_messages(&mut self, messages: &[Message], line_width: u16) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.order = messages
            .iter()
            .map(|message| {
                return message.id();
            })
            .collect();

        let live: HashSet<MessageId> = self.order.iter().copied().collect();
        self.cache.retain(|id, _| {
            return live.contains(id);
        });

        self.lines_len = messages
            .iter()
            .map(|message| {
                if let Some(entry) = self.cache.get(&message.id()) {
                    if entry.text_len == message.text().len()
                        && entry.streaming == message.is_streaming()
                    {
                        return entry.lines.len();
                    }
                }

                let mut align = BubbleAlignment::Left;
                if message.role == Role::User {
                    align = BubbleAlignment::Right;
                }

                let lines = Bubble::new(message, align, usize::from(line_width)).as_lines();
                let lines_len = lines.len();

                self.cache.insert(
                    message.id(),
                    BubbleCacheEntry {
                        streaming: message.is_streaming(),
                        text_len: message.text().len(),
                        lines,
                    },
                );

                return lines_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn is_empty(&self) -> bool {
        return self.lines_len == 0;
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, scroll: u16) {
        let lines: Vec<Line<'static>> = self
            .order
            .iter()
            .filter_map(|id| {
                return self.cache.get(id);
            })
            .flat_map(|entry| {
                return entry.lines.to_owned();
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}

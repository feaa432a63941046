#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;

pub const STREAMING_CURSOR: &str = "▌";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub bubble_padding: usize,
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

/// Splits one line of text into rows no wider than `max_width` terminal
/// cells. Breaks on spaces where possible, and between characters for runs
/// without spaces such as CJK text.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    let mut rows = vec![];
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_inclusive(' ') {
        let word_width = word.trim_end().width();

        if current_width + word_width > max_width && !current.is_empty() {
            rows.push(current.trim_end().to_string());
            current = String::new();
            current_width = 0;
        }

        if word_width > max_width {
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > max_width && !current.is_empty() {
                    rows.push(current.trim_end().to_string());
                    current = String::new();
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
            continue;
        }

        current.push_str(word);
        current_width += word.width();
    }

    rows.push(current.trim_end().to_string());
    return rows;
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
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

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_text_width = self.get_max_text_width();

        let mut text = self.message.text().replace('\t', "  ");
        if self.message.is_streaming() {
            text.push_str(STREAMING_CURSOR);
        }

        let rows: Vec<String> = text
            .split('\n')
            .flat_map(|line| {
                return wrap_line(line.trim_end_matches('\r'), max_text_width);
            })
            .collect();

        let title = self.message.role.to_string();
        let max_line_length = rows
            .iter()
            .map(|row| {
                return row.width();
            })
            .max()
            .unwrap_or(0)
            .max(title.width());

        let lines = rows
            .into_iter()
            .map(|row| {
                return self.row_to_line(row, max_line_length);
            })
            .collect();

        return self.wrap_lines_in_bubble(lines, &title, max_line_length);
    }

    fn get_max_text_width(&self) -> usize {
        let style_config = Bubble::style_config();
        // Add a minimum 4% of padding on the side.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;

        // Border elements + minimum bubble padding.
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;

        return self
            .window_max_width
            .saturating_sub(line_border_width)
            .max(1);
    }

    fn outer_padding(&self, max_line_length: usize) -> String {
        let used = max_line_length + Bubble::style_config().bubble_padding;
        return " ".repeat(self.window_max_width.saturating_sub(used));
    }

    fn row_to_line(&self, row: String, max_line_length: usize) -> Line<'static> {
        let fill = " ".repeat(max_line_length.saturating_sub(row.width()));
        let outer_padding = self.outer_padding(max_line_length);

        let mut spans = vec![];
        if self.alignment == BubbleAlignment::Right {
            spans.push(Span::from(outer_padding.clone()));
        }
        spans.push(self.highlight_span("│ ".to_string()));
        spans.push(Span::from(row));
        spans.push(self.highlight_span(format!("{fill} │")));
        if self.alignment == BubbleAlignment::Left {
            spans.push(Span::from(outer_padding));
        }

        return Line::from(spans);
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        title: &str,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        // Add 2 for the padding inside the vertical bars.
        let inner_width = max_line_length + 2;
        let title_bar = "─".repeat(inner_width.saturating_sub(title.width()));
        let top_bar = format!("╭{title}{title_bar}╮");
        let bottom_bar = format!("╰{}╯", "─".repeat(inner_width));
        let outer_padding = self.outer_padding(max_line_length);

        let mut res = vec![];
        if self.alignment == BubbleAlignment::Left {
            res.push(self.highlight_line(format!("{top_bar}{outer_padding}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bottom_bar}{outer_padding}")));
        } else {
            res.push(self.highlight_line(format!("{outer_padding}{top_bar}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{outer_padding}{bottom_bar}")));
        }

        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'static> {
        if self.message.message_type() == MessageType::Error {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Red),
                    ..Style::default()
                },
            );
        } else if self.message.role == Role::Assistant {
            return Span::styled(
                text,
                Style {
                    fg: Some(Color::Rgb(255, 153, 0)), // Orange
                    ..Style::default()
                },
            );
        }

        return Span::from(text);
    }

    fn highlight_line(&self, text: String) -> Line<'static> {
        return Line::from(self.highlight_span(text));
    }
}

#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Role;

#[derive(PartialEq, Eq)]
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
    /// left border + left padding + (text, not counted) + right padding +
    /// right border.
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

fn width(text: &str) -> usize {
    return text.chars().count();
}

/// Word wraps a single line, hard splitting words that are longer than
/// `max_width` on their own.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines: Vec<String> = vec![];
    let mut current = String::new();

    for word in line.split(' ') {
        let mut word = word.to_string();
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
        } else if width(&current) + 1 + width(&word) <= max_width {
            current = format!("{current} {word}");
        } else {
            lines.push(current);
            current = word;
        }
    }
    lines.push(current.trim_end().to_string());

    return lines;
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a Message, alignment: BubbleAlignment, window_max_width: usize) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            border_elements_length: 4,
            outer_padding_percentage: 0.04,
        };
    }

    fn title(&self) -> String {
        return format!("{} {}", self.message.role.to_string(), self.message.timestamp);
    }

    /// Message text with tabs expanded, as it is drawn.
    fn display_text(&self) -> String {
        return self.message.text.replace('\t', "  ");
    }

    fn source_lines(&self) -> Vec<String> {
        return self
            .message
            .cited_sources()
            .iter()
            .map(|source| return format!("- {source}"))
            .collect();
    }

    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let max_line_length = self.get_max_line_length();
        let mut lines: Vec<Line<'static>> = vec![];

        for text_line in self.display_text().lines() {
            for segment in wrap_line(text_line, max_line_length) {
                lines.push(self.spans_to_line(vec![Span::raw(segment)], max_line_length));
            }
        }

        let sources = self.source_lines();
        if !sources.is_empty() {
            lines.push(self.spans_to_line(vec![], max_line_length));
            lines.push(self.spans_to_line(
                vec![Span::styled(
                    "Sources:".to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )],
                max_line_length,
            ));
            for source in sources {
                for segment in wrap_line(&source, max_line_length) {
                    lines.push(self.spans_to_line(
                        vec![Span::styled(segment, Style::default().fg(Color::Cyan))],
                        max_line_length,
                    ));
                }
            }
        }

        return self.wrap_lines_in_bubble(lines, max_line_length);
    }

    fn outer_padding(&self, bubble_width: usize) -> String {
        return " ".repeat(self.window_max_width.saturating_sub(bubble_width));
    }

    fn spans_to_line(&self, mut spans: Vec<Span<'static>>, max_line_length: usize) -> Line<'static> {
        let line_str_len: usize = spans.iter().map(|e| return width(&e.content)).sum();
        let fill = " ".repeat(max_line_length.saturating_sub(line_str_len));
        let outer_bubble_padding =
            self.outer_padding(max_line_length + Bubble::style_config().border_elements_length);

        let mut wrapped_spans = vec![self.highlight_span("│ ".to_string())];
        wrapped_spans.append(&mut spans);
        wrapped_spans.push(Span::raw(fill));
        wrapped_spans.push(self.highlight_span(" │".to_string()));

        if self.alignment == BubbleAlignment::Left {
            wrapped_spans.push(Span::raw(outer_bubble_padding));
            return Line::from(wrapped_spans);
        }

        let mut line_spans = vec![Span::raw(outer_bubble_padding)];
        line_spans.extend(wrapped_spans);

        return Line::from(line_spans);
    }

    fn get_max_line_length(&self) -> usize {
        let style_config = Bubble::style_config();
        // Keep at least 4% of the window free on the far side of the bubble.
        let min_bubble_padding_length = ((self.window_max_width as f32
            * style_config.outer_padding_percentage)
            .ceil()) as usize;
        let line_border_width = style_config.border_elements_length + min_bubble_padding_length;
        let available = self.window_max_width.saturating_sub(line_border_width).max(1);

        let display_text = self.display_text();
        let mut max_line_length = display_text
            .lines()
            .chain(self.source_lines().iter().map(|e| return e.as_str()))
            .map(width)
            .max()
            .unwrap_or(0);

        if !self.message.cited_sources().is_empty() {
            max_line_length = max_line_length.max(width("Sources:"));
        }

        if max_line_length > available {
            max_line_length = available;
        }

        // The title sits inside the top border, which is two wider than the
        // text area.
        let title_len = width(&self.title());
        if max_line_length + 2 < title_len {
            max_line_length = title_len.saturating_sub(2);
        }

        return max_line_length;
    }

    fn wrap_lines_in_bubble(
        &self,
        lines: Vec<Line<'static>>,
        max_line_length: usize,
    ) -> Vec<Line<'static>> {
        let title = self.title();
        let inner_bar = "─".repeat((max_line_length + 2).saturating_sub(width(&title)));
        let top_bar = format!("╭{title}{inner_bar}╮");
        let bottom_bar = format!("╰{}╯", "─".repeat(max_line_length + 2));
        let bar_bubble_padding =
            self.outer_padding(max_line_length + Bubble::style_config().border_elements_length);

        let mut res = vec![];
        if self.alignment == BubbleAlignment::Left {
            res.push(self.highlight_line(format!("{top_bar}{bar_bubble_padding}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bottom_bar}{bar_bubble_padding}")));
        } else {
            res.push(self.highlight_line(format!("{bar_bubble_padding}{top_bar}")));
            res.extend(lines);
            res.push(self.highlight_line(format!("{bar_bubble_padding}{bottom_bar}")));
        }

        return res;
    }

    fn highlight_span(&self, text: String) -> Span<'static> {
        if self.message.message_type() == MessageType::Error {
            return Span::styled(text, Style::default().fg(Color::Red));
        }
        if self.message.role == Role::Assistant {
            return Span::styled(text, Style::default().fg(Color::Rgb(34, 211, 238)));
        }

        return Span::raw(text);
    }

    fn highlight_line(&self, text: String) -> Line<'static> {
        return Line::from(self.highlight_span(text));
    }
}

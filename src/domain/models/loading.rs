#[cfg(test)]
#[path = "loading_test.rs"]
mod tests;

use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Pending indicator shown in place of the prompt. Advanced once per UI tick.
#[derive(Default)]
pub struct Loading {
    step: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.step = (self.step + 1) % SPINNER.len();
    }

    pub fn line(&self, label: &str) -> Line<'static> {
        return Line::from(vec![
            Span::styled(
                format!("{} ", SPINNER[self.step]),
                Style::default().fg(Color::Rgb(34, 211, 238)),
            ),
            Span::raw(label.to_string()),
        ]);
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect, label: &str) {
        frame.render_widget(
            Paragraph::new(self.line(label))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Double)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            rect,
        );
    }
}

#[cfg(test)]
#[path = "inspector_test.rs"]
mod tests;

use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use super::AppState;
use crate::domain::models::UploadStatus;

const PREVIEW_LENGTH: usize = 120;

fn header(text: &str) -> Line<'static> {
    return Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
}

fn row(label: &str, value: String) -> Line<'static> {
    return Line::from(vec![
        Span::styled(format!("{label:<18}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ]);
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    return value
        .map(|e| return e.to_string())
        .unwrap_or_else(|| return "-".to_string());
}

fn preview(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<&str>>().join(" ");
    if flat.chars().count() <= PREVIEW_LENGTH {
        return flat;
    }

    let cut = flat.chars().take(PREVIEW_LENGTH - 3).collect::<String>();
    return format!("{}...", cut.trim_end());
}

/// Side panel with the latest status snapshots, the active document and any
/// chunks loaded with `/inspect`. Missing snapshots render as `-` rather
/// than a made up value.
pub struct Inspector {}

impl Inspector {
    pub fn lines(app_state: &AppState) -> Vec<Line<'static>> {
        let status = app_state.system_status.as_ref();
        let stats = app_state.collection_stats.as_ref();

        let mut lines = vec![
            header("SYSTEM HEALTH"),
            row(
                "Memory",
                or_dash(status.and_then(|e| return e.ram_percent).map(|e| return format!("{e}%"))),
            ),
            row(
                "CPU",
                or_dash(status.and_then(|e| return e.cpu_percent).map(|e| return format!("{e}%"))),
            ),
            row(
                "LLM",
                or_dash(status.and_then(|e| return e.llm_model.clone())),
            ),
            row(
                "Embeddings",
                or_dash(status.and_then(|e| return e.embedding_model.clone())),
            ),
            Line::from(""),
            header("GRAPH STATUS"),
            row("Vectors indexed", or_dash(stats.map(|e| return e.count))),
            row(
                "Dimensions",
                or_dash(status.and_then(|e| return e.embedding_dimensions)),
            ),
            row("Collection", or_dash(stats.and_then(|e| return e.name.clone()))),
            Line::from(""),
            header("MODEL"),
            row("Active", app_state.model.display_name().to_string()),
        ];

        if !app_state.upload.file_name.is_empty() {
            let mut status_style = Style::default().fg(Color::Green);
            if app_state.upload.status == UploadStatus::Error {
                status_style = Style::default().fg(Color::Red);
            } else if app_state.upload.status == UploadStatus::Uploading {
                status_style = Style::default().fg(Color::Yellow);
            }

            lines.push(Line::from(""));
            lines.push(header("ACTIVE CONTEXT"));
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", app_state.upload.file_name)),
                Span::styled(format!("({})", app_state.upload.status), status_style),
            ]));
        }

        if let Some(chunks) = &app_state.inspected_documents {
            lines.push(Line::from(""));
            lines.push(header(&format!("CHUNKS ({})", chunks.len())));
            if chunks.is_empty() {
                lines.push(Line::from("No documents indexed yet."));
            }
            for chunk in chunks {
                lines.push(Line::from(Span::styled(
                    chunk.location(),
                    Style::default().fg(Color::Magenta),
                )));
                lines.push(Line::from(preview(&chunk.content)));
            }
        }

        return lines;
    }

    pub fn render<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
        frame.render_widget(
            Paragraph::new(Inspector::lines(app_state))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .title("Neural Inspector")
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .wrap(Wrap { trim: false }),
            rect,
        );
    }
}

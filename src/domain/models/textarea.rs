use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

pub struct TextArea {}

impl<'a> TextArea {
    pub fn default() -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::default();
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Ask a question about your document...")
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }

    pub fn confirmation() -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::default();
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title("Clear the knowledge base? This action cannot be undone. (y/n)")
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }
}

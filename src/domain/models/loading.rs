use ratatui::prelude::Alignment;
use ratatui::prelude::Backend;
use ratatui::prelude::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Placeholder for a panel that has not received its first response yet.
pub struct Loading<'a> {
    title: &'a str,
}

impl<'a> Loading<'a> {
    pub fn new(title: &'a str) -> Loading<'a> {
        return Loading { title };
    }

    pub fn render<B: Backend>(&self, frame: &mut Frame<B>, rect: Rect) {
        frame.render_widget(
            Paragraph::new("Loading...")
                .block(
                    Block::default()
                        .title(self.title)
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .padding(Padding::new(1, 1, 0, 0)),
                )
                .alignment(Alignment::Center),
            rect,
        );
    }
}

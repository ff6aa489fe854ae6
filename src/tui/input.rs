use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tui_textarea::TextArea;

/// Single-line query input, wrapping tui-textarea
pub struct InputWidget {
    textarea: TextArea<'static>,
}

impl InputWidget {
    pub fn new() -> Self {
        Self {
            textarea: query_textarea(),
        }
    }

    /// Handle keyboard input (Enter is handled by the caller)
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.textarea.input(key);
    }

    /// Get the current text and clear the input
    pub fn take_text(&mut self) -> String {
        let text = self.textarea.lines().join(" ");
        self.textarea = query_textarea();
        text
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.textarea, area);
    }
}

impl Default for InputWidget {
    fn default() -> Self {
        Self::new()
    }
}

fn query_textarea() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(Span::styled(
                " Enter your query (Enter=search │ Ctrl+C=quit) ",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    textarea.set_placeholder_text("Enter Search Keywords");
    textarea.set_cursor_line_style(Style::default());
    textarea
}

//! Animated loading spinner line.

use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::{self, Theme};

/// Render a centered spinner followed by `label`.
pub fn render(frame: &mut Frame, theme: &Theme, tick: u64, area: Rect, label: &str) {
    let line = Line::from(vec![
        Span::styled(format!("{} ", theme::spinner_frame(tick)), theme.title()),
        Span::styled(label, theme.text()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

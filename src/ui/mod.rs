//! Top-level UI render dispatch.
//!
//! Splits the terminal frame into:
//! - Header (top, 3 lines): title, query controls, search box
//! - Body: loading / error / "no results" / movie grid
//! - Key hints bar (bottom, 1 line)
//! - Popup overlay (detail or help), on top of everything

pub mod detail;
pub mod header;
pub mod help;
pub mod key_bar;
pub mod movie_grid;
pub mod popup;
pub mod spinner;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::app::App;
use crate::theme::Theme;

/// Render the entire UI. Reads `app`, never changes it.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.theme_mode);

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // key hints bar
        ])
        .split(frame.area());

    header::render(frame, app, &theme, outer[0]);
    movie_grid::render(frame, app, &theme, outer[1]);
    key_bar::render(frame, app, &theme, outer[2]);

    if let Some(ref popup_data) = app.active_popup {
        popup::render(frame, app, &theme, popup_data);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::app::App;

    /// Draw `app` into an off-screen terminal and return its text, one line
    /// per row.
    pub fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

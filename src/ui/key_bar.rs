//! Key hint bar at the bottom of the screen, adapted to the input mode.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::help::key_name;
use crate::app::{App, InputMode, Popup};
use crate::config;
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let hints = match app.input_mode {
        InputMode::Normal => normal_hints(app),
        InputMode::Search => vec![
            ("⏎".to_string(), "Done"),
            ("Esc".to_string(), "Clear"),
            ("⌫".to_string(), "Delete"),
        ],
        InputMode::Dialog => match app.active_popup {
            Some(Popup::Detail { .. }) => vec![("Esc".to_string(), "Close details")],
            _ => vec![("Esc".to_string(), "Close")],
        },
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", theme.dim()));
        }
        spans.push(Span::styled(key, theme.title().add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(format!(" {desc}"), theme.dim()));
    }
    if app.input_mode == InputMode::Search {
        spans.push(Span::styled("  │  Type to search…", theme.dim()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn normal_hints(app: &App) -> Vec<(String, &'static str)> {
    let kb = &config::get().keys;
    let mut hints = Vec::with_capacity(8);
    if !app.movies.is_empty() {
        hints.push((key_name(kb.open_detail), "Details"));
    }
    hints.push((key_name(kb.search), "Search"));
    hints.push((key_name(kb.sort_next), "Sort"));
    hints.push((key_name(kb.genre_next), "Genre"));
    hints.push((
        format!("{}/{}", key_name(kb.page_prev), key_name(kb.page_next)),
        "Page",
    ));
    hints.push((key_name(kb.toggle_theme), "Theme"));
    hints.push((key_name(kb.help), "Help"));
    hints.push((key_name(kb.quit), "Quit"));
    hints
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::app::App;
    use crate::ui::test_support::render_to_string;

    #[test]
    fn hints_follow_input_mode() {
        let mut app = App::new();
        let text = render_to_string(&app, 120, 20);
        assert!(text.contains("Search"));
        assert!(text.contains("p/n Page"));

        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
        let text = render_to_string(&app, 120, 20);
        assert!(text.contains("Type to search"));
    }
}

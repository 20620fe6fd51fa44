//! Body area: loading indicator, error banner, "No Movies Found", or the card
//! grid with its pagination line.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::spinner;
use crate::app::App;
use crate::catalog::types::Movie;
use crate::config;
use crate::theme::{self, Theme};

/// Cards per row for a grid of this inner width.
pub fn columns_for(inner_width: u16) -> usize {
    let card_width = config::get().general.card_width.max(1);
    usize::from((inner_width / card_width).max(1))
}

/// Inner width of the body block for a terminal of this width.
pub fn inner_width(terminal_width: u16) -> u16 {
    terminal_width.saturating_sub(2)
}

/// First visible row so that `selected_row` stays on screen.
fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = match app.movies.len() {
        0 => " Movies ".to_string(),
        n => format!(" Movies ({n}) "),
    };
    let block = Block::default()
        .title(Span::styled(title, theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.border_inactive());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.is_loading() {
        spinner::render(frame, theme, app.tick_count, centered_line(inner), "Loading movies…");
        return;
    }

    if let Some(message) = app.error_message() {
        let paragraph = Paragraph::new(Line::from(Span::styled(message, theme.error())))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered_line(inner));
        return;
    }

    if app.movies.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No Movies Found",
            theme.title(),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, centered_line(inner));
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    render_cards(frame, app, theme, chunks[0]);
    render_pagination(frame, app, theme, chunks[1]);
}

/// A one-line-high strip (or more, for wrapped errors) in the vertical middle.
fn centered_line(area: Rect) -> Rect {
    let height = area.height.min(3);
    Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: area.width,
        height,
    }
}

fn render_cards(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let general = &config::get().general;
    let cols = columns_for(area.width);
    let card_width = area.width / cols as u16;
    let card_height = general.card_height.min(area.height.max(1));
    let visible_rows = usize::from((area.height / card_height.max(1)).max(1));

    let selected_row = app.selected_index / cols;
    let first_row = first_visible_row(selected_row, visible_rows);

    for (index, movie) in app.movies.iter().enumerate() {
        let row = index / cols;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = index % cols;
        let card_area = Rect {
            x: area.x + col as u16 * card_width,
            y: area.y + (row - first_row) as u16 * card_height,
            width: card_width,
            height: card_height,
        };
        render_card(frame, theme, movie, index == app.selected_index, card_area);
    }
}

fn render_card(frame: &mut Frame, theme: &Theme, movie: &Movie, selected: bool, area: Rect) {
    let block = Block::default().borders(Borders::ALL).border_style(if selected {
        theme.border_active()
    } else {
        theme.border_inactive()
    });

    let year = movie
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());
    let poster = if movie.poster_path.is_some() {
        "▣ poster"
    } else {
        "□ no poster"
    };

    let lines = vec![
        Line::from(Span::styled(
            movie.title.as_str(),
            if selected { theme.selected() } else { theme.title() },
        )),
        Line::from(vec![
            Span::styled(year, theme.text()),
            Span::raw("  "),
            Span::styled(format!("{} {}", theme::STAR, movie.rating_display()), theme.rating()),
        ]),
        Line::from(Span::styled(poster, theme.dim())),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_pagination(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let previous = if app.query.page > 1 {
        theme.label()
    } else {
        theme.dim()
    };
    let line = Line::from(vec![
        Span::styled("◀ Previous (p)", previous),
        Span::styled(format!("    Page {}    ", app.query.page), theme.text()),
        Span::styled("Next (n) ▶", theme.label()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::catalog::types::CatalogEvent;
    use crate::ui::test_support::render_to_string;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.into(),
            original_title: None,
            poster_path: None,
            release_date: Some("2014-11-05".into()),
            vote_average: 8.4,
            overview: None,
            genre_ids: vec![],
        }
    }

    fn respond(app: &mut App, result: Result<Vec<Movie>, String>) {
        let query = app.poll_fetch(Instant::now()).unwrap_or_default();
        app.handle_catalog_event(CatalogEvent::Movies { query, result });
    }

    #[test]
    fn column_count_follows_width() {
        assert_eq!(columns_for(0), 1);
        assert_eq!(columns_for(29), 1);
        assert_eq!(columns_for(60), 2);
        assert_eq!(columns_for(125), 4);
        assert_eq!(inner_width(122), 120);
    }

    #[test]
    fn scrolls_to_keep_selection_visible() {
        assert_eq!(first_visible_row(0, 3), 0);
        assert_eq!(first_visible_row(2, 3), 0);
        assert_eq!(first_visible_row(5, 3), 3);
        assert_eq!(first_visible_row(4, 1), 4);
    }

    #[test]
    fn loading_shows_spinner_not_grid() {
        let mut app = App::new();
        app.poll_fetch(Instant::now());
        let text = render_to_string(&app, 100, 30);
        assert!(text.contains("Loading movies"));
        assert!(!text.contains("No Movies Found"));
    }

    #[test]
    fn empty_success_shows_no_results() {
        let mut app = App::new();
        respond(&mut app, Ok(vec![]));
        let text = render_to_string(&app, 100, 30);
        assert!(text.contains("No Movies Found"));
        assert!(!text.contains("Failed to fetch movies."));
    }

    #[test]
    fn failure_shows_message_and_no_cards() {
        let mut app = App::new();
        respond(&mut app, Ok(vec![movie(1, "Interstellar")]));
        app.query.next_page();
        respond(&mut app, Err("Failed to fetch movies.".into()));

        let text = render_to_string(&app, 100, 30);
        assert!(text.contains("Failed to fetch movies."));
        assert!(!text.contains("No Movies Found"));
        assert!(!text.contains("Interstellar"));
    }

    #[test]
    fn cards_show_title_year_and_rating() {
        let mut app = App::new();
        respond(&mut app, Ok(vec![movie(1, "Interstellar"), movie(2, "Whiplash")]));
        let text = render_to_string(&app, 100, 30);
        assert!(text.contains("Interstellar"));
        assert!(text.contains("Whiplash"));
        assert!(text.contains("2014"));
        assert!(text.contains("8.4"));
        assert!(text.contains("Page 1"));
        assert!(text.contains("Movies (2)"));
    }
}

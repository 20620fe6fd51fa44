//! Detail overlay for the selected movie.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::catalog::client::poster_url;
use crate::catalog::types::Movie;
use crate::config;
use crate::theme::{self, Theme};

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, movie: &Movie, area: Rect) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", movie.title), theme.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent_secondary()));

    let poster = match movie.poster_path.as_deref() {
        Some(path) => poster_url(&config::get().catalog.image_base_url, path),
        None => "none".to_string(),
    };

    let mut lines = vec![Line::from("")];
    if let Some(original) = movie
        .original_title
        .as_deref()
        .filter(|original| *original != movie.title)
    {
        lines.push(field(theme, "Original Title", original.to_string()));
    }
    lines.push(field(theme, "Release Date", movie.release_date_display()));
    lines.push(Line::from(vec![
        Span::styled("  Rating: ", theme.label()),
        Span::styled(
            format!("{} {}", theme::STAR, movie.rating_display()),
            theme.rating(),
        ),
    ]));
    lines.push(field(theme, "Genres", app.genres.names_for(&movie.genre_ids)));
    lines.push(field(theme, "Poster", poster));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Overview:", theme.label())));
    lines.push(Line::from(Span::styled(
        format!("  {}", movie.overview_text()),
        theme.text(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Press ESC to close", theme.dim())));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn field<'a>(theme: &Theme, name: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {name}: "), theme.label()),
        Span::styled(value, theme.text()),
    ])
}

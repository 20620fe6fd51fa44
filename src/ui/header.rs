//! Header with the query controls: sort, genre filter, page, theme, and the
//! search box underneath.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::theme::{self, Theme};

pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut controls = vec![
        Span::styled(" 🎬 reelview ", theme.title()),
        Span::styled("│ ", theme.dim()),
        Span::styled("Sort: ", theme.dim()),
        Span::styled(app.query.sort.label(), theme.text()),
        Span::styled(" │ ", theme.dim()),
        Span::styled("Genre: ", theme.dim()),
        Span::styled(app.genre_label(), theme.text()),
        Span::styled(" │ ", theme.dim()),
        Span::styled(format!("Page {}", app.query.page), theme.text()),
        Span::styled(" │ ", theme.dim()),
        Span::styled(app.theme_mode.toggle_icon(), theme.label()),
    ];
    if app.is_loading() {
        controls.push(Span::styled(" │ ", theme.dim()));
        controls.push(Span::styled(
            theme::spinner_frame(app.tick_count),
            theme.title(),
        ));
    }

    let searching = app.input_mode == InputMode::Search;
    let mut search = vec![Span::styled(" Search: ", theme.label())];
    if app.query.search.is_empty() && !searching {
        search.push(Span::styled("press / to search for movies…", theme.dim()));
    } else {
        search.push(Span::styled(
            app.query.search.clone(),
            theme.text().add_modifier(Modifier::ITALIC),
        ));
    }
    if searching {
        search.push(Span::styled("█", theme.title()));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(if searching {
            theme.border_active()
        } else {
            theme.border_inactive()
        });

    let paragraph = Paragraph::new(vec![Line::from(controls), Line::from(search)]).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::catalog::types::{Genre, GenreSet, SortKey};
    use crate::ui::test_support::render_to_string;

    #[test]
    fn shows_query_controls() {
        let mut app = App::new();
        app.genres = GenreSet::new(vec![Genre { id: 35, name: "Comedy".into() }]);
        app.query.set_sort(SortKey::RatingDesc);
        app.query.set_genre(Some(35));
        app.query.next_page();

        let text = render_to_string(&app, 140, 20);
        assert!(text.contains("Sort: Rating Descending"));
        assert!(text.contains("Genre: Comedy"));
        assert!(text.contains("Page 2"));
    }

    #[test]
    fn search_text_is_echoed() {
        let mut app = App::new();
        app.query.set_search("heat");
        let text = render_to_string(&app, 100, 20);
        assert!(text.contains("Search: heat"));
    }
}

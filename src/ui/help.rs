//! Help overlay: the configured key bindings, grouped.

use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::config;
use crate::theme::Theme;

/// Display name for a key, the inverse of the config's key parser.
pub fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "↑".into(),
        KeyCode::Down => "↓".into(),
        KeyCode::Left => "←".into(),
        KeyCode::Right => "→".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Insert => "Insert".into(),
        _ => "—".into(),
    }
}

pub fn render(frame: &mut Frame, theme: &Theme, area: Rect) {
    frame.render_widget(Clear, area);
    let kb = &config::get().keys;

    let block = Block::default()
        .title(Span::styled(" Keybindings ", theme.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent_secondary()));

    let pair = |a: KeyCode, b: KeyCode| format!("{} / {}", key_name(a), key_name(b));
    let sections = vec![
        (
            "Browse",
            vec![
                (
                    format!(
                        "{}{}{}{}",
                        key_name(kb.nav_left),
                        key_name(kb.nav_down),
                        key_name(kb.nav_up),
                        key_name(kb.nav_right)
                    ),
                    "Move between cards (arrows work too)",
                ),
                (pair(kb.jump_top, kb.jump_bottom), "First / last card"),
                (key_name(kb.open_detail), "Show movie details"),
            ],
        ),
        (
            "Query",
            vec![
                (key_name(kb.search), "Search (live, every keystroke)"),
                (pair(kb.sort_next, kb.sort_prev), "Next / previous sort order"),
                (pair(kb.genre_next, kb.genre_prev), "Next / previous genre filter"),
                (pair(kb.page_next, kb.page_prev), "Next / previous page"),
            ],
        ),
        (
            "Other",
            vec![
                (key_name(kb.toggle_theme), "Toggle dark / light theme"),
                (key_name(kb.help), "Toggle this help"),
                (key_name(kb.quit), "Quit"),
                ("Esc".to_string(), "Close popup / leave search"),
            ],
        ),
    ];

    let mut lines = vec![Line::from("")];
    for (section, bindings) in sections {
        lines.push(Line::from(Span::styled(
            format!("  ── {section} ──"),
            Style::default()
                .fg(theme.accent())
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        for (key, desc) in bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("    {key:<12}"), theme.label()),
                Span::styled(desc, theme.text()),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "  Press ESC or ? to close",
        theme.dim(),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

//! Dark and light palettes plus the composite styles built from them.
//!
//! No style sets a background: the terminal's own background shows through
//! in both modes. The two modes differ only in foreground colours.

use ratatui::style::{Color, Modifier, Style};

use crate::config::{self, Palette};

/// Star shown next to ratings.
pub const STAR: &str = "★";

/// Which palette is active. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Header glyph: the sun switches to light, the moon to dark.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemeMode::Dark => "☀",
            ThemeMode::Light => "☾",
        }
    }
}

/// Composite styles for one palette.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    palette: Palette,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let themes = &config::get().theme;
        let palette = match mode {
            ThemeMode::Dark => themes.dark,
            ThemeMode::Light => themes.light,
        };
        Self { palette }
    }

    pub fn accent(&self) -> Color {
        self.palette.accent_primary
    }

    pub fn accent_secondary(&self) -> Color {
        self.palette.accent_secondary
    }

    /// Title / header style.
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.palette.text_primary)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }

    pub fn label(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn rating(&self) -> Style {
        Style::default().fg(self.palette.rating)
    }

    /// Highlighted card title.
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.palette.accent_secondary)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    pub fn border_active(&self) -> Style {
        Style::default().fg(self.palette.accent_primary)
    }

    pub fn border_inactive(&self) -> Style {
        Style::default().fg(self.palette.border_inactive)
    }
}

// ─── Spinner frames ─────────────────────────────────────────────────────────

/// Braille-dot spinner frames for the loading animation.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_toggle_back_and_forth() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_dark_flag(false), ThemeMode::Light);
    }

    #[test]
    fn palettes_differ_between_modes() {
        let dark = Theme::for_mode(ThemeMode::Dark);
        let light = Theme::for_mode(ThemeMode::Light);
        assert_ne!(dark.text(), light.text());
    }

    #[test]
    fn spinner_wraps() {
        assert_eq!(spinner_frame(0), spinner_frame(SPINNER_FRAMES.len() as u64));
    }
}

//! Overlay dispatch and geometry, with the slide-in entrance animation.

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::app::{App, Popup};
use crate::theme::Theme;

/// Render the active popup overlay.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme, popup: &Popup) {
    match popup {
        Popup::Detail { slide, .. } => {
            if let Some(movie) = app.selected_movie() {
                let area = slide_from_top(centered_rect(60, 60, frame.area()), *slide);
                super::detail::render(frame, app, theme, movie, area);
            }
        }
        Popup::Help => {
            super::help::render(frame, theme, centered_rect(60, 80, frame.area()));
        }
    }
}

/// A rectangle of `percent_x`% × `percent_y`% centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (area.width as u32 * percent_x.min(100) as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y.min(100) as u32 / 100) as u16;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect { x, y, width, height }
}

/// Shift `target` up by the unfinished share of the animation. `progress`
/// runs 0.0 → 1.0.
fn slide_from_top(target: Rect, progress: f32) -> Rect {
    let progress = progress.clamp(0.0, 1.0);
    let offset = ((1.0 - progress) * target.y as f32) as u16;
    Rect {
        y: target.y.saturating_sub(offset),
        ..target
    }
}

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Cell;

mod commits;
mod help;
mod plot;
mod summary;

pub use commits::draw_commits_view;
pub use help::draw_help_overlay;
pub use plot::{draw_plot_view, draw_side_panel};
pub use summary::draw_summary_view;

/// Convenience helper to build a styled table header cell.
pub(crate) fn header_cell(text: &str, color: Color) -> Cell<'static> {
    Cell::from(text.to_string()).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Truncate a string to `max` chars with an ellipsis when necessary.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

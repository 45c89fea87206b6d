use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::plot::PlotLayout;

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Map a terminal cell inside `area` to the centre of that cell in plot
/// pixel space. Cells outside the area give `None`.
pub fn cell_to_plot(area: Rect, layout: &PlotLayout, column: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }
    let usable = layout.usable();
    let fx = (column - area.x) as f64 + 0.5;
    let fy = (row - area.y) as f64 + 0.5;
    Some((
        usable.left + fx / area.width as f64 * usable.width,
        usable.top + fy / area.height as f64 * usable.height,
    ))
}

/// Brush anchor for a cell. Cells outside the area are clamped onto its
/// edge. The first and last column and row land exactly on the usable bounds.
pub fn brush_point(area: Rect, layout: &PlotLayout, column: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let column = column.clamp(area.x, area.x + area.width - 1);
    let row = row.clamp(area.y, area.y + area.height - 1);
    let usable = layout.usable();
    let fraction = |offset: u16, len: u16| {
        if len <= 1 {
            0.5
        } else {
            offset as f64 / (len - 1) as f64
        }
    };
    Some((
        usable.left + fraction(column - area.x, area.width) * usable.width,
        usable.top + fraction(row - area.y, area.height) * usable.height,
    ))
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Rectangle};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::super::draw::{dot_color, language_style, share_bar};
use super::super::state::TuiState;
use crate::plot::{hour_label, hour_ticks};
use crate::scale::time_tick_label;
use crate::selection::{Selection, SelectionView};
use crate::session::RenderSession;

/// Render the scatter plot canvas and the selection / tooltip side panel.
/// Records the canvas area in `state` so mouse cells can be mapped back.
pub fn draw_plot_view(
    f: &mut Frame,
    area: Rect,
    session: &RenderSession,
    view: &SelectionView,
    brush: Option<&Selection>,
    state: &mut TuiState,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(area);

    let title = if state.brushing {
        format!("Commits by time of day | {} | Esc to clear", view.message)
    } else {
        "Commits by time of day | drag to select, 'h' for help".to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    state.plot_area = Some(block.inner(chunks[0]));

    let plot = &session.plot;
    let usable = plot.layout.usable();
    let hovered = state.hover.hovered();

    // Canvas y grows upward, plot pixels grow downward: draw at -y.
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([usable.left, usable.right])
        .y_bounds([-usable.bottom, -usable.top])
        .paint(|ctx| {
            for tick in hour_ticks(2) {
                let y = -plot.y.map(tick);
                ctx.draw(&CanvasLine {
                    x1: usable.left,
                    y1: y,
                    x2: usable.right,
                    y2: y,
                    color: Color::DarkGray,
                });
            }
            ctx.layer();

            for (i, dot) in plot.dots.iter().enumerate() {
                let selected = view.selected.get(dot.commit).copied().unwrap_or(false);
                ctx.draw(&Circle {
                    x: dot.cx,
                    y: -dot.cy,
                    radius: dot.r,
                    color: dot_color(selected, hovered == Some(i)),
                });
            }

            if let Some(sel) = brush {
                ctx.layer();
                ctx.draw(&Rectangle {
                    x: sel.x0,
                    y: -sel.y1,
                    width: sel.x1 - sel.x0,
                    height: sel.y1 - sel.y0,
                    color: Color::White,
                });
            }

            for tick in hour_ticks(6) {
                ctx.print(
                    usable.left,
                    -plot.y.map(tick),
                    Span::styled(hour_label(tick), Style::default().fg(Color::Gray)),
                );
            }
            for tick in plot.x.ticks(5) {
                ctx.print(
                    plot.x.map(&tick),
                    -usable.bottom,
                    Span::styled(time_tick_label(&tick), Style::default().fg(Color::Gray)),
                );
            }
        });
    f.render_widget(canvas, chunks[0]);

    draw_side_panel(f, chunks[1], session, view, state);
}

/// Selection count, per-language breakdown and the hovered commit's details.
pub fn draw_side_panel(
    f: &mut Frame,
    area: Rect,
    session: &RenderSession,
    view: &SelectionView,
    state: &TuiState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(9)])
        .split(area);

    let count_style = if view.count() > 0 {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let count = Paragraph::new(Line::from(Span::styled(view.message.clone(), count_style))).block(
        Block::default()
            .title("Selection")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(count, chunks[0]);

    let bar_width = chunks[1].width.saturating_sub(22).max(4) as usize;
    let breakdown: Vec<Line> = if view.breakdown.is_empty() {
        vec![Line::from(Span::styled(
            "Brush over the plot to see languages",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        view.breakdown
            .iter()
            .enumerate()
            .map(|(i, share)| {
                Line::from(vec![
                    Span::styled(format!("{:<8} ", super::truncate(&share.language, 8)), language_style(i)),
                    Span::styled(share_bar(share.proportion, bar_width), language_style(i)),
                    Span::raw(format!(" {:>5} ", share.lines)),
                    Span::styled(format!("{:>6}", share.percent), Style::default().fg(Color::White)),
                ])
            })
            .collect()
    };
    let breakdown = Paragraph::new(breakdown).block(
        Block::default()
            .title("Languages")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(breakdown, chunks[1]);

    let tooltip = state.hover.tooltip();
    let details: Vec<Line> = match (&tooltip.content, tooltip.visible) {
        (Some(content), true) => {
            let field = |label: &str, value: String, color: Color| {
                Line::from(vec![
                    Span::styled(format!("{label:<8}"), Style::default().fg(Color::White)),
                    Span::styled(value, Style::default().fg(color)),
                ])
            };
            vec![
                field("Commit", super::truncate(&content.id, 12), Color::Yellow),
                field("Date", content.date.clone(), Color::Cyan),
                field("Time", content.time.clone(), Color::Cyan),
                field("Author", content.author.clone(), Color::Magenta),
                field("Lines", content.lines.to_string(), Color::Green),
                Line::from(Span::styled(
                    "c: copy commit URL",
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        _ => vec![Line::from(Span::styled(
            format!("Hover a dot ({} commits)", session.commits.len()),
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let details = Paragraph::new(details).wrap(Wrap { trim: true }).block(
        Block::default()
            .title("Commit")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(details, chunks[2]);
}

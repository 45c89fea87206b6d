use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};
use ratatui::Frame;

use crate::session::RenderSession;
use crate::stats::{hourly_distribution, summarize};

/// Render the whole-log summary grid and a commits-per-hour sparkline.
pub fn draw_summary_view(f: &mut Frame, area: Rect, session: &RenderSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(5)])
        .split(area);

    let mut lines = vec![
        Line::from(vec![Span::styled(
            "Summary",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    for item in summarize(&session.records, &session.commits) {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", item.label), Style::default().fg(Color::White)),
            Span::styled(item.value.to_string(), Style::default().fg(Color::Cyan)),
        ]));
    }

    let summary = Paragraph::new(lines).block(
        Block::default()
            .title("Overall Statistics")
            .borders(Borders::ALL),
    );
    f.render_widget(summary, chunks[0]);

    let hours: Vec<u64> = hourly_distribution(&session.commits)
        .iter()
        .map(|&n| n as u64)
        .collect();
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title("Commits by hour (00:00 - 23:00)")
                .borders(Borders::ALL),
        )
        .data(&hours)
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(sparkline, chunks[1]);
}

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use super::super::state::TuiState;
use super::{header_cell, truncate};
use crate::session::RenderSession;

/// Render the list of selected commits, or every commit when nothing is brushed.
pub fn draw_commits_view(f: &mut Frame, area: Rect, session: &RenderSession, state: &TuiState) {
    let title = if state.brushing {
        format!("Selected Commits | {}", state.selection_message)
    } else {
        format!("All Commits ({}) | brush the plot to filter", session.commits.len())
    };

    if state.listed.is_empty() {
        let empty = Paragraph::new(state.selection_message.clone())
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = state
        .listed
        .iter()
        .filter_map(|&i| session.commits.get(i))
        .map(|commit| {
            Row::new(vec![
                Cell::from(truncate(&commit.id, 10)).style(Style::default().fg(Color::Yellow)),
                Cell::from(commit.datetime.format("%Y-%m-%d %I:%M %p").to_string()),
                Cell::from(commit.total_lines.to_string()).style(Style::default().fg(Color::Green)),
                Cell::from(commit.author.clone()).style(Style::default().fg(Color::Magenta)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Percentage(100),
        ],
    )
    .header(Row::new([
        header_cell("Commit", Color::Yellow),
        header_cell("Date", Color::Cyan),
        header_cell("Lines", Color::Green),
        header_cell("Author", Color::Magenta),
    ]))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    let mut table_state = TableState::default();
    table_state.select(Some(state.commit_selected.min(state.listed.len() - 1)));
    f.render_stateful_widget(table, area, &mut table_state);
}

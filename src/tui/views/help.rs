use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::centered_rect;

fn section(title: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )])
}

/// Draw the modal help overlay describing the plot, selection and shortcuts.
pub fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let block = Block::default().title("Help").borders(Borders::ALL);
    let help_area = centered_rect(70, 80, area);

    f.render_widget(Clear, help_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "locmeta - Help",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        section("Plot:"),
        Line::from("  x axis      Commit date"),
        Line::from("  y axis      Time of day"),
        Line::from("  Dot size    Lines changed (area grows with line count)"),
        Line::from("  Mouse over  Show commit details"),
        Line::from(""),
        section("Selection:"),
        Line::from("  Drag        Brush a rectangle to select commits"),
        Line::from("  a           Select the whole plot"),
        Line::from("  Esc         Clear the selection / close help"),
        Line::from(""),
        section("Views:"),
        Line::from("  Tab         Next view (Plot/Summary/Commits)"),
        Line::from("  Shift+Tab   Previous view"),
        Line::from("  j/k or ↑/↓  Move in the commit list"),
        Line::from(""),
        section("Actions:"),
        Line::from("  c           Copy commit URL (hovered or highlighted)"),
        Line::from(""),
        section("General:"),
        Line::from("  h, F1       Toggle this help"),
        Line::from("  q           Quit application"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press 'h' or 'Esc' to close this help",
            Style::default().fg(Color::Gray),
        )]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(help_paragraph, help_area);
}

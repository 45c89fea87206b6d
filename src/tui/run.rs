use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::{Frame, Terminal};
use tracing::{info, warn};

use crate::cli::CommonArgs;
use crate::model::NO_DATA_MESSAGE;
use crate::report::load_session;
use crate::selection::SelectionController;
use crate::session::RenderSession;

use super::events::{handle_key_event, handle_mouse_event};
use super::state::{TuiState, ViewMode};
use super::views::{draw_commits_view, draw_help_overlay, draw_plot_view, draw_summary_view};

const STATUS_TTL: Duration = Duration::from_secs(3);

type Backend = CrosstermBackend<io::Stdout>;

/// Load the log and run the interactive plot until the user quits.
pub fn run(common: &CommonArgs) -> anyhow::Result<()> {
    let Some(session) = load_session(common)? else {
        println!("{NO_DATA_MESSAGE}");
        return Ok(());
    };
    info!(commits = session.commits.len(), "starting tui");

    let mut terminal = setup_terminal().context("Failed to initialise terminal")?;
    let result = event_loop(&mut terminal, &session);
    if let Err(e) = restore_terminal(&mut terminal) {
        warn!(error = %e, "failed to restore terminal");
    }
    result
}

fn setup_terminal() -> io::Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<Backend>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()
}

fn event_loop(terminal: &mut Terminal<Backend>, session: &RenderSession) -> anyhow::Result<()> {
    let mut state = TuiState::new(session);
    let mut controller = SelectionController::new(session);

    loop {
        if let Some((_, at)) = &state.status_message {
            if at.elapsed() > STATUS_TTL {
                state.status_message = None;
            }
        }

        terminal
            .draw(|f| draw_frame(f, session, &controller, &mut state))
            .context("TUI draw error")?;

        if poll(Duration::from_millis(200))? {
            match read()? {
                Event::Key(key_event) => {
                    if handle_key_event(key_event, &mut state, &mut controller, session) {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => {
                    handle_mouse_event(mouse_event, &mut state, &mut controller, session)
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw_frame(f: &mut Frame, session: &RenderSession, controller: &SelectionController, state: &mut TuiState) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    let tabs = Tabs::new(ViewMode::TITLES.to_vec())
        .block(Block::default().borders(Borders::ALL).title("locmeta"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .select(state.tab_index);
    f.render_widget(tabs, chunks[0]);

    match state.view_mode {
        ViewMode::Plot => draw_plot_view(
            f,
            chunks[1],
            session,
            controller.view(),
            controller.selection(),
            state,
        ),
        ViewMode::Summary => draw_summary_view(f, chunks[1], session),
        ViewMode::Commits => draw_commits_view(f, chunks[1], session, state),
    }

    let status = match &state.status_message {
        Some((message, at)) if at.elapsed() <= STATUS_TTL => message.clone(),
        _ => format!(
            "{} | Tab: switch view | a: select all | Esc: clear | c: copy URL | q: quit",
            state.selection_message
        ),
    };
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Gray)),
        chunks[2],
    );

    if state.show_help {
        draw_help_overlay(f, size);
    }
}

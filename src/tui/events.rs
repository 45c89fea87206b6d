use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use tracing::debug;

use crate::selection::{BrushEvent, Selection, SelectionController};
use crate::session::RenderSession;

use super::layout::{brush_point, cell_to_plot};
use super::state::{TuiState, ViewMode};

pub fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())
}

/// Handle a keyboard event. Returns `true` when the loop should exit.
pub fn handle_key_event(
    key_event: KeyEvent,
    state: &mut TuiState,
    controller: &mut SelectionController,
    session: &RenderSession,
) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    if state.show_help {
        if matches!(
            key_event.code,
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::F(1) | KeyCode::Char('q')
        ) {
            state.show_help = false;
        }
        return false;
    }

    let tabs = ViewMode::TITLES.len();
    match key_event.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('h') | KeyCode::F(1) => state.show_help = true,
        KeyCode::Tab => switch_tab(state, (state.tab_index + 1) % tabs),
        KeyCode::BackTab => switch_tab(state, (state.tab_index + tabs - 1) % tabs),
        KeyCode::Esc => {
            state.drag_anchor = None;
            controller.on_brush(BrushEvent::End(None), session, state);
        }
        KeyCode::Char('a') => {
            let usable = session.plot.layout.usable();
            let all = Selection::from_corners((usable.left, usable.top), (usable.right, usable.bottom));
            controller.on_brush(BrushEvent::End(Some(all)), session, state);
        }
        KeyCode::Char('c') => copy_commit_url(state, session),
        KeyCode::Down | KeyCode::Char('j') => {
            if state.commit_selected + 1 < state.listed.len() {
                state.commit_selected += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.commit_selected = state.commit_selected.saturating_sub(1);
        }
        KeyCode::Home => state.commit_selected = 0,
        KeyCode::End => state.commit_selected = state.listed.len().saturating_sub(1),
        KeyCode::PageDown => {
            state.commit_selected =
                (state.commit_selected + 10).min(state.listed.len().saturating_sub(1));
        }
        KeyCode::PageUp => state.commit_selected = state.commit_selected.saturating_sub(10),
        _ => {}
    }
    false
}

fn switch_tab(state: &mut TuiState, index: usize) {
    state.tab_index = index;
    state.view_mode = ViewMode::from_tab(index);
    if state.view_mode != ViewMode::Plot {
        state.hover.leave();
        state.drag_anchor = None;
    }
}

/// Translate mouse input on the plot canvas into hover and brush events.
pub fn handle_mouse_event(
    event: MouseEvent,
    state: &mut TuiState,
    controller: &mut SelectionController,
    session: &RenderSession,
) {
    if state.view_mode != ViewMode::Plot || state.show_help {
        return;
    }
    let Some(area) = state.plot_area else {
        return;
    };
    let layout = &session.plot.layout;
    let pointer = (event.column as f64, event.row as f64);

    match event.kind {
        MouseEventKind::Moved => match cell_to_plot(area, layout, event.column, event.row) {
            Some(point) => state
                .hover
                .pointer_at(&session.plot, &session.commits, point, pointer),
            None => state.hover.leave(),
        },
        MouseEventKind::Down(MouseButton::Left) => {
            if cell_to_plot(area, layout, event.column, event.row).is_none() {
                return;
            }
            if let Some(point) = brush_point(area, layout, event.column, event.row) {
                debug!(x = point.0, y = point.1, "brush start");
                state.drag_anchor = Some(point);
                controller.on_brush(
                    BrushEvent::Start(Some(Selection::from_corners(point, point))),
                    session,
                    state,
                );
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let (Some(anchor), Some(point)) = (
                state.drag_anchor,
                brush_point(area, layout, event.column, event.row),
            ) {
                controller.on_brush(
                    BrushEvent::Move(Some(Selection::from_corners(anchor, point))),
                    session,
                    state,
                );
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(anchor) = state.drag_anchor.take() {
                let sel = brush_point(area, layout, event.column, event.row)
                    .map(|point| Selection::from_corners(anchor, point));
                controller.on_brush(BrushEvent::End(sel), session, state);
            }
        }
        _ => {}
    }
}

/// Copy the hovered commit's URL, falling back to the highlighted row.
fn copy_commit_url(state: &mut TuiState, session: &RenderSession) {
    let hovered = state
        .hover
        .hovered()
        .and_then(|dot| session.plot.dots.get(dot))
        .map(|dot| dot.commit);
    let index = hovered.or_else(|| state.listed.get(state.commit_selected).copied());
    let Some(commit) = index.and_then(|i| session.commits.get(i)) else {
        state.set_status("No commit to copy");
        return;
    };

    match copy_to_clipboard(&commit.url) {
        Ok(()) => {
            let message = format!("Copied: {}", commit.url);
            state.set_status(message);
        }
        Err(err) => state.set_status(format!("Clipboard error: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commits::tests::sample_records;
    use crate::plot::PlotLayout;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn session() -> RenderSession {
        RenderSession::build(sample_records(), "https://example.com/commit/", PlotLayout::default())
            .unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn select_all_then_escape_clears() {
        let session = session();
        let mut state = TuiState::new(&session);
        let mut controller = SelectionController::new(&session);

        assert!(!handle_key_event(key(KeyCode::Char('a')), &mut state, &mut controller, &session));
        assert!(state.brushing);
        assert_eq!(controller.view().count(), 2);
        assert_eq!(state.selection_message, "2 commits selected");

        handle_key_event(key(KeyCode::Esc), &mut state, &mut controller, &session);
        assert!(!state.brushing);
        assert_eq!(controller.view().count(), 0);
        assert_eq!(state.listed, vec![0, 1]);
    }

    #[test]
    fn quit_and_tab_cycling() {
        let session = session();
        let mut state = TuiState::new(&session);
        let mut controller = SelectionController::new(&session);

        handle_key_event(key(KeyCode::BackTab), &mut state, &mut controller, &session);
        assert_eq!(state.view_mode, ViewMode::Commits);
        handle_key_event(key(KeyCode::Tab), &mut state, &mut controller, &session);
        assert_eq!(state.view_mode, ViewMode::Plot);
        assert!(handle_key_event(key(KeyCode::Char('q')), &mut state, &mut controller, &session));
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let session = session();
        let mut state = TuiState::new(&session);
        let mut controller = SelectionController::new(&session);

        handle_key_event(key(KeyCode::Char('h')), &mut state, &mut controller, &session);
        assert!(state.show_help);
        assert!(!handle_key_event(key(KeyCode::Char('q')), &mut state, &mut controller, &session));
        assert!(!state.show_help);
    }

    #[test]
    fn drag_over_whole_canvas_selects_everything() {
        let session = session();
        let mut state = TuiState::new(&session);
        let mut controller = SelectionController::new(&session);
        state.plot_area = Some(Rect::new(0, 0, 95, 56));

        handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), &mut state, &mut controller, &session);
        assert!(!state.brushing);
        handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 200, 200), &mut state, &mut controller, &session);
        assert!(state.brushing);
        handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 200, 200), &mut state, &mut controller, &session);
        assert!(state.drag_anchor.is_none());
        assert_eq!(controller.view().count(), 2);
    }

    #[test]
    fn drag_reaches_dots_on_the_plot_corners() {
        use crate::commits::tests::record;

        let records = vec![
            record("early", "a.js", 1, "js", "2025-01-15T00:00:00+00:00"),
            record("late", "a.js", 1, "js", "2025-01-20T12:00:00+00:00"),
        ];
        let session = RenderSession::build(records, "", PlotLayout::default()).unwrap();
        let mut state = TuiState::new(&session);
        let mut controller = SelectionController::new(&session);
        state.plot_area = Some(Rect::new(0, 0, 95, 56));

        handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), &mut state, &mut controller, &session);
        handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 500, 500), &mut state, &mut controller, &session);
        handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 500, 500), &mut state, &mut controller, &session);
        assert_eq!(controller.view().count(), 2);
    }

    #[test]
    fn click_without_drag_clears_selection() {
        let session = session();
        let mut state = TuiState::new(&session);
        let mut controller = SelectionController::new(&session);
        state.plot_area = Some(Rect::new(0, 0, 95, 56));

        handle_key_event(key(KeyCode::Char('a')), &mut state, &mut controller, &session);
        handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10), &mut state, &mut controller, &session);
        handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 10), &mut state, &mut controller, &session);
        assert!(!state.brushing);
        assert_eq!(controller.view().count(), 0);
    }

    #[test]
    fn list_cursor_stays_in_bounds() {
        let session = session();
        let mut state = TuiState::new(&session);
        let mut controller = SelectionController::new(&session);

        for _ in 0..5 {
            handle_key_event(key(KeyCode::Char('j')), &mut state, &mut controller, &session);
        }
        assert_eq!(state.commit_selected, 1);
        handle_key_event(key(KeyCode::PageUp), &mut state, &mut controller, &session);
        assert_eq!(state.commit_selected, 0);
    }
}

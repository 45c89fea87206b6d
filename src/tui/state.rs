use std::time::Instant;

use ratatui::layout::Rect;

use crate::plot::HoverTracker;
use crate::selection::{BrushState, SelectionSink, SelectionView};
use crate::session::RenderSession;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ViewMode {
    Plot,
    Summary,
    Commits,
}

impl ViewMode {
    pub const TITLES: [&'static str; 3] = ["Plot", "Summary", "Commits"];

    pub fn from_tab(index: usize) -> Self {
        match index {
            1 => ViewMode::Summary,
            2 => ViewMode::Commits,
            _ => ViewMode::Plot,
        }
    }
}

pub struct TuiState {
    pub tab_index: usize,
    pub view_mode: ViewMode,
    pub show_help: bool,
    pub hover: HoverTracker,
    /// Plot-space point where the current drag started.
    pub drag_anchor: Option<(f64, f64)>,
    /// Inner canvas area from the last frame, used to map mouse cells.
    pub plot_area: Option<Rect>,
    /// Commits shown in the Commits tab: the selection, or everything when idle.
    pub listed: Vec<usize>,
    pub brushing: bool,
    pub selection_message: String,
    pub commit_selected: usize,
    pub status_message: Option<(String, Instant)>,
}

impl TuiState {
    pub fn new(session: &RenderSession) -> Self {
        Self {
            tab_index: 0,
            view_mode: ViewMode::Plot,
            show_help: false,
            hover: HoverTracker::new(),
            drag_anchor: None,
            plot_area: None,
            listed: (0..session.commits.len()).collect(),
            brushing: false,
            selection_message: crate::selection::selection_count_text(0),
            commit_selected: 0,
            status_message: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }
}

impl SelectionSink for TuiState {
    fn selection_changed(&mut self, session: &RenderSession, state: &BrushState, view: &SelectionView) {
        self.brushing = matches!(state, BrushState::Active(_));
        self.listed = if self.brushing {
            view.commits.clone()
        } else {
            (0..session.commits.len()).collect()
        };
        self.selection_message = view.message.clone();
        if self.commit_selected >= self.listed.len() {
            self.commit_selected = 0;
        }
    }
}

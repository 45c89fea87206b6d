use crate::error::{LocError, Result};
use crate::model::{Commit, LanguageShare};
use crate::page::{Page, Target};
use crate::plot::ScatterPlot;
use crate::session::RenderSession;
use crate::util::{escape_html, format_percent};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

pub const OTHER_LANGUAGE: &str = "Other";

/// Axis-aligned brush rectangle in plot pixel space, with `x0 <= x1` and
/// `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Selection {
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 == self.x1 || self.y0 == self.y1
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x0 <= x && x <= self.x1 && self.y0 <= y && y <= self.y1
    }

    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.x0, self.y0], [self.x1, self.y1]]
    }
}

impl FromStr for Selection {
    type Err = LocError;

    /// Parses `x0,y0,x1,y1`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| LocError::InvalidSelection(format!("'{s}': {e}")))?;
        match parts.as_slice() {
            [x0, y0, x1, y1] if parts.iter().all(|v| v.is_finite()) => {
                Ok(Self::from_corners((*x0, *y0), (*x1, *y1)))
            }
            _ => Err(LocError::InvalidSelection(format!(
                "'{s}': expected four numbers x0,y0,x1,y1"
            ))),
        }
    }
}

pub fn is_commit_selected(selection: Option<&Selection>, commit: &Commit, plot: &ScatterPlot) -> bool {
    let Some(selection) = selection else {
        return false;
    };
    let (x, y) = plot.project(commit);
    selection.contains(x, y)
}

/// Indices of the commits inside the selection, in commit order.
pub fn selected_commits(selection: Option<&Selection>, commits: &[Commit], plot: &ScatterPlot) -> Vec<usize> {
    if selection.is_none() {
        return Vec::new();
    }
    commits
        .iter()
        .enumerate()
        .filter(|(_, c)| is_commit_selected(selection, c, plot))
        .map(|(i, _)| i)
        .collect()
}

pub fn selection_count_text(count: usize) -> String {
    if count == 0 {
        "No commits selected".to_string()
    } else {
        format!("{count} commits selected")
    }
}

/// Line counts per language over every line of the given commits, in order of
/// first appearance.
pub fn language_breakdown<'a, I>(commits: I) -> Vec<LanguageShare>
where
    I: IntoIterator<Item = &'a Commit>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut total = 0usize;

    for line in commits.into_iter().flat_map(|c| c.lines()) {
        let kind = line.kind.as_str();
        let slot = *index.entry(kind).or_insert_with(|| {
            counts.push((kind, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
        total += 1;
    }

    if total == 0 {
        return Vec::new();
    }

    counts
        .into_iter()
        .map(|(kind, lines)| {
            let proportion = lines as f64 / total as f64;
            let language = if kind.is_empty() { OTHER_LANGUAGE } else { kind };
            LanguageShare {
                language: language.to_string(),
                lines,
                proportion,
                percent: format_percent(proportion),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushState {
    Idle,
    Active(Selection),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushEvent {
    Start(Option<Selection>),
    Move(Option<Selection>),
    End(Option<Selection>),
}

/// Everything that depends on the current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionView {
    /// Per commit, in commit order.
    pub selected: Vec<bool>,
    pub commits: Vec<usize>,
    pub message: String,
    pub breakdown: Vec<LanguageShare>,
}

impl SelectionView {
    pub fn count(&self) -> usize {
        self.commits.len()
    }
}

/// Receives the recomputed view after every brush event.
pub trait SelectionSink {
    fn selection_changed(&mut self, session: &RenderSession, state: &BrushState, view: &SelectionView);
}

/// Headless callers only need the controller's own view.
impl SelectionSink for () {
    fn selection_changed(&mut self, _: &RenderSession, _: &BrushState, _: &SelectionView) {}
}

pub struct SelectionController {
    state: BrushState,
    view: SelectionView,
}

impl SelectionController {
    pub fn new(session: &RenderSession) -> Self {
        Self {
            state: BrushState::Idle,
            view: SelectionView {
                selected: vec![false; session.commits.len()],
                commits: Vec::new(),
                message: selection_count_text(0),
                breakdown: Vec::new(),
            },
        }
    }

    pub fn state(&self) -> &BrushState {
        &self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            BrushState::Active(s) => Some(s),
            BrushState::Idle => None,
        }
    }

    pub fn view(&self) -> &SelectionView {
        &self.view
    }

    pub fn on_brush<S: SelectionSink + ?Sized>(
        &mut self,
        event: BrushEvent,
        session: &RenderSession,
        sink: &mut S,
    ) {
        let next = match event {
            BrushEvent::Start(sel) | BrushEvent::Move(sel) | BrushEvent::End(sel) => {
                match sel.filter(|s| !s.is_empty()) {
                    Some(s) => BrushState::Active(s),
                    None => BrushState::Idle,
                }
            }
        };
        if next != self.state {
            debug!(?event, from = ?self.state, to = ?next, "brush transition");
        }
        self.state = next;
        self.on_selection_changed(session, sink);
    }

    /// Recompute selection flags, count and breakdown from scratch and hand
    /// them to the sink.
    fn on_selection_changed<S: SelectionSink + ?Sized>(&mut self, session: &RenderSession, sink: &mut S) {
        let selection = self.selection().copied();
        let commits = &session.commits;

        let indices = selected_commits(selection.as_ref(), commits, &session.plot);
        let mut flags = vec![false; commits.len()];
        for &i in &indices {
            flags[i] = true;
        }
        let breakdown = language_breakdown(indices.iter().map(|&i| &commits[i]));

        self.view = SelectionView {
            selected: flags,
            message: selection_count_text(indices.len()),
            commits: indices,
            breakdown,
        };
        sink.selection_changed(session, &self.state, &self.view);
    }
}

pub fn render_selection_count(page: &mut Page, view: &SelectionView) {
    page.set_text(Target::SelectionCount, &view.message);
}

pub fn render_language_breakdown(page: &mut Page, view: &SelectionView) {
    if !page.has(Target::LanguageBreakdown) {
        return;
    }
    page.clear(Target::LanguageBreakdown);
    if view.breakdown.is_empty() {
        return;
    }

    let mut html = String::from("<div class=\"lang-grid\">");
    for share in &view.breakdown {
        html.push_str(&format!(
            "<div class=\"lang-item\"><div class=\"lang-name\">{}</div>\
             <div class=\"lang-lines\">{} lines</div>\
             <div class=\"lang-percent\">{}</div></div>",
            escape_html(&share.language),
            share.lines,
            share.percent
        ));
    }
    html.push_str("</div>");
    page.set(Target::LanguageBreakdown, html);
}

impl SelectionSink for Page {
    fn selection_changed(&mut self, session: &RenderSession, state: &BrushState, view: &SelectionView) {
        let brush = match state {
            BrushState::Active(s) => Some(s),
            BrushState::Idle => None,
        };
        crate::plot::render_scatter_plot(self, session, &view.selected, None, brush);
        render_selection_count(self, view);
        render_language_breakdown(self, view);
    }
}

use super::ScatterPlot;
use crate::model::Commit;
use crate::page::{Page, Target};
use crate::util::{escape_html, fmt_px};

/// Distance in pixels between the pointer and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: f64 = 14.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub id: String,
    pub url: String,
    pub date: String,
    pub time: String,
    pub author: String,
    pub lines: usize,
}

impl TooltipContent {
    pub fn for_commit(commit: &Commit) -> Self {
        Self {
            id: commit.id.clone(),
            url: commit.url.clone(),
            date: commit.datetime.format("%A, %B %-d, %Y").to_string(),
            time: commit.datetime.format("%I:%M %p").to_string(),
            author: commit.author.clone(),
            lines: commit.total_lines,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    pub content: Option<TooltipContent>,
}

impl Tooltip {
    pub fn position_at(&mut self, pointer: (f64, f64)) {
        self.left = pointer.0 + TOOLTIP_OFFSET;
        self.top = pointer.1 + TOOLTIP_OFFSET;
    }
}

/// Tracks which dot the pointer is over and keeps the tooltip in sync.
#[derive(Debug, Clone, Default)]
pub struct HoverTracker {
    hovered: Option<usize>,
    tooltip: Tooltip,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index into the plot's dots of the highlighted dot, if any.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn enter(&mut self, dot: usize, commit: &Commit, pointer: (f64, f64)) {
        self.hovered = Some(dot);
        self.tooltip.content = Some(TooltipContent::for_commit(commit));
        self.tooltip.visible = true;
        self.tooltip.position_at(pointer);
    }

    pub fn moved(&mut self, pointer: (f64, f64)) {
        self.tooltip.position_at(pointer);
    }

    pub fn leave(&mut self) {
        self.hovered = None;
        self.tooltip.visible = false;
    }

    /// Hit-test `plot_point` and emit the enter / move / leave transitions.
    /// `pointer` is where the tooltip is anchored, in the caller's coordinates.
    pub fn pointer_at(
        &mut self,
        plot: &ScatterPlot,
        commits: &[Commit],
        plot_point: (f64, f64),
        pointer: (f64, f64),
    ) {
        let hit = plot.dot_at(plot_point.0, plot_point.1);
        match (self.hovered, hit) {
            (Some(current), Some(next)) if current == next => self.moved(pointer),
            (_, Some(next)) => {
                if self.hovered.is_some() {
                    self.leave();
                }
                if let Some(commit) = commits.get(plot.dots[next].commit) {
                    self.enter(next, commit, pointer);
                }
            }
            (Some(_), None) => self.leave(),
            (None, None) => {}
        }
    }

    pub fn opacity(&self, dot: usize) -> f64 {
        if self.hovered == Some(dot) {
            1.0
        } else {
            super::BASE_OPACITY
        }
    }
}

/// Write the tooltip fields into `#commit-tooltip`.
pub fn render_tooltip(page: &mut Page, tooltip: &Tooltip) {
    if !page.has(Target::Tooltip) {
        return;
    }
    page.set_hidden(Target::Tooltip, !tooltip.visible);
    let Some(content) = &tooltip.content else {
        return;
    };

    page.set(
        Target::Tooltip,
        format!(
            "<dl class=\"info\">\
             <dt>Commit</dt><dd><a id=\"commit-link\" href=\"{url}\" target=\"_blank\">{id}</a></dd>\
             <dt>Date</dt><dd id=\"commit-date\">{date}</dd>\
             <dt>Time</dt><dd id=\"commit-time\">{time}</dd>\
             <dt>Author</dt><dd id=\"commit-author\">{author}</dd>\
             <dt>Lines</dt><dd id=\"commit-lines\">{lines}</dd>\
             </dl>",
            url = escape_html(&content.url),
            id = escape_html(&content.id),
            date = escape_html(&content.date),
            time = escape_html(&content.time),
            author = escape_html(&content.author),
            lines = content.lines,
        ),
    );
    page.set_style(
        Target::Tooltip,
        Some(format!(
            "left: {}px; top: {}px",
            fmt_px(tooltip.left),
            fmt_px(tooltip.top)
        )),
    );
}

pub mod hover;
pub mod svg;

pub use hover::{render_tooltip, HoverTracker, Tooltip, TooltipContent, TOOLTIP_OFFSET};
pub use svg::{render_scatter_plot, render_svg, DOT_COLOR, SELECTED_COLOR};

use crate::model::Commit;
use crate::scale::{LinearScale, SqrtScale, TimeScale};
use std::cmp::Reverse;

pub const MIN_RADIUS: f64 = 4.0;
pub const MAX_RADIUS: f64 = 28.0;
pub const BASE_OPACITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            margin: Margin {
                top: 10.0,
                right: 10.0,
                bottom: 30.0,
                left: 40.0,
            },
        }
    }
}

/// Pixel bounds of the area inside the margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usable {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotLayout {
    pub fn usable(&self) -> Usable {
        Usable {
            left: self.margin.left,
            right: self.width - self.margin.right,
            top: self.margin.top,
            bottom: self.height - self.margin.bottom,
            width: self.width - self.margin.left - self.margin.right,
            height: self.height - self.margin.top - self.margin.bottom,
        }
    }
}

/// One plotted commit. `commit` indexes the session's commit list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub commit: usize,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Dot {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        dx * dx + dy * dy <= self.r * self.r
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub layout: PlotLayout,
    pub x: TimeScale,
    pub y: LinearScale,
    pub r: SqrtScale,
    /// Draw order: larger commits first so smaller ones stay on top.
    pub dots: Vec<Dot>,
}

impl ScatterPlot {
    pub fn new(commits: &[Commit], layout: PlotLayout) -> Option<Self> {
        let usable = layout.usable();

        let x = TimeScale::from_extent(commits.iter().map(|c| &c.datetime), [usable.left, usable.right])?
            .nice();
        let y = LinearScale::new([0.0, 24.0], [usable.bottom, usable.top]);

        let min_lines = commits.iter().map(|c| c.total_lines).min().unwrap_or(0);
        let max_lines = commits.iter().map(|c| c.total_lines).max().unwrap_or(0);
        let non_zero = |v: usize| if v == 0 { 1.0 } else { v as f64 };
        let r = SqrtScale::new([non_zero(min_lines), non_zero(max_lines)], [MIN_RADIUS, MAX_RADIUS]);

        let mut order: Vec<usize> = (0..commits.len()).collect();
        order.sort_by_key(|&i| Reverse(commits[i].total_lines));

        let dots = order
            .into_iter()
            .map(|i| {
                let c = &commits[i];
                Dot {
                    commit: i,
                    cx: x.map(&c.datetime),
                    cy: y.map(c.hour_frac),
                    r: r.map(c.total_lines as f64),
                }
            })
            .collect();

        Some(Self { layout, x, y, r, dots })
    }

    /// Projected pixel position of a commit.
    pub fn project(&self, commit: &Commit) -> (f64, f64) {
        (self.x.map(&commit.datetime), self.y.map(commit.hour_frac))
    }

    /// Index into `dots` of the top-most dot under the point.
    pub fn dot_at(&self, x: f64, y: f64) -> Option<usize> {
        self.dots.iter().rposition(|d| d.contains(x, y))
    }
}

/// Hour values every `step` hours from 0 to 24 inclusive.
pub fn hour_ticks(step: usize) -> impl Iterator<Item = f64> {
    (0..=24u32).step_by(step.max(1)).map(f64::from)
}

/// Left axis label for an hour tick.
pub fn hour_label(hour: f64) -> String {
    format!("{:02}:00", (hour as i64).rem_euclid(24))
}

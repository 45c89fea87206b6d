use crate::commits::process_commits;
use crate::model::{Commit, LineRecord, NO_DATA_MESSAGE};
use crate::page::{Page, Target};
use crate::plot::{render_scatter_plot, PlotLayout, ScatterPlot};
use crate::stats::render_commit_info;
use tracing::{info, warn};

/// The loaded dataset plus the plot scales, shared by every event handler for
/// the lifetime of one view.
#[derive(Debug, Clone)]
pub struct RenderSession {
    pub records: Vec<LineRecord>,
    pub commits: Vec<Commit>,
    pub plot: ScatterPlot,
}

impl RenderSession {
    /// Aggregate `records` and lay out the plot. `None` when there is nothing
    /// to show.
    pub fn build(records: Vec<LineRecord>, url_base: &str, layout: PlotLayout) -> Option<Self> {
        let commits = process_commits(&records, url_base);
        if records.is_empty() || commits.is_empty() {
            return None;
        }
        let plot = ScatterPlot::new(&commits, layout)?;
        Some(Self::from_parts(records, commits, plot))
    }

    pub fn from_parts(records: Vec<LineRecord>, commits: Vec<Commit>, plot: ScatterPlot) -> Self {
        Self {
            records,
            commits,
            plot,
        }
    }
}

/// Build the session and render the summary and chart into `page`. With no
/// data, the stats target gets a notice instead and nothing else is drawn.
pub fn init(page: &mut Page, records: Vec<LineRecord>, url_base: &str, layout: PlotLayout) -> Option<RenderSession> {
    let rows = records.len();
    let Some(session) = RenderSession::build(records, url_base, layout) else {
        warn!(rows, "no commit data to render");
        render_no_data(page);
        return None;
    };

    info!(
        rows,
        commits = session.commits.len(),
        "rendering commit visualization"
    );
    render_commit_info(page, &session.records, &session.commits);
    let unselected = vec![false; session.commits.len()];
    render_scatter_plot(page, &session, &unselected, None, None);
    Some(session)
}

pub fn render_no_data(page: &mut Page) {
    page.set_text(Target::Stats, NO_DATA_MESSAGE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commits::tests::sample_records;

    #[test]
    fn empty_records_show_notice_and_skip_rendering() {
        let mut page = Page::new("meta");
        let session = init(&mut page, Vec::new(), "", PlotLayout::default());
        assert!(session.is_none());
        assert_eq!(
            page.get(Target::Stats).unwrap().html,
            crate::util::escape_html(NO_DATA_MESSAGE)
        );
        assert_eq!(page.get(Target::Chart).unwrap().html, "");
    }

    #[test]
    fn renders_summary_and_chart() {
        let mut page = Page::new("meta");
        let session = init(&mut page, sample_records(), "u/", PlotLayout::default()).unwrap();
        assert_eq!(session.commits.len(), 2);
        assert!(page.get(Target::Stats).unwrap().html.contains("summary-grid"));
        assert!(page.get(Target::Chart).unwrap().html.starts_with("<svg"));
    }

    #[test]
    fn missing_targets_degrade_gracefully() {
        let mut page = Page::with_targets("meta", &[Target::Chart]);
        let session = init(&mut page, sample_records(), "", PlotLayout::default());
        assert!(session.is_some());
        assert!(page.get(Target::Stats).is_none());
        assert!(page.get(Target::Chart).unwrap().html.contains("<circle"));

        let mut bare = Page::with_targets("meta", &[]);
        assert!(init(&mut bare, Vec::new(), "", PlotLayout::default()).is_none());
    }

    #[test]
    fn every_stylesheet_class_is_emitted() {
        use crate::selection::{BrushEvent, Selection, SelectionController};

        let mut page = Page::new("meta");
        let session = init(&mut page, sample_records(), "", PlotLayout::default()).unwrap();
        let mut ctl = SelectionController::new(&session);
        let all = Selection::from_corners((0.0, 0.0), (1000.0, 600.0));
        ctl.on_brush(BrushEvent::End(Some(all)), &session, &mut page);

        let html = page.to_html();
        let body = html.split("</style>").nth(1).unwrap();
        let css = crate::page::inline_css();
        let chars: Vec<char> = css.chars().collect();
        for (i, _) in css.match_indices('.') {
            if i > 0 && chars[i - 1].is_ascii_digit() {
                continue;
            }
            let class: String = css[i + 1..]
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect();
            assert!(body.contains(&class), "no element uses .{class}");
        }
    }
}

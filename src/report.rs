use crate::cli::CommonArgs;
use crate::loader::load_data;
use crate::model::{
    CommitsOutput, LineRecord, SelectionOutput, StatsOutput, NO_DATA_MESSAGE, SCHEMA_VERSION,
};
use crate::page::Page;
use crate::plot::{render_svg, PlotLayout};
use crate::selection::{BrushEvent, Selection, SelectionController, SelectionView};
use crate::session::{self, RenderSession};
use crate::stats::summarize;
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::path::Path;
use tracing::warn;

/// Load the line log. A missing or unreadable log counts as "no data".
pub fn load_records(common: &CommonArgs) -> anyhow::Result<Vec<LineRecord>> {
    match load_data(&common.csv) {
        Ok(records) => Ok(records),
        Err(e) if e.is_load_failure() => {
            warn!(error = %e, "could not load line log");
            Ok(Vec::new())
        }
        Err(e) => Err(e).context("Failed to parse line log"),
    }
}

pub fn load_session(common: &CommonArgs) -> anyhow::Result<Option<RenderSession>> {
    let records = load_records(common)?;
    Ok(RenderSession::build(records, &common.repo_url, PlotLayout::default()))
}

fn source(common: &CommonArgs) -> String {
    common.csv.to_string_lossy().to_string()
}

fn print_no_data() {
    println!("{}", style(NO_DATA_MESSAGE).yellow());
}

pub fn exec_stats(common: &CommonArgs, json: bool) -> anyhow::Result<()> {
    let session = load_session(common)?;
    let items = match &session {
        Some(s) => summarize(&s.records, &s.commits),
        None => summarize(&[], &[]),
    };

    if json {
        let output = StatsOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            source: source(common),
            items,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if session.is_none() {
        print_no_data();
        return Ok(());
    }

    println!("{}", style("Summary").bold());
    println!("{}", "─".repeat(32));
    for item in &items {
        println!("{:<14} {}", style(&item.label).dim(), style(item.value).cyan());
    }
    Ok(())
}

pub fn exec_commits(common: &CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let session = load_session(common)?;
    let commits = session.as_ref().map(|s| s.commits.as_slice()).unwrap_or(&[]);

    if json {
        let output = CommitsOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            source: source(common),
            commits,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    if ndjson {
        for commit in commits {
            println!("{}", serde_json::to_string(commit)?);
        }
        return Ok(());
    }

    if commits.is_empty() {
        print_no_data();
        return Ok(());
    }

    println!("{}", style("Commits").bold());
    println!("{}", "─".repeat(60));
    for commit in commits {
        println!(
            "{} {} {} {:>5} lines  {}",
            style(short_id(&commit.id)).yellow(),
            style(commit.datetime.format("%Y-%m-%d %H:%M")).dim(),
            style(format!("{:>5.2}h", commit.hour_frac)).cyan(),
            style(commit.total_lines).green(),
            style(&commit.author).magenta()
        );
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}

/// Build the page for `records` and replay `brush` through the controller.
pub fn build_page(
    records: Vec<LineRecord>,
    common: &CommonArgs,
    brush: Option<Selection>,
) -> (Page, Option<(RenderSession, SelectionView)>) {
    let mut page = Page::new("Meta");
    let Some(session) = session::init(&mut page, records, &common.repo_url, PlotLayout::default())
    else {
        return (page, None);
    };

    let mut controller = SelectionController::new(&session);
    if let Some(rect) = brush {
        controller.on_brush(BrushEvent::Start(Some(rect)), &session, &mut page);
        controller.on_brush(BrushEvent::End(Some(rect)), &session, &mut page);
    }
    let view = controller.view().clone();
    (page, Some((session, view)))
}

pub fn exec_plot(
    common: &CommonArgs,
    out: &Path,
    svg_only: bool,
    brush: Option<Selection>,
) -> anyhow::Result<()> {
    let brush = brush.filter(|b| !b.is_empty());
    let records = load_records(common)?;
    let (page, built) = build_page(records, common, brush);

    let content = if svg_only {
        match &built {
            Some((session, view)) => render_svg(session, &view.selected, None, brush.as_ref())
                .context("Failed to render chart")?,
            None => {
                print_no_data();
                return Ok(());
            }
        }
    } else {
        page.to_html()
    };

    std::fs::write(out, content)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    match &built {
        Some((session, view)) => println!(
            "Wrote {} ({} commits, {})",
            style(out.display()).green(),
            session.commits.len(),
            view.message
        ),
        None => {
            print_no_data();
            println!("Wrote {}", style(out.display()).green());
        }
    }
    Ok(())
}

pub fn exec_select(common: &CommonArgs, rect: Selection, json: bool) -> anyhow::Result<()> {
    let session = load_session(common)?;

    let (view, ids) = match &session {
        Some(session) => {
            let mut controller = SelectionController::new(session);
            controller.on_brush(BrushEvent::End(Some(rect)), session, &mut ());
            let view = controller.view().clone();
            let ids = view
                .commits
                .iter()
                .map(|&i| session.commits[i].id.clone())
                .collect::<Vec<_>>();
            (view, ids)
        }
        None => (SelectionView::default(), Vec::new()),
    };
    let message = if session.is_some() {
        view.message.clone()
    } else {
        crate::selection::selection_count_text(0)
    };

    if json {
        let output = SelectionOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            source: source(common),
            selection: (!rect.is_empty()).then(|| rect.corners()),
            count: ids.len(),
            message,
            commits: ids,
            breakdown: view.breakdown,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if session.is_none() {
        print_no_data();
        return Ok(());
    }

    println!("{}", style(&message).bold());
    for id in &ids {
        println!("  {}", style(short_id(id)).yellow());
    }
    if !view.breakdown.is_empty() {
        println!("\n{}", style("Languages").bold());
        for share in &view.breakdown {
            println!(
                "  {:<10} {:>6} lines  {:>6}",
                style(&share.language).cyan(),
                share.lines,
                style(&share.percent).green()
            );
        }
    }
    Ok(())
}

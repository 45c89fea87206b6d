use crate::model::{Commit, LineRecord, SummaryItem};
use crate::page::{Page, Target};
use crate::util::escape_html;
use std::collections::HashMap;

/// Whole-dataset aggregates in display order.
pub fn summarize(records: &[LineRecord], commits: &[Commit]) -> Vec<SummaryItem> {
    let mut max_line_per_file: HashMap<&str, u32> = HashMap::new();
    for r in records {
        let entry = max_line_per_file.entry(r.file.as_str()).or_insert(0);
        *entry = (*entry).max(r.line);
    }

    let max_depth = records.iter().map(|r| r.depth).max().unwrap_or(0);
    let longest_line = records.iter().map(|r| r.length).max().unwrap_or(0);
    let max_lines = max_line_per_file.values().copied().max().unwrap_or(0);

    [
        ("COMMITS", commits.len() as u64),
        ("FILES", max_line_per_file.len() as u64),
        ("TOTAL LOC", records.len() as u64),
        ("MAX DEPTH", max_depth as u64),
        ("LONGEST LINE", longest_line as u64),
        ("MAX LINES", max_lines as u64),
    ]
    .into_iter()
    .map(|(label, value)| SummaryItem {
        label: label.to_string(),
        value,
    })
    .collect()
}

/// Commits per hour of day.
pub fn hourly_distribution(commits: &[Commit]) -> [usize; 24] {
    let mut hours = [0usize; 24];
    for c in commits {
        hours[(c.hour_frac.floor() as usize).min(23)] += 1;
    }
    hours
}

/// Append the summary grid to `#stats`.
pub fn render_commit_info(page: &mut Page, records: &[LineRecord], commits: &[Commit]) {
    if !page.has(Target::Stats) {
        return;
    }

    let mut html = String::from(
        "<section class=\"stats summary-stats\"><h2>Summary</h2><dl class=\"summary-grid\">",
    );
    for item in summarize(records, commits) {
        html.push_str(&format!(
            "<dt class=\"summary-label\">{}</dt><dd class=\"summary-value\">{}</dd>",
            escape_html(&item.label),
            item.value
        ));
    }
    html.push_str("</dl></section>");
    page.append(Target::Stats, &html);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commits::process_commits;
    use crate::commits::tests::{record, sample_records};
    use pretty_assertions::assert_eq;

    fn value(items: &[SummaryItem], label: &str) -> u64 {
        items.iter().find(|i| i.label == label).map(|i| i.value).unwrap()
    }

    #[test]
    fn computes_fixed_ordered_items() {
        let mut records = sample_records();
        records.push(record("def", "main.js", 40, "js", "2025-01-20T09:00:00-08:00"));
        let commits = process_commits(&records, "");
        let items = summarize(&records, &commits);

        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["COMMITS", "FILES", "TOTAL LOC", "MAX DEPTH", "LONGEST LINE", "MAX LINES"]
        );
        assert_eq!(value(&items, "COMMITS"), 2);
        assert_eq!(value(&items, "FILES"), 3);
        assert_eq!(value(&items, "TOTAL LOC"), 5);
        assert_eq!(value(&items, "MAX DEPTH"), 2);
        assert_eq!(value(&items, "LONGEST LINE"), 120);
        assert_eq!(value(&items, "MAX LINES"), 40);
    }

    #[test]
    fn buckets_commits_by_hour() {
        let commits = process_commits(&sample_records(), "");
        let hours = hourly_distribution(&commits);
        assert_eq!(hours[14], 1);
        assert_eq!(hours[9], 1);
        assert_eq!(hours.iter().sum::<usize>(), 2);
    }

    #[test]
    fn empty_dataset_defaults_to_zero() {
        let items = summarize(&[], &[]);
        assert!(items.iter().all(|i| i.value == 0));
        assert_eq!(items.len(), 6);
    }

    #[test]
    fn renders_grid_into_stats_target() {
        let records = sample_records();
        let commits = process_commits(&records, "");
        let mut page = Page::new("meta");
        render_commit_info(&mut page, &records, &commits);
        let html = &page.get(Target::Stats).unwrap().html;
        assert!(html.contains("<h2>Summary</h2>"));
        assert!(html.contains("<dt class=\"summary-label\">COMMITS</dt><dd class=\"summary-value\">2</dd>"));
    }

    #[test]
    fn skips_when_stats_target_absent() {
        let records = sample_records();
        let commits = process_commits(&records, "");
        let mut page = Page::with_targets("meta", &[Target::Chart]);
        render_commit_info(&mut page, &records, &commits);
        assert!(page.get(Target::Stats).is_none());
    }
}

use crate::model::{Commit, LineRecord};
use std::collections::HashMap;
use tracing::debug;

/// Group line records into commits, keeping the order in which each commit id
/// first appears.
pub fn process_commits(records: &[LineRecord], url_base: &str) -> Vec<Commit> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<LineRecord>)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.commit.as_str()).or_insert_with(|| {
            groups.push((record.commit.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record.clone());
    }

    let commits: Vec<Commit> = groups
        .into_iter()
        .filter_map(|(id, lines)| Commit::from_group(id, url_base, lines))
        .collect();

    debug!(records = records.len(), commits = commits.len(), "aggregated commits");
    commits
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::loader::parse_datetime;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    pub(crate) fn record(commit: &str, file: &str, line: u32, kind: &str, datetime: &str) -> LineRecord {
        let dt = parse_datetime(datetime).unwrap();
        LineRecord {
            commit: commit.to_string(),
            file: file.to_string(),
            line,
            depth: line % 4,
            length: line * 3,
            kind: kind.to_string(),
            author: "Nabila".to_string(),
            date: dt,
            time: dt.format("%H:%M:%S%:z").to_string(),
            timezone: dt.format("%:z").to_string(),
            datetime: dt,
        }
    }

    pub(crate) fn sample_records() -> Vec<LineRecord> {
        vec![
            record("abc", "main.js", 1, "js", "2025-01-15T14:30:00-08:00"),
            record("def", "index.html", 1, "html", "2025-01-20T09:00:00-08:00"),
            record("abc", "main.js", 2, "js", "2025-01-15T14:30:00-08:00"),
            record("abc", "style.css", 1, "css", "2025-01-15T14:30:00-08:00"),
        ]
    }

    #[test]
    fn groups_in_first_appearance_order() {
        let commits = process_commits(&sample_records(), "https://example.com/commit/");
        let ids: Vec<&str> = commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["abc", "def"]);
        assert_eq!(commits[0].url, "https://example.com/commit/abc");
        assert_eq!(commits[0].total_lines, 3);
        assert_eq!(commits[1].total_lines, 1);
    }

    #[test]
    fn every_record_lands_in_exactly_one_commit() {
        let records = sample_records();
        let commits = process_commits(&records, "");
        let distinct: HashSet<&str> = records.iter().map(|r| r.commit.as_str()).collect();
        assert_eq!(commits.len(), distinct.len());

        let total: usize = commits.iter().map(|c| c.lines().len()).sum();
        assert_eq!(total, records.len());
        for commit in &commits {
            assert_eq!(commit.total_lines, commit.lines().len());
            assert!(!commit.lines().is_empty());
            assert!(commit.lines().iter().all(|l| l.commit == commit.id));
        }
    }

    #[test]
    fn hour_frac_uses_commit_offset() {
        let commits = process_commits(&sample_records(), "");
        assert_eq!(commits[0].hour_frac, 14.5);
        assert_eq!(commits[1].hour_frac, 9.0);
        assert!(commits.iter().all(|c| (0.0..24.0).contains(&c.hour_frac)));

        let late = process_commits(&[record("z", "a", 1, "", "2025-01-01T23:59:00+00:00")], "");
        assert!(late[0].hour_frac < 24.0);
    }

    #[test]
    fn deterministic_across_runs() {
        let records = sample_records();
        let a = process_commits(&records, "u/");
        let b = process_commits(&records, "u/");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn empty_input_yields_no_commits() {
        assert!(process_commits(&[], "").is_empty());
    }

    #[test]
    fn serialized_commit_omits_lines() {
        let commits = process_commits(&sample_records(), "");
        let value = serde_json::to_value(&commits[0]).unwrap();
        assert!(value.get("lines").is_none());
        assert_eq!(value["total_lines"], 3);
        assert_eq!(value["id"], "abc");
    }
}

use crate::error::{LocError, Result};
use crate::model::LineRecord;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RawRow {
    commit: String,
    file: String,
    line: String,
    depth: String,
    length: String,
    author: String,
    date: String,
    time: String,
    timezone: String,
    datetime: String,
    #[serde(rename = "type", default)]
    kind: String,
}

/// Load the line log at `path`. `-` reads from stdin.
pub fn load_data(path: &Path) -> Result<Vec<LineRecord>> {
    let path_str = path.display().to_string();
    if path_str == "-" {
        return load_from_reader(io::stdin().lock());
    }

    let file = File::open(path).map_err(|e| LocError::Load {
        path: path_str.clone(),
        reason: e.to_string(),
    })?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Reading {path_str}..."));
    pb.enable_steady_tick(Duration::from_millis(100));

    let records = load_from_reader(file);
    pb.finish_and_clear();

    let records = records?;
    debug!(path = %path_str, rows = records.len(), "loaded line records");
    Ok(records)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<LineRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, raw) in rdr.deserialize::<RawRow>().enumerate() {
        let raw = raw?;
        records.push(coerce_row(raw, idx + 1)?);
    }
    Ok(records)
}

fn coerce_row(raw: RawRow, row: usize) -> Result<LineRecord> {
    let line = parse_count(&raw.line, row, "line")?;
    let depth = parse_count(&raw.depth, row, "depth")?;
    let length = parse_count(&raw.length, row, "length")?;

    let midnight = format!("{}T00:00:00{}", raw.date, raw.timezone);
    let date = parse_datetime(&midnight).map_err(|e| LocError::Parse {
        row,
        column: "date",
        message: e.to_string(),
    })?;
    let datetime = parse_datetime(&raw.datetime).map_err(|e| LocError::Parse {
        row,
        column: "datetime",
        message: e.to_string(),
    })?;

    Ok(LineRecord {
        commit: raw.commit,
        file: raw.file,
        line,
        depth,
        length,
        kind: raw.kind,
        author: raw.author,
        date,
        time: raw.time,
        timezone: raw.timezone,
        datetime,
    })
}

fn parse_count(value: &str, row: usize, column: &'static str) -> Result<u32> {
    value.parse::<u32>().map_err(|e| LocError::Parse {
        row,
        column,
        message: format!("'{value}': {e}"),
    })
}

const FALLBACK_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Parse an ISO-8601 style timestamp with an explicit offset.
pub fn parse_datetime(value: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }
    for fmt in FALLBACK_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Ok(dt);
        }
    }
    // Without an offset the timestamp is taken as UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc().fixed_offset());
    }
    Err(LocError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const HEADER: &str = "file,line,type,commit,author,date,time,timezone,datetime,depth,length\n";

    #[test]
    fn coerces_numeric_and_date_columns() {
        let csv = format!(
            "{HEADER}index.html,12,html,abc123,Nabila,2025-01-15,14:23:05-08:00,-08:00,2025-01-15T14:23:05-08:00,3,42\n"
        );
        let records = load_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.line, 12);
        assert_eq!(r.depth, 3);
        assert_eq!(r.length, 42);
        assert_eq!(r.kind, "html");
        assert_eq!(r.date.hour(), 0);
        assert_eq!(r.date.offset().local_minus_utc(), -8 * 3600);
        assert_eq!(r.datetime.hour(), 14);
        assert_eq!(r.datetime.minute(), 23);
    }

    #[test]
    fn zero_rows_is_not_an_error() {
        let records = load_from_reader(HEADER.as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_value_reports_row_and_column() {
        let csv = format!(
            "{HEADER}a.js,1,js,abc,A,2025-01-15,10:00:00+00:00,+00:00,2025-01-15T10:00:00+00:00,deep,4\n"
        );
        let err = load_from_reader(csv.as_bytes()).unwrap_err();
        match err {
            LocError::Parse { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "depth");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!LocError::InvalidDate(String::new()).is_load_failure());
    }

    #[test]
    fn missing_column_is_a_load_failure() {
        let csv = "file,line\na.js,1\n";
        let err = load_from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.is_load_failure());
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let err = load_data(Path::new("/nonexistent/loc.csv")).unwrap_err();
        assert!(err.is_load_failure());
    }

    #[test]
    fn loads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loc.csv");
        std::fs::write(
            &path,
            format!(
                "{HEADER}a.js,1,js,abc,A,2025-01-15,10:00:00+00:00,+00:00,2025-01-15T10:00:00+00:00,0,4\n\
                 a.js,2,js,abc,A,2025-01-15,10:00:00+00:00,+00:00,2025-01-15T10:00:00+00:00,1,9\n"
            ),
        )
        .unwrap();

        let records = load_data(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].length, 9);
    }

    #[test]
    fn accepts_space_separated_datetime() {
        let dt = parse_datetime("2025-03-01 09:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 9);
        assert!(parse_datetime("yesterday").is_err());
    }
}

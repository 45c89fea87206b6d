use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_COMMIT_URL_BASE: &str = "https://github.com/nabilafifahq/portfolio/commit/";

pub const NO_DATA_MESSAGE: &str =
    "No commit data found. Make sure you ran elocuent to generate meta/loc.csv.";

/// One changed source line within one commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub commit: String,
    pub file: String,
    pub line: u32,
    pub depth: u32,
    pub length: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub time: String,
    pub timezone: String,
    pub datetime: DateTime<FixedOffset>,
}

/// Aggregate of every [`LineRecord`] sharing one commit id.
///
/// The per-line detail is reachable through [`Commit::lines`] but is left out
/// of serialized output, so JSON exports only carry the summary fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commit {
    pub id: String,
    pub url: String,
    pub author: String,
    pub date: DateTime<FixedOffset>,
    pub time: String,
    pub timezone: String,
    pub datetime: DateTime<FixedOffset>,
    pub hour_frac: f64,
    pub total_lines: usize,
    #[serde(skip_serializing)]
    lines: Vec<LineRecord>,
}

impl Commit {
    /// Builds a commit from a non-empty group of records. Shared fields are
    /// taken from the first record.
    pub(crate) fn from_group(id: String, url_base: &str, lines: Vec<LineRecord>) -> Option<Self> {
        let first = lines.first()?;
        let datetime = first.datetime;
        Some(Self {
            url: format!("{url_base}{id}"),
            id,
            author: first.author.clone(),
            date: first.date,
            time: first.time.clone(),
            timezone: first.timezone.clone(),
            datetime,
            hour_frac: hour_fraction(&datetime),
            total_lines: lines.len(),
            lines,
        })
    }

    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }
}

/// Hour of day plus minutes as a fraction, in the timestamp's own offset.
pub fn hour_fraction(datetime: &DateTime<FixedOffset>) -> f64 {
    use chrono::Timelike;
    datetime.hour() as f64 + datetime.minute() as f64 / 60.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub lines: usize,
    pub proportion: f64,
    pub percent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub items: Vec<SummaryItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitsOutput<'a> {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub commits: &'a [Commit],
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub selection: Option<[[f64; 2]; 2]>,
    pub count: usize,
    pub message: String,
    pub commits: Vec<String>,
    pub breakdown: Vec<LanguageShare>,
}

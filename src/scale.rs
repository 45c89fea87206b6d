//! Continuous scales mapping data values onto plot pixels.
//!
//! Axis drawing is left to plotters; what lives here is the pixel mapping used
//! for hit testing and brushing, plus the calendar rounding of the time
//! domain. The time scale rounds on the wall clock of a single display offset
//! so date ticks line up with the time-of-day axis.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset, TimeZone,
    Timelike, Utc,
};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Returns (i1, i2, inc) such that ticks are `i * inc` (or `i / -inc` when
/// `inc` is negative) for `i` in `i1..=i2`.
fn tick_params(start: f64, stop: f64, count: usize) -> Option<(i64, i64, f64)> {
    if count == 0 || !(stop > start) {
        return None;
    }
    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (start * inc).round() as i64;
        let mut i2 = (stop * inc).round() as i64;
        if (i1 as f64) / inc < start {
            i1 += 1;
        }
        if (i2 as f64) / inc > stop {
            i2 -= 1;
        }
        Some((i1, i2, -inc))
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (start / inc).round() as i64;
        let mut i2 = (stop / inc).round() as i64;
        if (i1 as f64) * inc < start {
            i1 += 1;
        }
        if (i2 as f64) * inc > stop {
            i2 -= 1;
        }
        Some((i1, i2, inc))
    }
}

/// Tick spacing for roughly `count` ticks over `[start, stop]`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> Option<f64> {
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let (_, _, inc) = tick_params(lo, hi, count)?;
    Some(if inc < 0.0 { 1.0 / -inc } else { inc })
}

fn interpolate(v: f64, d0: f64, d1: f64, r0: f64, r1: f64) -> f64 {
    if d1 == d0 {
        return (r0 + r1) / 2.0;
    }
    r0 + (v - d0) / (d1 - d0) * (r1 - r0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn map(&self, v: f64) -> f64 {
        interpolate(v, self.domain[0], self.domain[1], self.range[0], self.range[1])
    }

    pub fn invert(&self, px: f64) -> f64 {
        interpolate(px, self.range[0], self.range[1], self.domain[0], self.domain[1])
    }
}

/// Square-root scale: output area, rather than radius, grows linearly with input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl SqrtScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        interpolate(
            v.max(0.0).sqrt(),
            self.domain[0].max(0.0).sqrt(),
            self.domain[1].max(0.0).sqrt(),
            self.range[0],
            self.range[1],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

const MS_SECOND: i64 = 1_000;
const MS_MINUTE: i64 = 60 * MS_SECOND;
const MS_HOUR: i64 = 60 * MS_MINUTE;
const MS_DAY: i64 = 24 * MS_HOUR;
const MS_WEEK: i64 = 7 * MS_DAY;
const MS_MONTH: i64 = 30 * MS_DAY;
const MS_YEAR: i64 = 365 * MS_DAY;

const TICK_INTERVALS: [(TimeUnit, i64, i64); 18] = [
    (TimeUnit::Second, 1, MS_SECOND),
    (TimeUnit::Second, 5, 5 * MS_SECOND),
    (TimeUnit::Second, 15, 15 * MS_SECOND),
    (TimeUnit::Second, 30, 30 * MS_SECOND),
    (TimeUnit::Minute, 1, MS_MINUTE),
    (TimeUnit::Minute, 5, 5 * MS_MINUTE),
    (TimeUnit::Minute, 15, 15 * MS_MINUTE),
    (TimeUnit::Minute, 30, 30 * MS_MINUTE),
    (TimeUnit::Hour, 1, MS_HOUR),
    (TimeUnit::Hour, 3, 3 * MS_HOUR),
    (TimeUnit::Hour, 6, 6 * MS_HOUR),
    (TimeUnit::Hour, 12, 12 * MS_HOUR),
    (TimeUnit::Day, 1, MS_DAY),
    (TimeUnit::Day, 2, 2 * MS_DAY),
    (TimeUnit::Week, 1, MS_WEEK),
    (TimeUnit::Month, 1, MS_MONTH),
    (TimeUnit::Month, 3, 3 * MS_MONTH),
    (TimeUnit::Year, 1, MS_YEAR),
];

/// A calendar interval such as "every 15 minutes" or "every 3 months".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub step: i64,
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn floor_unit(t: NaiveDateTime, unit: TimeUnit) -> NaiveDateTime {
    let date = t.date();
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or(t);
    match unit {
        TimeUnit::Millisecond => {
            let ms = t.and_utc().timestamp_millis();
            DateTime::from_timestamp_millis(ms).map(|d| d.naive_utc()).unwrap_or(t)
        }
        TimeUnit::Second => t.with_nanosecond(0).unwrap_or(t),
        TimeUnit::Minute => date.and_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t),
        TimeUnit::Hour => date.and_hms_opt(t.hour(), 0, 0).unwrap_or(t),
        TimeUnit::Day => midnight,
        TimeUnit::Week => {
            midnight - Duration::days(date.weekday().num_days_from_sunday() as i64)
        }
        TimeUnit::Month => date
            .with_day(1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(midnight),
        TimeUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(midnight),
    }
}

fn offset_unit(t: NaiveDateTime, unit: TimeUnit, n: i64) -> NaiveDateTime {
    let months = |m: i64| {
        if m >= 0 {
            t.checked_add_months(Months::new(m as u32))
        } else {
            t.checked_sub_months(Months::new((-m) as u32))
        }
        .unwrap_or(t)
    };
    match unit {
        TimeUnit::Millisecond => t + Duration::milliseconds(n),
        TimeUnit::Second => t + Duration::seconds(n),
        TimeUnit::Minute => t + Duration::minutes(n),
        TimeUnit::Hour => t + Duration::hours(n),
        TimeUnit::Day => t + Duration::days(n),
        TimeUnit::Week => t + Duration::weeks(n),
        TimeUnit::Month => months(n),
        TimeUnit::Year => months(n * 12),
    }
}

fn field(t: NaiveDateTime, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Millisecond => (t - epoch()).num_milliseconds(),
        TimeUnit::Second => t.second() as i64,
        TimeUnit::Minute => t.minute() as i64,
        TimeUnit::Hour => t.hour() as i64,
        TimeUnit::Day => t.day() as i64 - 1,
        TimeUnit::Week => 0,
        TimeUnit::Month => t.month0() as i64,
        TimeUnit::Year => t.year() as i64,
    }
}

impl TimeInterval {
    pub fn new(unit: TimeUnit, step: i64) -> Self {
        Self {
            unit,
            step: step.max(1),
        }
    }

    fn matches(&self, t: NaiveDateTime) -> bool {
        self.step <= 1 || field(t, self.unit).rem_euclid(self.step) == 0
    }

    pub fn floor(&self, t: NaiveDateTime) -> NaiveDateTime {
        match self.unit {
            TimeUnit::Millisecond => {
                let ms = field(t, self.unit);
                epoch() + Duration::milliseconds(ms - ms.rem_euclid(self.step))
            }
            TimeUnit::Year => {
                let year = t.year() as i64;
                let year = year - year.rem_euclid(self.step);
                NaiveDate::from_ymd_opt(year as i32, 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .unwrap_or(t)
            }
            unit => {
                let mut f = floor_unit(t, unit);
                while !self.matches(f) {
                    f = floor_unit(offset_unit(f, unit, -1), unit);
                }
                f
            }
        }
    }

    /// The first interval boundary strictly after the boundary `t`.
    pub fn next(&self, t: NaiveDateTime) -> NaiveDateTime {
        match self.unit {
            TimeUnit::Millisecond | TimeUnit::Year => offset_unit(t, self.unit, self.step),
            unit => {
                let mut g = floor_unit(offset_unit(t, unit, 1), unit);
                while !self.matches(g) {
                    g = floor_unit(offset_unit(g, unit, 1), unit);
                }
                g
            }
        }
    }

    pub fn ceil(&self, t: NaiveDateTime) -> NaiveDateTime {
        let f = self.floor(t);
        if f == t {
            t
        } else {
            self.next(f)
        }
    }

    /// Boundaries within `[start, stop]`.
    pub fn range(&self, start: NaiveDateTime, stop: NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();
        let mut t = self.ceil(start);
        while t <= stop {
            out.push(t);
            let n = self.next(t);
            if n <= t {
                break;
            }
            t = n;
        }
        out
    }
}

/// Interval producing about `count` ticks between two millisecond timestamps.
pub fn tick_interval(start_ms: i64, stop_ms: i64, count: usize) -> Option<TimeInterval> {
    if start_ms == stop_ms || count == 0 {
        return None;
    }
    let target = (stop_ms - start_ms).abs() as f64 / count as f64;
    let i = TICK_INTERVALS.partition_point(|&(_, _, dur)| (dur as f64) <= target);

    if i == TICK_INTERVALS.len() {
        let step = tick_step(
            start_ms as f64 / MS_YEAR as f64,
            stop_ms as f64 / MS_YEAR as f64,
            count,
        )?;
        return Some(TimeInterval::new(TimeUnit::Year, step.round() as i64));
    }
    if i == 0 {
        let step = tick_step(start_ms as f64, stop_ms as f64, count)?.max(1.0);
        return Some(TimeInterval::new(TimeUnit::Millisecond, step.floor() as i64));
    }

    let (_, _, lower) = TICK_INTERVALS[i - 1];
    let (_, _, upper) = TICK_INTERVALS[i];
    let pick = if target / (lower as f64) < (upper as f64) / target {
        i - 1
    } else {
        i
    };
    let (unit, step, _) = TICK_INTERVALS[pick];
    Some(TimeInterval::new(unit, step))
}

fn to_wall(t: &DateTime<Utc>, offset: FixedOffset) -> NaiveDateTime {
    t.with_timezone(&offset).naive_local()
}

fn from_wall(t: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    (t - Duration::seconds(offset.local_minus_utc() as i64)).and_utc()
}

/// Continuous time scale. Instants are stored in UTC; calendar rounding and
/// ticks use the wall clock of `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: [DateTime<Utc>; 2],
    range: [f64; 2],
    offset: FixedOffset,
}

impl TimeScale {
    /// The display offset is taken from the first domain endpoint.
    pub fn new<Tz: TimeZone>(domain: [DateTime<Tz>; 2], range: [f64; 2]) -> Self {
        let [a, b] = domain;
        let offset = a.offset().fix();
        Self {
            domain: [a.with_timezone(&Utc), b.with_timezone(&Utc)],
            range,
            offset,
        }
    }

    /// Scale over the earliest and latest of `instants`, or `None` if empty.
    /// The display offset is that of the first instant seen.
    pub fn from_extent<'a, Tz, I>(instants: I, range: [f64; 2]) -> Option<Self>
    where
        Tz: TimeZone + 'a,
        I: IntoIterator<Item = &'a DateTime<Tz>>,
    {
        let mut offset: Option<FixedOffset> = None;
        let mut min: Option<DateTime<Utc>> = None;
        let mut max: Option<DateTime<Utc>> = None;
        for dt in instants {
            offset.get_or_insert_with(|| dt.offset().fix());
            let dt = dt.with_timezone(&Utc);
            min = Some(min.map_or(dt, |m| m.min(dt)));
            max = Some(max.map_or(dt, |m| m.max(dt)));
        }
        Some(Self {
            domain: [min?, max?],
            range,
            offset: offset?,
        })
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn domain(&self) -> [DateTime<Utc>; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn domain_millis(&self) -> (i64, i64) {
        (
            self.domain[0].timestamp_millis(),
            self.domain[1].timestamp_millis(),
        )
    }

    pub fn map<Tz: TimeZone>(&self, dt: &DateTime<Tz>) -> f64 {
        self.map_millis(dt.timestamp_millis() as f64)
    }

    pub fn map_millis(&self, ms: f64) -> f64 {
        let (d0, d1) = self.domain_millis();
        interpolate(ms, d0 as f64, d1 as f64, self.range[0], self.range[1])
    }

    /// Milliseconds since the epoch at pixel `px`.
    pub fn invert_millis(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain_millis();
        interpolate(px, self.range[0], self.range[1], d0 as f64, d1 as f64)
    }

    /// Round the domain outward to the interval that yields about ten ticks.
    /// A single-instant domain is left as is.
    pub fn nice(mut self) -> Self {
        let (d0, d1) = self.domain_millis();
        if let Some(interval) = tick_interval(d0, d1, 10) {
            let lo = interval.floor(to_wall(&self.domain[0], self.offset));
            let hi = interval.ceil(to_wall(&self.domain[1], self.offset));
            self.domain = [from_wall(lo, self.offset), from_wall(hi, self.offset)];
        }
        self
    }

    /// Calendar-aligned instants for about `count` ticks, in the display offset.
    pub fn ticks(&self, count: usize) -> Vec<DateTime<FixedOffset>> {
        let (d0, d1) = self.domain_millis();
        match tick_interval(d0, d1, count) {
            Some(interval) => interval
                .range(
                    to_wall(&self.domain[0], self.offset),
                    to_wall(&self.domain[1], self.offset),
                )
                .into_iter()
                .map(|t| from_wall(t, self.offset).with_timezone(&self.offset))
                .collect(),
            None => vec![self.domain[0].with_timezone(&self.offset)],
        }
    }
}

/// Label for an axis tick, picking the coarsest unit the instant sits on.
pub fn time_tick_label(t: &DateTime<FixedOffset>) -> String {
    let n = t.naive_local();
    let below = |unit| floor_unit(n, unit) < n;
    let fmt = if below(TimeUnit::Second) {
        ".%3f"
    } else if below(TimeUnit::Minute) {
        ":%S"
    } else if below(TimeUnit::Hour) {
        "%I:%M"
    } else if below(TimeUnit::Day) {
        "%I %p"
    } else if below(TimeUnit::Month) {
        if below(TimeUnit::Week) {
            "%a %d"
        } else {
            "%b %d"
        }
    } else if below(TimeUnit::Year) {
        "%B"
    } else {
        "%Y"
    };
    n.format(fmt).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn linear_maps_hours_onto_inverted_range() {
        let y = LinearScale::new([0.0, 24.0], [570.0, 10.0]);
        assert_eq!(y.map(0.0), 570.0);
        assert_eq!(y.map(24.0), 10.0);
        assert_eq!(y.map(12.0), 290.0);
        assert_eq!(y.invert(290.0), 12.0);
    }

    #[test]
    fn tick_step_picks_round_numbers() {
        assert_eq!(tick_step(0.0, 24.0, 10), Some(2.0));
        assert_eq!(tick_step(0.0, 1.0, 5), Some(0.2));
        assert_eq!(tick_step(1.0, 1.0, 5), None);
    }

    #[test]
    fn sqrt_scale_maps_area_linearly() {
        let r = SqrtScale::new([1.0, 100.0], [4.0, 28.0]);
        assert_eq!(r.map(1.0), 4.0);
        assert_eq!(r.map(100.0), 28.0);
        let mid = r.map(25.0);
        assert!((mid - (4.0 + 24.0 * 4.0 / 9.0)).abs() < 1e-9);
    }

    #[test]
    fn degenerate_domains_map_to_middle() {
        assert_eq!(SqrtScale::new([5.0, 5.0], [4.0, 28.0]).map(5.0), 16.0);
        let t = utc("2025-01-15T10:00:00Z");
        let x = TimeScale::new([t, t], [40.0, 990.0]).nice();
        assert_eq!(x.map(&t), 515.0);
        assert_eq!(x.domain(), [t, t]);
    }

    #[test]
    fn nice_rounds_to_days() {
        let x = TimeScale::new(
            [utc("2025-01-15T14:30:00Z"), utc("2025-01-24T09:00:00Z")],
            [0.0, 100.0],
        )
        .nice();
        assert_eq!(
            x.domain(),
            [utc("2025-01-15T00:00:00Z"), utc("2025-01-25T00:00:00Z")]
        );
    }

    #[test]
    fn nice_rounds_to_months() {
        let x = TimeScale::new(
            [utc("2024-02-10T00:00:00Z"), utc("2024-11-20T00:00:00Z")],
            [0.0, 100.0],
        )
        .nice();
        assert_eq!(
            x.domain(),
            [utc("2024-02-01T00:00:00Z"), utc("2024-12-01T00:00:00Z")]
        );
    }

    #[test]
    fn multi_day_interval_follows_day_of_month() {
        let every2 = TimeInterval::new(TimeUnit::Day, 2);
        let t = utc("2025-01-04T12:00:00Z").naive_utc();
        assert_eq!(every2.floor(t), utc("2025-01-03T00:00:00Z").naive_utc());
        assert_eq!(every2.ceil(t), utc("2025-01-05T00:00:00Z").naive_utc());
    }

    #[test]
    fn week_floors_to_sunday() {
        let week = TimeInterval::new(TimeUnit::Week, 1);
        // 2025-01-15 is a Wednesday.
        let t = utc("2025-01-15T08:00:00Z").naive_utc();
        assert_eq!(week.floor(t), utc("2025-01-12T00:00:00Z").naive_utc());
    }

    #[test]
    fn picks_closest_tick_interval() {
        let hour = MS_HOUR;
        assert_eq!(
            tick_interval(0, 10 * hour, 10),
            Some(TimeInterval::new(TimeUnit::Hour, 1))
        );
        assert_eq!(
            tick_interval(0, 40 * MS_YEAR, 10),
            Some(TimeInterval::new(TimeUnit::Year, 5))
        );
        assert_eq!(
            tick_interval(0, 500, 10),
            Some(TimeInterval::new(TimeUnit::Millisecond, 50))
        );
    }

    #[test]
    fn time_ticks_are_inclusive() {
        let x = TimeScale::new(
            [utc("2025-01-15T00:00:00Z"), utc("2025-01-25T00:00:00Z")],
            [0.0, 100.0],
        );
        let ticks = x.ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], utc("2025-01-15T00:00:00Z"));
        assert_eq!(ticks[10], utc("2025-01-25T00:00:00Z"));
    }

    #[test]
    fn nice_and_ticks_follow_display_offset() {
        let a = DateTime::parse_from_rfc3339("2025-01-15T14:30:00-08:00").unwrap();
        let b = DateTime::parse_from_rfc3339("2025-01-24T09:00:00-08:00").unwrap();
        let x = TimeScale::new([a, b], [0.0, 100.0]).nice();
        assert_eq!(x.offset(), FixedOffset::west_opt(8 * 3600).unwrap());
        assert_eq!(
            x.domain(),
            [utc("2025-01-15T08:00:00Z"), utc("2025-01-25T08:00:00Z")]
        );
        let first = x.ticks(10)[0];
        assert_eq!(time_tick_label(&first), "Wed 15");
        assert_eq!(first.to_rfc3339(), "2025-01-15T00:00:00-08:00");
    }

    #[test]
    fn extent_takes_offset_of_first_instant() {
        let a = DateTime::parse_from_rfc3339("2025-01-20T09:00:00+02:00").unwrap();
        let b = DateTime::parse_from_rfc3339("2025-01-15T09:00:00-08:00").unwrap();
        let x = TimeScale::from_extent([a, b].iter(), [0.0, 10.0]).unwrap();
        assert_eq!(x.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(x.domain()[0], b.with_timezone(&Utc));
        assert_eq!(x.invert_millis(10.0), a.timestamp_millis() as f64);
    }

    #[test]
    fn tick_labels_use_coarsest_unit() {
        let label = |s: &str| time_tick_label(&DateTime::parse_from_rfc3339(s).unwrap());
        assert_eq!(label("2025-01-01T00:00:00Z"), "2025");
        assert_eq!(label("2025-03-01T00:00:00Z"), "March");
        assert_eq!(label("2025-01-12T00:00:00Z"), "Jan 12");
        assert_eq!(label("2025-01-15T00:00:00Z"), "Wed 15");
        assert_eq!(label("2025-01-15T15:00:00Z"), "03 PM");
        assert_eq!(label("2025-01-15T15:30:00Z"), "03:30");
        assert_eq!(label("2025-01-15T00:00:00-08:00"), "Wed 15");
    }
}

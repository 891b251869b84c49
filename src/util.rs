use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Parse a backend timestamp into local wall-clock time.
///
/// Accepted forms:
/// 1. RFC 3339 with offset (`2026-10-05T08:30:00Z`), converted to local time
/// 2. Naive ISO (`2026-10-05T08:30:00`, optional fraction), taken as local time
/// 3. SQLite datetime (`2026-10-05 08:30:00`), taken as local time
/// 4. Bare date (`2026-10-05`), midnight local time
pub fn parse_recorded_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Calendar date of a backend timestamp, time of day truncated.
pub fn recorded_date(raw: &str) -> Option<NaiveDate> {
    parse_recorded_at(raw).map(|dt| dt.date())
}

/// Today's date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Short chart label, e.g. "Oct 5".
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

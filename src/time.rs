use crate::cell::Cell;

const FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
];

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A record's timestamp. `Invalid` is kept rather than dropping the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Time {
    Valid(chrono::NaiveDateTime),
    Invalid,
}

impl Time {
    pub fn is_valid(&self) -> bool {
        matches!(self, Time::Valid(_))
    }

    pub fn datetime(&self) -> Option<chrono::NaiveDateTime> {
        match self {
            Time::Valid(t) => Some(*t),
            Time::Invalid => None,
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Time::Valid(t) => write!(f, "{}", t.format(DISPLAY_FORMAT)),
            Time::Invalid => write!(f, "Invalid Date"),
        }
    }
}

impl serde::Serialize for Time {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Time::Valid(_) => s.collect_str(self),
            Time::Invalid => s.serialize_none(),
        }
    }
}

/// Numbers are epoch milliseconds, text is tried against the common
/// flow-export layouts. Anything else is `Time::Invalid`.
pub fn parse_time(cell: Option<&Cell>) -> Time {
    match cell {
        Some(Cell::Number(ms)) if ms.is_finite() => {
            chrono::DateTime::from_timestamp_millis(ms.trunc() as i64)
                .map(|t| Time::Valid(t.naive_utc()))
                .unwrap_or(Time::Invalid)
        }
        Some(Cell::Text(s)) => parse_time_str(s.trim()),
        _ => Time::Invalid,
    }
}

fn parse_time_str(s: &str) -> Time {
    if let Ok(t) = chrono::DateTime::parse_from_rfc3339(s) {
        return Time::Valid(t.naive_utc());
    }
    for fmt in FORMATS {
        if let Ok(t) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Time::Valid(t);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(Time::Valid)
        .unwrap_or(Time::Invalid)
}

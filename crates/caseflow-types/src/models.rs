use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Lifecycle status of a work request.
///
/// A `Case` is `open` until an executor takes it, then `accepted` forever
/// (the row stays behind as a historical record). The live copy created at
/// acceptance is `in_process`, and the immutable artifact created at
/// completion is `closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    Accepted,
    InProcess,
    Closed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Accepted => "accepted",
            Status::InProcess => "in_process",
            Status::Closed => "closed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "open" => Some(Status::Open),
            "accepted" => Some(Status::Accepted),
            "in_process" => Some(Status::InProcess),
            "closed" => Some(Status::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a stored UUID, substituting the nil UUID on corruption.
pub fn parse_uuid(raw: &str, field: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", field, raw, e);
        Uuid::default()
    })
}

/// Parse a stored status string, substituting `open` on corruption.
pub fn parse_status(raw: &str, field: &str) -> Status {
    Status::parse(raw).unwrap_or_else(|| {
        warn!("Corrupt {} '{}'", field, raw);
        Status::Open
    })
}

/// Parse a stored timestamp.
///
/// SQLite's `datetime('now')` produces "YYYY-MM-DD HH:MM:SS" without a
/// timezone, so fall back to parsing as naive UTC.
pub fn parse_created_at(raw: &str, field: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt {} '{}': {}", field, raw, e);
            DateTime::default()
        })
}

/// Parse a file-ref sequence stored as a JSON array in a TEXT column.
pub fn parse_file_refs(raw: &str, field: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", field, raw, e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [Status::Open, Status::Accepted, Status::InProcess, Status::Closed] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("reopened"), None);
    }

    #[test]
    fn created_at_accepts_sqlite_format() {
        let ts = parse_created_at("2026-03-01 12:30:00", "created_at");
        assert_eq!(ts.to_rfc3339(), "2026-03-01T12:30:00+00:00");
    }

    #[test]
    fn file_refs_tolerate_corrupt_json() {
        assert_eq!(parse_file_refs(r#"["/files/a","/files/b"]"#, "files").len(), 2);
        assert!(parse_file_refs("not json", "files").is_empty());
    }
}

use std::fmt::Display;

use chrono::{Duration, NaiveDateTime};

pub const GRAPH_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub username: String,
}

impl UserInfo {
    /// The token response carries no profile, so every session gets the same placeholder.
    pub fn placeholder() -> Self {
        UserInfo {
            name: "User".to_owned(),
            username: "user@example.com".to_owned(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

//  Status codes from: https://learn.microsoft.com/en-us/graph/api/resources/scheduleinformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotStatus {
    Free,
    Tentative,
    Busy,
    OutOfOffice,
    WorkingElsewhere,
    Unknown,
}

impl SlotStatus {
    pub fn from_code(code: char) -> Self {
        match code {
            '0' => SlotStatus::Free,
            '1' => SlotStatus::Tentative,
            '2' => SlotStatus::Busy,
            '3' => SlotStatus::OutOfOffice,
            '4' => SlotStatus::WorkingElsewhere,
            _ => SlotStatus::Unknown,
        }
    }
}

impl Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotStatus::Free => write!(f, "Free"),
            SlotStatus::Tentative => write!(f, "Tentative"),
            SlotStatus::Busy => write!(f, "Busy"),
            SlotStatus::OutOfOffice => write!(f, "Out of office"),
            SlotStatus::WorkingElsewhere => write!(f, "Working elsewhere"),
            SlotStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AvailabilityBlock {
    pub time: NaiveDateTime,
    pub status: SlotStatus,
}

/// Expands an `availabilityView` string into one block per interval, starting at `start`.
pub fn expand_availability(
    view: &str,
    start: NaiveDateTime,
    interval_minutes: u32,
) -> Vec<AvailabilityBlock> {
    let step = Duration::minutes(i64::from(interval_minutes));

    view.chars()
        .zip(0i32..)
        .map(|(code, index)| AvailabilityBlock {
            time: start + step * index,
            status: SlotStatus::from_code(code),
        })
        .collect()
}

/// A calendar event as the page renders it. Fields missing upstream fall back to empty.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    pub body_preview: Option<String>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default)]
    pub date_time: String,
}

impl EventTime {
    /// Graph returns 7 fractional digits; the page only needs minutes.
    pub fn short(&self) -> String {
        let trimmed = self.date_time.split('.').next().unwrap_or_default();
        match NaiveDateTime::parse_from_str(trimmed, GRAPH_DATE_TIME_FORMAT) {
            Ok(x) => x.format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => self.date_time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, GRAPH_DATE_TIME_FORMAT).unwrap()
    }

    #[test]
    fn expands_view_into_interval_blocks() {
        let blocks = expand_availability("0213", at("2025-08-02T09:00:00"), 30);

        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0].time, at("2025-08-02T09:00:00"));
        assert_eq!(blocks[0].status, SlotStatus::Free);
        assert_eq!(blocks[1].time, at("2025-08-02T09:30:00"));
        assert_eq!(blocks[1].status, SlotStatus::Busy);
        assert_eq!(blocks[2].status, SlotStatus::Tentative);
        assert_eq!(blocks[3].time, at("2025-08-02T10:30:00"));
        assert_eq!(blocks[3].status, SlotStatus::OutOfOffice);
    }

    #[test]
    fn empty_view_has_no_blocks() {
        assert!(expand_availability("", at("2025-08-02T09:00:00"), 30).is_empty());
    }

    #[test]
    fn unknown_codes_are_kept() {
        let blocks = expand_availability("4x", at("2025-08-02T23:45:00"), 15);
        assert_eq!(blocks[0].status, SlotStatus::WorkingElsewhere);
        assert_eq!(blocks[1].status, SlotStatus::Unknown);
        assert_eq!(blocks[1].time, at("2025-08-03T00:00:00"));
    }

    #[test]
    fn event_time_is_shortened() {
        let event: CalendarEvent = serde_json::from_value(serde_json::json!({
            "subject": "Standup",
            "start": { "dateTime": "2025-08-02T09:00:00.0000000", "timeZone": "UTC" },
            "end": { "dateTime": "garbage" }
        }))
        .unwrap();

        assert_eq!(event.start.short(), "2025-08-02 09:00");
        assert_eq!(event.end.short(), "garbage");
        assert_eq!(event.body_preview, None);
    }
}

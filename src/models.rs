use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Bucket label for rows whose unit, date or session is missing.
pub const UNCLASSIFIED: &str = "UNCLASSIFIED";

/// One check-in row as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub placement: Option<String>,
}

/// A registered attendee from the roster table.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RosterRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub placement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Selector::All,
            Some(value) if value.eq_ignore_ascii_case("all") => Selector::All,
            Some(value) => Selector::Only(value.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Selector::All => "all",
            Selector::Only(value) => value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub date: Selector,
    pub session: Selector,
    pub unit: Selector,
}

#[derive(Debug, Deserialize, Default)]
pub struct FilterQuery {
    pub date: Option<String>,
    pub session: Option<String>,
    pub unit: Option<String>,
}

impl From<&FilterQuery> for Filters {
    fn from(query: &FilterQuery) -> Self {
        Self {
            date: Selector::parse(query.date.as_deref()),
            session: Selector::parse(query.session.as_deref()),
            unit: Selector::parse(query.unit.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateStat {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitStat {
    pub unit: String,
    pub count: u64,
    pub target: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub filtered: Vec<AttendanceRecord>,
    pub total_checkins: u64,
    pub unique_attendees: u64,
    pub by_date: Vec<DateStat>,
    pub by_unit: Vec<UnitStat>,
    pub top_day: Option<DateStat>,
    pub top_unit: Option<UnitStat>,
    pub absentees: Vec<RosterRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterOptions {
    pub dates: Vec<String>,
    pub sessions: Vec<String>,
    pub units: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WinnerLock {
    pub unit: String,
    pub percentage: u32,
    pub locked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncStatus {
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub attendance_rows: usize,
    pub roster_rows: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub session: String,
    pub winner: Option<WinnerLock>,
    pub sync: SyncStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WinnersResponse {
    pub winners: BTreeMap<String, WinnerLock>,
}

/// Employee ids arrive as either JSON numbers or strings.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.and_then(|id| {
        let text = match id {
            RawId::Text(text) => text.trim().to_string(),
            RawId::Int(value) => value.to_string(),
            RawId::Float(value) => value.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }))
}

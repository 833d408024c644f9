use crate::models::{
    AttendanceRecord, DashboardStats, DateStat, FilterOptions, Filters, RosterRecord, Selector,
    UNCLASSIFIED, UnitStat,
};
use crate::targets::{TargetTable, normalize_label};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Filters and aggregates the loaded rows. Pure: identical inputs always
/// produce identical output.
pub fn build_dashboard(
    records: &[AttendanceRecord],
    roster: &[RosterRecord],
    filters: &Filters,
    targets: &TargetTable,
) -> DashboardStats {
    let filtered: Vec<AttendanceRecord> = records
        .iter()
        .filter(|record| matches(record, filters))
        .cloned()
        .collect();

    let present: HashSet<&str> = filtered
        .iter()
        .filter_map(|record| record.employee_id.as_deref())
        .collect();

    let mut per_date: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    let mut per_unit: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for record in &filtered {
        let date = per_date.entry(date_label(record.date.as_deref())).or_default();
        let unit = per_unit.entry(unit_label(record.unit.as_deref())).or_default();
        if let Some(id) = record.employee_id.as_deref() {
            date.insert(id);
            unit.insert(id);
        }
    }

    let mut by_date: Vec<DateStat> = per_date
        .into_iter()
        .map(|(date, ids)| DateStat {
            date,
            count: ids.len() as u64,
        })
        .collect();
    by_date.sort_by(|a, b| date_order(&a.date).cmp(&date_order(&b.date)));

    let unit_stat = |unit: &str| {
        let count = per_unit.get(unit).map_or(0, |ids| ids.len() as u64);
        let target = targets.target_for(unit).unwrap_or(0);
        UnitStat {
            unit: unit.to_string(),
            count,
            target,
            percentage: percentage(count, target),
        }
    };
    let by_unit: Vec<UnitStat> = match &filters.unit {
        Selector::All => targets.units().map(unit_stat).collect(),
        Selector::Only(unit) => vec![unit_stat(&normalize_label(unit))],
    };

    let top_day = first_max_by(&by_date, |stat| stat.count).cloned();
    let top_unit = first_max_by(&by_unit, |stat| u64::from(stat.percentage)).cloned();

    let absentees = roster
        .iter()
        .filter(|member| match &filters.unit {
            Selector::All => true,
            Selector::Only(unit) => unit_label(member.unit.as_deref()) == normalize_label(unit),
        })
        .filter(|member| match member.employee_id.as_deref() {
            Some(id) => !present.contains(id),
            None => true,
        })
        .cloned()
        .collect();

    DashboardStats {
        total_checkins: filtered.len() as u64,
        unique_attendees: present.len() as u64,
        filtered,
        by_date,
        by_unit,
        top_day,
        top_unit,
        absentees,
    }
}

/// `round(count / target * 100)`, or 0 for a zero target.
pub fn percentage(count: u64, target: u32) -> u32 {
    if target == 0 {
        return 0;
    }
    ((count as f64 / f64::from(target)) * 100.0).round() as u32
}

pub fn filter_options(records: &[AttendanceRecord], targets: &TargetTable) -> FilterOptions {
    let mut dates = BTreeSet::new();
    let mut sessions = BTreeSet::new();
    let mut extra_units = BTreeSet::new();
    for record in records {
        dates.insert(date_label(record.date.as_deref()));
        sessions.insert(session_label(record.session.as_deref()));
        let unit = unit_label(record.unit.as_deref());
        if targets.target_for(&unit).is_none() {
            extra_units.insert(unit);
        }
    }

    let mut dates: Vec<String> = dates.into_iter().collect();
    dates.sort_by(|a, b| date_order(a).cmp(&date_order(b)));

    FilterOptions {
        dates,
        sessions: sessions.into_iter().collect(),
        units: targets
            .units()
            .map(str::to_string)
            .chain(extra_units)
            .collect(),
    }
}

fn matches(record: &AttendanceRecord, filters: &Filters) -> bool {
    let date_ok = match &filters.date {
        Selector::All => true,
        Selector::Only(date) => date_label(record.date.as_deref()) == date_label(Some(date)),
    };
    let session_ok = match &filters.session {
        Selector::All => true,
        Selector::Only(session) => {
            session_label(record.session.as_deref()) == normalize_label(session)
        }
    };
    let unit_ok = match &filters.unit {
        Selector::All => true,
        Selector::Only(unit) => unit_label(record.unit.as_deref()) == normalize_label(unit),
    };
    date_ok && session_ok && unit_ok
}

fn bucket(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNCLASSIFIED.to_string(),
    }
}

fn date_label(raw: Option<&str>) -> String {
    let label = bucket(raw);
    if label.eq_ignore_ascii_case(UNCLASSIFIED) {
        UNCLASSIFIED.to_string()
    } else {
        label
    }
}

fn unit_label(raw: Option<&str>) -> String {
    normalize_label(&bucket(raw))
}

fn session_label(raw: Option<&str>) -> String {
    normalize_label(&bucket(raw))
}

/// Key a session selection is stored under: `all`, or the normalized
/// session label, so differently cased selections share one key.
pub fn session_key(session: &Selector) -> String {
    match session {
        Selector::All => "all".to_string(),
        Selector::Only(label) => normalize_label(label),
    }
}

// Real dates first, lexically; the null bucket last.
fn date_order(date: &str) -> (bool, &str) {
    (date == UNCLASSIFIED, date)
}

fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> u64) -> Option<&T> {
    let mut best: Option<&T> = None;
    for item in items {
        if best.is_none_or(|current| key(item) > key(current)) {
            best = Some(item);
        }
    }
    best
}

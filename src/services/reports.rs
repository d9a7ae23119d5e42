// Reports service
// Analytics page data. The figures are a fixed sample set, not derived from the store.

use serde::Serialize;

/// Reporting window requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    /// Lenient parse: anything unrecognized falls back to the default window.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("week") => TimeRange::Week,
            Some("month") | None => TimeRange::Month,
            Some("quarter") => TimeRange::Quarter,
            Some("year") => TimeRange::Year,
            Some(other) => {
                log::debug!("Unrecognized report time range '{}', using month", other);
                TimeRange::Month
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Quarter => "quarter",
            TimeRange::Year => "year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_meetings: u32,
    pub total_meetings_change: i32,
    pub average_duration: u32,
    pub average_duration_change: i32,
    pub completion_rate: u32,
    pub completion_rate_change: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    pub name: &'static str,
    pub scheduled: u32,
    pub completed: u32,
}

/// One slice of a breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub name: &'static str,
    pub value: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub summary: ReportSummary,
    pub by_time: Vec<TimeBucket>,
    pub by_client: Vec<Slice>,
    pub by_type: Vec<Slice>,
}

const PALETTE: [&str; 5] = ["#4f46e5", "#22c55e", "#f59e0b", "#ef4444", "#94a3b8"];

fn slices(entries: [(&'static str, u32); 5]) -> Vec<Slice> {
    entries
        .into_iter()
        .zip(PALETTE)
        .map(|((name, value), color)| Slice { name, value, color })
        .collect()
}

fn bucket(name: &'static str, scheduled: u32, completed: u32) -> TimeBucket {
    TimeBucket {
        name,
        scheduled,
        completed,
    }
}

/// Report for `range`. Every range currently yields the same sample figures.
pub fn get_report(range: TimeRange) -> ReportData {
    log::debug!("Building {} report", range.as_str());

    ReportData {
        summary: ReportSummary {
            total_meetings: 32,
            total_meetings_change: 12,
            average_duration: 45,
            average_duration_change: 5,
            completion_rate: 92,
            completion_rate_change: 3,
        },
        by_time: vec![
            bucket("Week 1", 10, 9),
            bucket("Week 2", 8, 7),
            bucket("Week 3", 12, 11),
            bucket("Week 4", 6, 5),
        ],
        by_client: slices([
            ("Acme Corp", 12),
            ("TechStart", 8),
            ("Global Shipping", 6),
            ("Nova Ventures", 4),
            ("Others", 2),
        ]),
        by_type: slices([
            ("Strategy Review", 10),
            ("Contract Discussion", 8),
            ("Partnership", 7),
            ("Product Demo", 5),
            ("Introduction", 2),
        ]),
    }
}

//! Chart-ready structures built from raw risk records.
//!
//! Every builder is a pure function of its input slice: the same records
//! always produce the same chart, inputs are only borrowed, and missing
//! optional fields have already been filled with their defaults by
//! deserialization.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use time::Date;
use time::macros::date;

use crate::models::{
    MilestoneRecord, MilestoneStatus, RiskHistoryPoint, RiskRecord, Severity, iso_date,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Gray,
}

impl ChartColor {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartColor::Red => "red",
            ChartColor::Orange => "orange",
            ChartColor::Yellow => "yellow",
            ChartColor::Green => "green",
            ChartColor::Blue => "blue",
            ChartColor::Gray => "gray",
        }
    }
}

impl Severity {
    /// Impact axis value used by the risk evaluation chart.
    pub fn impact(self) -> f64 {
        match self {
            Severity::Critical => 0.9,
            Severity::High => 0.7,
            Severity::Medium => 0.5,
            Severity::Low => 0.3,
        }
    }

    pub fn color(self) -> ChartColor {
        match self {
            Severity::Critical => ChartColor::Red,
            Severity::High => ChartColor::Orange,
            Severity::Medium => ChartColor::Yellow,
            Severity::Low => ChartColor::Green,
        }
    }
}

impl MilestoneStatus {
    pub fn color(self) -> ChartColor {
        match self {
            MilestoneStatus::Completed => ChartColor::Green,
            MilestoneStatus::InProgress => ChartColor::Blue,
            MilestoneStatus::NotStarted | MilestoneStatus::Unknown => ChartColor::Gray,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: &'static str,
    pub range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GaugeBand {
    pub from: u8,
    pub to: u8,
    pub color: ChartColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthGauge {
    pub title: &'static str,
    pub value: u8,
    pub bands: [GaugeBand; 3],
    pub threshold_line: u8,
}

const HEALTH_BANDS: [GaugeBand; 3] = [
    GaugeBand { from: 0, to: 30, color: ChartColor::Red },
    GaugeBand { from: 30, to: 70, color: ChartColor::Yellow },
    GaugeBand { from: 70, to: 100, color: ChartColor::Green },
];

/// Gauge over a 0–100 health score. Bands are fixed, not derived from data.
pub fn build_health_gauge(percentage: u8) -> HealthGauge {
    let value = percentage.min(100);
    HealthGauge {
        title: "Project Health",
        value,
        bands: HEALTH_BANDS,
        threshold_line: value,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub title: &'static str,
    pub slices: Vec<PieSlice>,
}

/// Count risks per factor, in the order each factor is first seen.
pub fn build_risk_breakdown(risks: &[RiskRecord]) -> RiskBreakdown {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut slices: Vec<PieSlice> = Vec::new();
    for risk in risks {
        match index.get(risk.factor.as_str()) {
            Some(&i) => slices[i].count += 1,
            None => {
                index.insert(risk.factor.as_str(), slices.len());
                slices.push(PieSlice {
                    label: risk.factor.clone(),
                    count: 1,
                });
            }
        }
    }
    RiskBreakdown {
        title: "Risk Breakdown by Type",
        slices,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub color: ChartColor,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskScatter {
    pub title: &'static str,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub points: Vec<ScatterPoint>,
}

/// Probability against severity impact, one point per risk.
pub fn build_risk_scatter(risks: &[RiskRecord]) -> RiskScatter {
    let points = risks
        .iter()
        .map(|risk| ScatterPoint {
            x: risk.probability,
            y: risk.severity.impact(),
            color: risk.severity.color(),
            label: format!("{}: {}", risk.factor, risk.description),
        })
        .collect();
    RiskScatter {
        title: "Risk Evaluation Chart (Probability vs. Impact)",
        x_axis: Axis {
            title: "Probability",
            range: Some((0.0, 1.0)),
        },
        y_axis: Axis {
            title: "Impact",
            range: Some((0.0, 1.0)),
        },
        points,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub name: Severity,
    pub color: ChartColor,
    pub values: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskTrend {
    pub title: &'static str,
    pub x_axis: Axis,
    pub y_axis: Axis,
    #[serde(serialize_with = "serialize_dates")]
    pub dates: Vec<Date>,
    /// Critical, High, Medium, Low; each aligned with `dates`.
    pub series: Vec<Series>,
}

impl RiskTrend {
    pub fn series(&self, severity: Severity) -> Option<&Series> {
        self.series.iter().find(|s| s.name == severity)
    }
}

/// Four severity series over the history dates. Missing counts are zero.
pub fn build_risk_trend(history: &[RiskHistoryPoint]) -> RiskTrend {
    let dates = history.iter().map(|point| point.date).collect();
    let series = Severity::ALL
        .iter()
        .map(|&severity| Series {
            name: severity,
            color: severity.color(),
            values: history.iter().map(|point| point.count(severity)).collect(),
        })
        .collect();
    RiskTrend {
        title: "Risk Trend Over Time",
        x_axis: Axis {
            title: "Date",
            range: None,
        },
        y_axis: Axis {
            title: "Number of Risks",
            range: None,
        },
        dates,
        series,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBar {
    pub name: String,
    #[serde(serialize_with = "iso_date::serialize")]
    pub start: Date,
    #[serde(serialize_with = "iso_date::serialize")]
    pub end: Date,
    pub status: MilestoneStatus,
    pub color: ChartColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub title: &'static str,
    pub bars: Vec<TimelineBar>,
}

/// One bar per milestone from planned date to actual date, or to the planned
/// date again while the milestone has no actual date.
pub fn build_timeline(milestones: &[MilestoneRecord]) -> Timeline {
    let bars = milestones
        .iter()
        .map(|milestone| TimelineBar {
            name: milestone.name.clone(),
            start: milestone.planned_date,
            end: milestone.actual_date.unwrap_or(milestone.planned_date),
            status: milestone.status,
            color: milestone.status.color(),
        })
        .collect();
    Timeline {
        title: "Project Milestones",
        bars,
    }
}

pub const MITIGATION_ACTIONS: [&str; 3] = [
    "Review resource allocation and consider adding temporary contractors",
    "Implement fast-tracking by overlapping activities",
    "Schedule urgent stakeholder meeting to address approval delays",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mitigation {
    pub factor: String,
    pub description: String,
    pub actions: &'static [&'static str],
}

/// Recommended actions for every critical risk, in input order.
pub fn build_mitigations(risks: &[RiskRecord]) -> Vec<Mitigation> {
    risks
        .iter()
        .filter(|risk| risk.severity == Severity::Critical)
        .map(|risk| Mitigation {
            factor: risk.factor.clone(),
            description: risk.description.clone(),
            actions: &MITIGATION_ACTIONS,
        })
        .collect()
}

/// Qualitative status shown next to the health gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub schedule: String,
    pub resources: String,
    pub budget: String,
    pub completion_pct: f64,
    pub executive_summary: String,
}

/// Everything the visualization tab is drawn from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub health_percentage: u8,
    pub status: StatusSummary,
    pub risks: Vec<RiskRecord>,
    pub history: Vec<RiskHistoryPoint>,
    pub milestones: Vec<MilestoneRecord>,
}

impl DashboardData {
    /// Built-in dataset for the visualization tab. It is local, so drawing
    /// charts never touches the network.
    pub fn sample() -> Self {
        let risks = vec![
            RiskRecord::new(Severity::Critical, "Schedule", "Project timeline slipping due to resource constraints", 0.8),
            RiskRecord::new(Severity::High, "Budget", "Increased vendor costs exceeding planned budget", 0.6),
            RiskRecord::new(Severity::Medium, "Resources", "Key team member availability reduced", 0.4),
            RiskRecord::new(Severity::High, "Technical", "Integration issues with legacy systems", 0.7),
            RiskRecord::new(Severity::Medium, "Market", "Competitor launched similar product", 0.5),
            RiskRecord::new(Severity::Critical, "Schedule", "Delayed approvals from stakeholders", 0.9),
            RiskRecord::new(Severity::Low, "Resources", "Minor skill gaps in development team", 0.3),
        ];

        let history = [
            (date!(2025 - 01 - 15), [3, 5, 8, 4]),
            (date!(2025 - 02 - 01), [2, 6, 7, 5]),
            (date!(2025 - 02 - 15), [3, 4, 6, 6]),
            (date!(2025 - 03 - 01), [4, 3, 5, 7]),
            (date!(2025 - 03 - 15), [2, 4, 4, 8]),
            (date!(2025 - 04 - 01), [1, 3, 5, 7]),
        ]
        .into_iter()
        .map(|(date, counts)| RiskHistoryPoint {
            date,
            counts: Severity::ALL
                .iter()
                .zip(counts)
                .map(|(severity, count)| (severity.as_str().to_string(), count))
                .collect(),
        })
        .collect();

        let milestone = |name: &str, planned: Date, actual: Option<Date>, status: MilestoneStatus| MilestoneRecord {
            name: name.to_string(),
            planned_date: planned,
            actual_date: actual,
            status,
        };
        let milestones = vec![
            milestone("Project Kickoff", date!(2025 - 01 - 01), Some(date!(2025 - 01 - 01)), MilestoneStatus::Completed),
            milestone("Requirements Gathering", date!(2025 - 01 - 15), Some(date!(2025 - 01 - 20)), MilestoneStatus::Completed),
            milestone("Design Phase", date!(2025 - 02 - 01), Some(date!(2025 - 02 - 10)), MilestoneStatus::Completed),
            milestone("Development Phase", date!(2025 - 02 - 15), None, MilestoneStatus::InProgress),
            milestone("Testing Phase", date!(2025 - 03 - 15), None, MilestoneStatus::NotStarted),
            milestone("Deployment", date!(2025 - 04 - 15), None, MilestoneStatus::NotStarted),
        ];

        Self {
            health_percentage: 65,
            status: StatusSummary {
                schedule: "Moderately Delayed".to_string(),
                resources: "At Risk".to_string(),
                budget: "Healthy".to_string(),
                completion_pct: 42.5,
                executive_summary: "The project is currently at risk with several critical schedule \
                    delays and resource constraints. Key stakeholders should focus on addressing the \
                    critical risks related to schedule and resources."
                    .to_string(),
            },
            risks,
            history,
            milestones,
        }
    }
}

/// All charts of the visualization tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub health: HealthGauge,
    pub status: StatusSummary,
    pub breakdown: RiskBreakdown,
    pub scatter: RiskScatter,
    pub trend: RiskTrend,
    pub timeline: Timeline,
    /// Raw records for the "Identified Risks" table.
    pub risks: Vec<RiskRecord>,
    pub mitigations: Vec<Mitigation>,
}

impl Dashboard {
    pub fn build(data: &DashboardData) -> Self {
        Self {
            health: build_health_gauge(data.health_percentage),
            status: data.status.clone(),
            breakdown: build_risk_breakdown(&data.risks),
            scatter: build_risk_scatter(&data.risks),
            trend: build_risk_trend(&data.history),
            timeline: build_timeline(&data.milestones),
            risks: data.risks.clone(),
            mitigations: build_mitigations(&data.risks),
        }
    }
}

fn serialize_dates<S: Serializer>(dates: &[Date], serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::{Error as _, SerializeSeq};

    let mut seq = serializer.serialize_seq(Some(dates.len()))?;
    for date in dates {
        seq.serialize_element(&iso_date::format(date).map_err(S::Error::custom)?)?;
    }
    seq.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(factor: &str) -> RiskRecord {
        RiskRecord::new(Severity::Medium, factor, "", 0.5)
    }

    #[test]
    fn breakdown_keeps_first_seen_order() {
        let breakdown = build_risk_breakdown(&[risk("Schedule"), risk("Budget"), risk("Schedule")]);
        assert_eq!(
            breakdown.slices,
            vec![
                PieSlice { label: "Schedule".into(), count: 2 },
                PieSlice { label: "Budget".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn breakdown_of_nothing_is_empty() {
        assert!(build_risk_breakdown(&[]).slices.is_empty());
    }

    #[test]
    fn scatter_defaults_for_unknown_severity() {
        let record: RiskRecord = serde_json::from_str(
            r#"{"severity": "Unknown", "factor": "Vendor", "description": "Late delivery"}"#,
        )
        .unwrap();
        let scatter = build_risk_scatter(&[record]);
        let point = &scatter.points[0];
        assert_eq!(point.x, 0.5);
        assert_eq!(point.y, 0.3);
        assert_eq!(point.color, ChartColor::Green);
        assert_eq!(point.label, "Vendor: Late delivery");
    }

    #[test]
    fn scatter_uses_severity_tables() {
        let scatter = build_risk_scatter(&[
            RiskRecord::new(Severity::Critical, "Schedule", "Slip", 0.8),
            RiskRecord::new(Severity::High, "Budget", "Overrun", 0.6),
        ]);
        assert_eq!((scatter.points[0].y, scatter.points[0].color), (0.9, ChartColor::Red));
        assert_eq!((scatter.points[1].y, scatter.points[1].color), (0.7, ChartColor::Orange));
    }

    #[test]
    fn gauge_bands_are_fixed() {
        let gauge = build_health_gauge(65);
        assert_eq!(gauge.value, 65);
        assert_eq!(gauge.threshold_line, 65);
        assert_eq!(gauge.bands, HEALTH_BANDS);
        assert_eq!(build_health_gauge(140).value, 100);
    }

    #[test]
    fn trend_fills_missing_counts_with_zero() {
        let history: Vec<RiskHistoryPoint> = serde_json::from_str(
            r#"[
                {"date": "2025-01-15", "counts": {"Critical": 3, "High": 5}},
                {"date": "2025-02-01", "counts": {"Low": 2}}
            ]"#,
        )
        .unwrap();
        let trend = build_risk_trend(&history);
        assert_eq!(trend.dates, vec![date!(2025 - 01 - 15), date!(2025 - 02 - 01)]);
        assert_eq!(trend.series(Severity::Critical).unwrap().values, vec![3, 0]);
        assert_eq!(trend.series(Severity::Medium).unwrap().values, vec![0, 0]);
        assert_eq!(trend.series(Severity::Low).unwrap().values, vec![0, 2]);
    }

    #[test]
    fn timeline_falls_back_to_planned_date() {
        let milestone = MilestoneRecord {
            name: "Development Phase".into(),
            planned_date: date!(2025 - 02 - 15),
            actual_date: None,
            status: MilestoneStatus::InProgress,
        };
        let timeline = build_timeline(&[milestone]);
        let bar = &timeline.bars[0];
        assert_eq!(bar.start, date!(2025 - 02 - 15));
        assert_eq!(bar.end, date!(2025 - 02 - 15));
        assert_eq!(bar.color, ChartColor::Blue);
    }

    #[test]
    fn timeline_colors_by_status() {
        let timeline = build_timeline(&DashboardData::sample().milestones);
        let colors: Vec<_> = timeline.bars.iter().map(|bar| bar.color).collect();
        assert_eq!(
            colors,
            vec![
                ChartColor::Green,
                ChartColor::Green,
                ChartColor::Green,
                ChartColor::Blue,
                ChartColor::Gray,
                ChartColor::Gray,
            ]
        );
    }

    #[test]
    fn mitigations_cover_critical_risks_only() {
        let mitigations = build_mitigations(&DashboardData::sample().risks);
        assert_eq!(mitigations.len(), 2);
        assert!(mitigations.iter().all(|m| m.factor == "Schedule"));
        assert_eq!(mitigations[0].actions.len(), 3);
    }

    #[test]
    fn builders_leave_input_untouched() {
        let data = DashboardData::sample();
        let before = data.clone();
        let first = Dashboard::build(&data);
        let second = Dashboard::build(&data);
        assert_eq!(data, before);
        assert_eq!(first, second);
    }

    #[test]
    fn dashboard_serializes_dates_as_iso() {
        let json = serde_json::to_value(Dashboard::build(&DashboardData::sample())).unwrap();
        assert_eq!(json["trend"]["dates"][0], "2025-01-15");
        assert_eq!(json["timeline"]["bars"][3]["end"], "2025-02-15");
        assert_eq!(json["breakdown"]["slices"][0]["label"], "Schedule");
    }
}

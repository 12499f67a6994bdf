//! Fixed-width text tables and one-line analyses for chat delivery.

use super::compass::{is_easterly, CompassPolicy, FourPoint, TwoPoint};
use crate::models::{
    EasterlySummary, ForecastDay, RainForecast, Report, ReportRow, ReportStyle,
};
use std::fmt::Write;

const DAY_FORMAT: &str = "%a %d %b";

/// Morning probability at which the school run counts as wet
pub const WET_MORNING_PERCENT: u8 = 50;

impl ReportStyle {
    pub fn policy(&self) -> &'static dyn CompassPolicy {
        match self {
            ReportStyle::Wind => &FourPoint,
            ReportStyle::Easterly => &TwoPoint,
        }
    }
}

/// Classify every day and tally the east/west split
pub fn build_report(days: &[ForecastDay], style: ReportStyle) -> Report {
    let policy = style.policy();
    let rows: Vec<ReportRow> = days
        .iter()
        .map(|day| ReportRow {
            day: day.clone(),
            heading: policy.classify(day.wind_dir_mean),
            easterly: is_easterly(day.wind_dir_mean),
        })
        .collect();
    let summary = summarize(days);

    Report {
        style,
        rows,
        summary,
    }
}

pub fn summarize(days: &[ForecastDay]) -> EasterlySummary {
    let east = days.iter().filter(|d| is_easterly(d.wind_dir_mean)).count();
    EasterlySummary::new(east, days.len())
}

pub fn build_table(days: &[ForecastDay], style: ReportStyle) -> String {
    render_table(&build_report(days, style))
}

pub fn build_analysis(days: &[ForecastDay]) -> String {
    render_analysis(&summarize(days))
}

fn render_table(report: &Report) -> String {
    let mut out = String::new();
    match report.style {
        ReportStyle::Wind => {
            out.push_str("Date       |  Wind |  Gust | Dir\n");
            out.push_str("-----------+-------+-------+----\n");
            for row in &report.rows {
                let _ = writeln!(
                    out,
                    "{} | {:>5.1} | {:>5.1} | {}",
                    row.day.date.format(DAY_FORMAT),
                    row.day.wind_speed_max,
                    row.day.wind_gust_max,
                    row.heading,
                );
            }
        }
        ReportStyle::Easterly => {
            out.push_str("Date       | Wind | Dir | East\n");
            out.push_str("-----------+------+-----+-----\n");
            for row in &report.rows {
                let marker = if row.easterly { " ✈️" } else { "   " };
                let _ = writeln!(
                    out,
                    "{} | {:>4.0} | {:<3} |{}",
                    row.day.date.format(DAY_FORMAT),
                    row.day.wind_speed_max,
                    row.heading.as_str(),
                    marker,
                );
            }
        }
    }
    out
}

fn render_analysis(summary: &EasterlySummary) -> String {
    format!(
        "Dominant: {} | East: {} days | West: {} days",
        summary.dominant, summary.east_count, summary.west_count
    )
}

fn percent(value: Option<u8>) -> String {
    value.map_or_else(|| "-".to_string(), |p| format!("{}%", p))
}

pub fn build_rain_table(days: &[RainForecast]) -> String {
    let mut out = String::new();
    out.push_str("Date       | Rain |   mm |   AM |   PM\n");
    out.push_str("-----------+------+------+------+-----\n");
    for day in days {
        let marker = if day.wet_morning(WET_MORNING_PERCENT) {
            " ☔"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{} | {:>4} | {:>4.1} | {:>4} | {:>4}{}",
            day.date.format(DAY_FORMAT),
            percent(Some(day.precip_probability_max)),
            day.precip_total_mm,
            percent(day.morning_max()),
            percent(day.afternoon_max()),
            marker,
        );
    }
    out
}

pub fn build_rain_analysis(days: &[RainForecast]) -> String {
    let wet = days
        .iter()
        .filter(|d| d.wet_morning(WET_MORNING_PERCENT))
        .count();

    let wettest = days
        .iter()
        .filter(|d| d.precip_total_mm > 0.0)
        .max_by(|a, b| {
            a.precip_total_mm
                .partial_cmp(&b.precip_total_mm)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map_or_else(
            || "none".to_string(),
            |d| format!("{} ({:.1} mm)", d.date.format(DAY_FORMAT), d.precip_total_mm),
        );

    format!(
        "Wet mornings: {} of {} days | Wettest: {}",
        wet,
        days.len(),
        wettest
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dominant, Heading};
    use chrono::NaiveDate;

    fn day(d: u32, speed: f64, dir: f64) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 10, d).unwrap(),
            wind_speed_max: speed,
            wind_gust_max: speed * 1.8,
            wind_dir_mean: dir,
        }
    }

    fn rain(d: u32, total: f64, morning: Vec<u8>, afternoon: Vec<u8>) -> RainForecast {
        let mut r = RainForecast::new(NaiveDate::from_ymd_opt(2024, 10, d).unwrap(), 60, total);
        r.morning_rain_mm = vec![0.0; morning.len()];
        r.morning_rain_prob = morning;
        r.afternoon_rain_prob = afternoon;
        r
    }

    #[test]
    fn table_has_one_row_per_day() {
        let days = vec![day(14, 12.0, 90.0), day(15, 20.0, 250.0), day(16, 8.0, 10.0)];
        for style in [ReportStyle::Wind, ReportStyle::Easterly] {
            let table = build_table(&days, style);
            assert_eq!(table.lines().count(), days.len() + 2, "{}", style);
        }
    }

    #[test]
    fn empty_table_is_header_only() {
        let table = build_table(&[], ReportStyle::Easterly);
        assert_eq!(table.lines().count(), 2);
        assert!(table.starts_with("Date"));
    }

    #[test]
    fn wind_table_format() {
        let table = build_table(&[day(14, 12.34, 90.0)], ReportStyle::Wind);
        let row = table.lines().nth(2).unwrap();
        assert_eq!(row, "Mon 14 Oct |  12.3 |  22.2 | E");
    }

    #[test]
    fn easterly_table_format() {
        let table = build_table(&[day(14, 12.6, 90.0), day(15, 30.0, 270.0)], ReportStyle::Easterly);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "Mon 14 Oct |   13 | E   | ✈️");
        assert_eq!(lines[3], "Tue 15 Oct |   30 | W   |   ");
    }

    #[test]
    fn styles_use_their_own_policy() {
        // 20° is north on the four-point compass but east on the two-point one
        let days = vec![day(14, 10.0, 20.0)];
        assert_eq!(build_report(&days, ReportStyle::Wind).rows[0].heading, Heading::North);
        assert_eq!(build_report(&days, ReportStyle::Easterly).rows[0].heading, Heading::East);
        assert!(build_report(&days, ReportStyle::Wind).rows[0].easterly);
    }

    #[test]
    fn all_east_dominant() {
        let days = vec![day(14, 10.0, 45.0), day(15, 10.0, 100.0), day(16, 10.0, 170.0)];
        let summary = summarize(&days);
        assert_eq!(summary.dominant, Dominant::East);
        assert_eq!(summary.east_count, 3);
        assert_eq!(summary.west_count, 0);
        assert_eq!(
            build_analysis(&days),
            "Dominant: E ✈️ | East: 3 days | West: 0 days"
        );
    }

    #[test]
    fn empty_analysis_is_mixed() {
        let summary = summarize(&[]);
        assert_eq!(summary.east_count, 0);
        assert_eq!(summary.west_count, 0);
        assert_eq!(summary.dominant, Dominant::Mixed);
        assert_eq!(
            build_analysis(&[]),
            "Dominant: Mixed | East: 0 days | West: 0 days"
        );
    }

    #[test]
    fn direction_changes_listed() {
        let days = vec![
            day(14, 10.0, 250.0),
            day(15, 10.0, 90.0),
            day(16, 10.0, 95.0),
            day(17, 10.0, 260.0),
        ];
        let changes = build_report(&days, ReportStyle::Easterly).direction_changes();
        assert_eq!(
            changes,
            vec![
                NaiveDate::from_ymd_opt(2024, 10, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 10, 17).unwrap(),
            ]
        );
    }

    #[test]
    fn rain_table_rows() {
        let days = vec![rain(14, 3.24, vec![20, 65], vec![10]), rain(15, 0.0, vec![], vec![])];
        let table = build_rain_table(&days);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "Mon 14 Oct |  60% |  3.2 |  65% |  10% ☔");
        assert_eq!(lines[3], "Tue 15 Oct |  60% |  0.0 |    - |    -");
    }

    #[test]
    fn rain_analysis_counts_wet_mornings() {
        let days = vec![
            rain(14, 1.0, vec![55], vec![]),
            rain(15, 6.5, vec![20], vec![80]),
            rain(16, 0.0, vec![50], vec![]),
        ];
        assert_eq!(
            build_rain_analysis(&days),
            "Wet mornings: 2 of 3 days | Wettest: Tue 15 Oct (6.5 mm)"
        );
    }

    #[test]
    fn dry_rain_analysis() {
        assert_eq!(
            build_rain_analysis(&[]),
            "Wet mornings: 0 of 0 days | Wettest: none"
        );
    }
}

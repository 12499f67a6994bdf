//! Converts Open-Meteo's parallel arrays into per-day records.

use crate::error::ValidationError;
use crate::models::{ForecastDay, RainForecast};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;
use std::ops::RangeInclusive;

const DATE_FORMAT: &str = "%Y-%m-%d";
const HOUR_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Drop-off window, local hours
pub const MORNING_HOURS: RangeInclusive<u32> = 6..=10;
/// Pick-up window, local hours
pub const AFTERNOON_HOURS: RangeInclusive<u32> = 15..=18;

/// `daily` block of a wind request; a null value reads as zero
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyWindSeries {
    pub time: Vec<String>,
    #[serde(rename = "windspeed_10m_max")]
    pub wind_speed_max: Vec<Option<f64>>,
    #[serde(rename = "windgusts_10m_max")]
    pub wind_gust_max: Vec<Option<f64>>,
    #[serde(rename = "winddirection_10m_dominant")]
    pub wind_direction: Vec<Option<f64>>,
}

/// `daily` block of a rain request; a null value reads as zero
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyRainSeries {
    pub time: Vec<String>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<u8>>,
}

/// `hourly` block of a rain request; values may be null
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyRainSeries {
    pub time: Vec<String>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<u8>>,
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), ValidationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ValidationError::ShapeMismatch {
            field,
            expected,
            actual,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| ValidationError::DateParse {
        value: value.to_string(),
        source,
    })
}

pub fn normalize_wind(daily: &DailyWindSeries) -> Result<Vec<ForecastDay>, ValidationError> {
    let days = daily.time.len();
    if days == 0 {
        return Err(ValidationError::EmptyData);
    }
    check_len("windspeed_10m_max", days, daily.wind_speed_max.len())?;
    check_len("windgusts_10m_max", days, daily.wind_gust_max.len())?;
    check_len("winddirection_10m_dominant", days, daily.wind_direction.len())?;

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| {
            Ok(ForecastDay {
                date: parse_date(date)?,
                wind_speed_max: daily.wind_speed_max[i].unwrap_or_default(),
                wind_gust_max: daily.wind_gust_max[i].unwrap_or_default(),
                wind_dir_mean: daily.wind_direction[i].unwrap_or_default(),
            })
        })
        .collect()
}

/// A parsed hourly sample
struct HourlySample {
    date: NaiveDate,
    hour: u32,
    probability: u8,
    precipitation: f64,
}

impl HourlySample {
    /// `None` when the timestamp is malformed or a parallel value is missing
    fn parse(hourly: &HourlyRainSeries, index: usize) -> Option<Self> {
        let stamp = NaiveDateTime::parse_from_str(&hourly.time[index], HOUR_FORMAT).ok()?;
        Some(Self {
            date: stamp.date(),
            hour: stamp.hour(),
            probability: (*hourly.precipitation_probability.get(index)?)?,
            precipitation: (*hourly.precipitation.get(index)?)?,
        })
    }

    fn same_day(&self, date: NaiveDate) -> bool {
        self.date.year() == date.year()
            && self.date.month() == date.month()
            && self.date.day() == date.day()
    }
}

pub fn normalize_rain(
    daily: &DailyRainSeries,
    hourly: &HourlyRainSeries,
) -> Result<Vec<RainForecast>, ValidationError> {
    let days = daily.time.len();
    if days == 0 {
        return Err(ValidationError::EmptyData);
    }
    check_len("precipitation_sum", days, daily.precipitation_sum.len())?;
    check_len(
        "precipitation_probability_max",
        days,
        daily.precipitation_probability_max.len(),
    )?;

    let mut out = Vec::with_capacity(days);
    for (i, date) in daily.time.iter().enumerate() {
        let date = parse_date(date)?;
        let mut rain = RainForecast::new(
            date,
            daily.precipitation_probability_max[i].unwrap_or_default(),
            daily.precipitation_sum[i].unwrap_or_default(),
        );

        // days <= 16 and hours <= 384, a full rescan per day is fine
        for j in 0..hourly.time.len() {
            let Some(sample) = HourlySample::parse(hourly, j) else {
                continue;
            };
            if !sample.same_day(date) {
                continue;
            }
            if MORNING_HOURS.contains(&sample.hour) {
                rain.morning_rain_prob.push(sample.probability);
                rain.morning_rain_mm.push(sample.precipitation);
            }
            if AFTERNOON_HOURS.contains(&sample.hour) {
                rain.afternoon_rain_prob.push(sample.probability);
            }
        }

        out.push(rain);
    }

    Ok(out)
}

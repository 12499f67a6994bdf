use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily wind snapshot for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub wind_speed_max: f64, // km/h
    pub wind_gust_max: f64,  // km/h
    pub wind_dir_mean: f64,  // degrees, 0 = North
}

/// Daily rain outlook with the school-run hours broken out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainForecast {
    pub date: NaiveDate,
    pub precip_probability_max: u8,
    pub precip_total_mm: f64,
    /// Hourly probability for 06:00-10:00, ascending hour
    pub morning_rain_prob: Vec<u8>,
    /// Hourly precipitation parallel to `morning_rain_prob`
    pub morning_rain_mm: Vec<f64>,
    /// Hourly probability for 15:00-18:00, ascending hour
    pub afternoon_rain_prob: Vec<u8>,
}

impl RainForecast {
    pub fn new(date: NaiveDate, precip_probability_max: u8, precip_total_mm: f64) -> Self {
        Self {
            date,
            precip_probability_max,
            precip_total_mm,
            morning_rain_prob: Vec::new(),
            morning_rain_mm: Vec::new(),
            afternoon_rain_prob: Vec::new(),
        }
    }

    pub fn morning_max(&self) -> Option<u8> {
        self.morning_rain_prob.iter().copied().max()
    }

    pub fn afternoon_max(&self) -> Option<u8> {
        self.afternoon_rain_prob.iter().copied().max()
    }

    /// Whether the drop-off window looks wet
    pub fn wet_morning(&self, threshold: u8) -> bool {
        self.morning_max().is_some_and(|p| p >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 14).unwrap()
    }

    #[test]
    fn window_maxima() {
        let mut rain = RainForecast::new(day(), 80, 4.2);
        rain.morning_rain_prob = vec![10, 55, 30];
        rain.morning_rain_mm = vec![0.0, 0.4, 0.1];
        rain.afternoon_rain_prob = vec![5];

        assert_eq!(rain.morning_max(), Some(55));
        assert_eq!(rain.afternoon_max(), Some(5));
        assert!(rain.wet_morning(50));
        assert!(!rain.wet_morning(60));
    }

    #[test]
    fn empty_windows() {
        let rain = RainForecast::new(day(), 0, 0.0);
        assert_eq!(rain.morning_max(), None);
        assert_eq!(rain.afternoon_max(), None);
        assert!(!rain.wet_morning(0));
    }
}

use crate::config::WeatherConfig;
use crate::error::{Result, WindWatchError};
use crate::logic::normalize::{
    normalize_rain, normalize_wind, DailyRainSeries, DailyWindSeries, HourlyRainSeries,
};
use crate::logic::{RainForecaster, WindForecaster};
use crate::models::{ForecastDay, Profile, RainForecast};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

const WIND_DAILY: &str = "windspeed_10m_max,windgusts_10m_max,winddirection_10m_dominant";
const RAIN_DAILY: &str = "precipitation_sum,precipitation_probability_max";
const RAIN_HOURLY: &str = "precipitation_probability,precipitation";
const RAIN_TIMEZONE: &str = "Europe/London";

pub struct OpenMeteoClient {
    client: reqwest::Client,
    config: WeatherConfig,
    profile: Profile,
}

#[derive(Debug, Deserialize)]
struct WindResponse {
    #[serde(default)]
    daily: Option<DailyWindSeries>,
}

#[derive(Debug, Deserialize)]
struct RainResponse {
    #[serde(default)]
    daily: Option<DailyRainSeries>,
    #[serde(default)]
    hourly: Option<HourlyRainSeries>,
}

impl OpenMeteoClient {
    pub fn new(config: WeatherConfig, profile: Profile) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            profile,
        }
    }

    fn forecast_url(&self, params: &[(&str, String)]) -> Result<Url> {
        let base = format!("{}/forecast", self.config.base_url.trim_end_matches('/'));
        Url::parse_with_params(&base, params)
            .map_err(|e| WindWatchError::Config(format!("Invalid Open-Meteo URL {}: {}", base, e)))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WindWatchError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WindWatchError::DataSourceUnavailable(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            WindWatchError::DataSourceUnavailable(format!(
                "Failed to parse Open-Meteo response: {}",
                e
            ))
        })
    }

    fn check_days(days: u8) -> Result<()> {
        if days == 0 {
            return Err(WindWatchError::Config(
                "forecast days must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Daily wind maxima and dominant direction for the next `days` days
    pub async fn fetch_wind(&self, days: u8) -> Result<Vec<ForecastDay>> {
        Self::check_days(days)?;
        let url = self.forecast_url(&[
            ("latitude", self.profile.latitude.to_string()),
            ("longitude", self.profile.longitude.to_string()),
            ("daily", WIND_DAILY.to_string()),
            ("forecast_days", days.to_string()),
            ("timezone", "auto".to_string()),
        ])?;

        let response: WindResponse = self.get_json(url).await?;
        let daily = response.daily.ok_or_else(|| {
            WindWatchError::DataSourceUnavailable("Open-Meteo response has no daily block".into())
        })?;

        let days = normalize_wind(&daily)?;
        tracing::debug!("Fetched {} wind forecast days for {}", days.len(), self.profile.location);
        Ok(days)
    }

    /// Daily rain totals plus hourly school-run windows for the next `days` days
    pub async fn fetch_rain(&self, days: u8) -> Result<Vec<RainForecast>> {
        Self::check_days(days)?;
        let url = self.forecast_url(&[
            ("latitude", self.profile.latitude.to_string()),
            ("longitude", self.profile.longitude.to_string()),
            ("daily", RAIN_DAILY.to_string()),
            ("hourly", RAIN_HOURLY.to_string()),
            ("forecast_days", days.to_string()),
            ("timezone", RAIN_TIMEZONE.to_string()),
        ])?;

        let response: RainResponse = self.get_json(url).await?;
        let daily = response.daily.ok_or_else(|| {
            WindWatchError::DataSourceUnavailable("Open-Meteo response has no daily block".into())
        })?;
        let hourly = response.hourly.unwrap_or_default();

        let days = normalize_rain(&daily, &hourly)?;
        tracing::debug!("Fetched {} rain forecast days for {}", days.len(), self.profile.location);
        Ok(days)
    }
}

#[async_trait]
impl WindForecaster for OpenMeteoClient {
    async fn fetch_wind(&self, days: u8) -> Result<Vec<ForecastDay>> {
        OpenMeteoClient::fetch_wind(self, days).await
    }
}

#[async_trait]
impl RainForecaster for OpenMeteoClient {
    async fn fetch_rain(&self, days: u8) -> Result<Vec<RainForecast>> {
        OpenMeteoClient::fetch_rain(self, days).await
    }
}

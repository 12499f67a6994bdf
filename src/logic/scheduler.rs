//! Per-profile forecast cycle and the daily trigger loop.

use super::dispatch::{dispatch, fence, Notifier};
use super::prompt::{build_prompt, PromptKind};
use super::report::{
    build_analysis, build_rain_analysis, build_rain_table, build_report, build_table,
};
use crate::error::{Result, WindWatchError};
use crate::models::{ForecastDay, Profile, ProfileKind, RainForecast, ReportStyle, Schedule};
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait WindForecaster: Send + Sync {
    async fn fetch_wind(&self, days: u8) -> Result<Vec<ForecastDay>>;
}

#[async_trait]
pub trait RainForecaster: Send + Sync {
    async fn fetch_rain(&self, days: u8) -> Result<Vec<RainForecast>>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String>;
}

/// Where a scheduler gets its forecast and how it reports it
#[derive(Clone)]
pub enum ForecastFeed {
    Wind(Arc<dyn WindForecaster>, ReportStyle),
    Rain(Arc<dyn RainForecaster>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Fetching,
    Reporting,
    Summarizing,
    Notifying,
}

impl CycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleState::Idle => "idle",
            CycleState::Fetching => "fetching",
            CycleState::Reporting => "reporting",
            CycleState::Summarizing => "summarizing",
            CycleState::Notifying => "notifying",
        }
    }
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What one cycle produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    pub forecast_days: usize,
    pub summarized: bool,
    pub delivered: usize,
    pub failed: usize,
}

/// Next firing strictly after `now`: today at hh:mm UTC, else tomorrow
pub fn next_trigger(now: DateTime<Utc>, schedule: Schedule) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(schedule.hour, schedule.minute, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date_naive().and_time(time).and_utc();
    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

/// Rendered table and analysis for one cycle
struct Rendered {
    kind: PromptKind,
    forecast_days: usize,
    table: String,
    analysis: String,
}

pub struct Scheduler {
    kind: ProfileKind,
    profile: Profile,
    days: u8,
    schedule: Schedule,
    run_on_start: bool,
    feed: ForecastFeed,
    summarizer: Arc<dyn Summarizer>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Scheduler {
    pub fn builder(kind: ProfileKind) -> SchedulerBuilder {
        SchedulerBuilder::new(kind)
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    fn transition(&self, state: &mut CycleState, next: CycleState) {
        tracing::debug!("[{}] {} -> {}", self.kind, state, next);
        *state = next;
    }

    /// Run cycles on the daily trigger until `cancel` fires.
    ///
    /// Only returns on cancellation, as `Err(WindWatchError::Cancelled)`.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(
            "[{}] Scheduler started for {} ({} days, daily at {})",
            self.kind,
            self.profile.display_name(),
            self.days,
            self.schedule
        );

        if self.run_on_start {
            self.cycle_until_cancelled(&cancel).await?;
        }

        loop {
            let now = Utc::now();
            let next = next_trigger(now, self.schedule);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::info!("[{}] Next check at {}", self.kind, next.format("%Y-%m-%d %H:%M UTC"));

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("[{}] Scheduler stopped", self.kind);
                    return Err(WindWatchError::Cancelled);
                }
                _ = tokio::time::sleep(wait) => {}
            }

            self.cycle_until_cancelled(&cancel).await?;
        }
    }

    async fn cycle_until_cancelled(&self, cancel: &CancellationToken) -> Result<CycleOutcome> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("[{}] Cycle abandoned on shutdown", self.kind);
                Err(WindWatchError::Cancelled)
            }
            outcome = self.run_cycle() => Ok(outcome),
        }
    }

    /// One full fetch, report, summarize and notify pass. Never fails.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let mut state = CycleState::Idle;

        self.transition(&mut state, CycleState::Fetching);
        let rendered = match &self.feed {
            ForecastFeed::Wind(source, style) => {
                let days = source.fetch_wind(self.days).await.unwrap_or_else(|e| {
                    tracing::warn!("[{}] Failed to fetch wind forecast: {}", self.kind, e);
                    Vec::new()
                });

                self.transition(&mut state, CycleState::Reporting);
                tracing::debug!(
                    "[{}] Classifying {} days with the {} compass",
                    self.kind,
                    days.len(),
                    style.policy().name()
                );
                let report = build_report(&days, *style);
                if report.is_empty() {
                    tracing::warn!("[{}] No wind data this cycle, reporting an empty table", self.kind);
                }
                let changes = report.direction_changes();
                if !changes.is_empty() {
                    tracing::debug!("[{}] Easterly flag flips on {:?}", self.kind, changes);
                }
                Rendered {
                    kind: PromptKind::from(*style),
                    forecast_days: days.len(),
                    table: build_table(&days, *style),
                    analysis: build_analysis(&days),
                }
            }
            ForecastFeed::Rain(source) => {
                let days = source.fetch_rain(self.days).await.unwrap_or_else(|e| {
                    tracing::warn!("[{}] Failed to fetch rain forecast: {}", self.kind, e);
                    Vec::new()
                });

                self.transition(&mut state, CycleState::Reporting);
                if days.is_empty() {
                    tracing::warn!("[{}] No rain data this cycle, reporting an empty table", self.kind);
                }
                Rendered {
                    kind: PromptKind::Rain,
                    forecast_days: days.len(),
                    table: build_rain_table(&days),
                    analysis: build_rain_analysis(&days),
                }
            }
        };

        tracing::info!("[{}] Forecast table:\n{}", self.kind, rendered.table);
        tracing::info!("[{}] {}", self.kind, rendered.analysis);

        self.transition(&mut state, CycleState::Summarizing);
        let prompt = build_prompt(
            rendered.kind,
            self.profile.display_name(),
            &rendered.analysis,
            &rendered.table,
        );
        tracing::debug!("[{}] Prompt:\n{}", self.kind, prompt);

        let report_message = format!("{}\n{}", fence(&rendered.table), rendered.analysis);
        let summary = match self.summarizer.summarize(&prompt).await {
            Ok(summary) if !summary.trim().is_empty() => {
                tracing::info!("[{}] Summary:\n{}", self.kind, summary);
                Some(summary)
            }
            Ok(_) => {
                tracing::warn!("[{}] Summarizer returned an empty response, sending table only", self.kind);
                None
            }
            Err(e) => {
                tracing::warn!("[{}] Failed to summarize forecast, sending table only: {}", self.kind, e);
                None
            }
        };

        let mut outcome = CycleOutcome {
            forecast_days: rendered.forecast_days,
            summarized: summary.is_some(),
            ..Default::default()
        };
        let mut messages = vec![report_message];
        messages.extend(summary);

        self.transition(&mut state, CycleState::Notifying);
        match &self.notifier {
            Some(notifier) => {
                let sent = dispatch(notifier.as_ref(), &messages).await;
                tracing::info!(
                    "[{}] Dispatched {} message(s), {} failed",
                    self.kind,
                    sent.delivered,
                    sent.failed
                );
                outcome.delivered = sent.delivered;
                outcome.failed = sent.failed;
            }
            None => tracing::debug!("[{}] No notifier configured, skipping delivery", self.kind),
        }

        self.transition(&mut state, CycleState::Idle);
        outcome
    }
}

pub struct SchedulerBuilder {
    kind: ProfileKind,
    profile: Profile,
    days: u8,
    schedule: Schedule,
    run_on_start: bool,
    feed: Option<ForecastFeed>,
    summarizer: Option<Arc<dyn Summarizer>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl SchedulerBuilder {
    pub fn new(kind: ProfileKind) -> Self {
        Self {
            kind,
            profile: kind.profile(),
            days: kind.default_days(),
            schedule: kind.default_schedule(),
            run_on_start: true,
            feed: None,
            summarizer: None,
            notifier: None,
        }
    }

    pub fn days(mut self, days: u8) -> Self {
        self.days = days;
        self
    }

    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn run_on_start(mut self, run_on_start: bool) -> Self {
        self.run_on_start = run_on_start;
        self
    }

    pub fn feed(mut self, feed: ForecastFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn notifier(mut self, notifier: Option<Arc<dyn Notifier>>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn build(self) -> Result<Scheduler> {
        if !self.schedule.is_valid() {
            return Err(WindWatchError::Config(format!(
                "{} schedule {:02}:{:02} is not a valid time of day",
                self.kind, self.schedule.hour, self.schedule.minute
            )));
        }
        let feed = self.feed.ok_or_else(|| {
            WindWatchError::Config(format!("{} scheduler has no forecast source", self.kind))
        })?;
        let summarizer = self.summarizer.ok_or_else(|| {
            WindWatchError::Config(format!("{} scheduler has no summarizer", self.kind))
        })?;

        Ok(Scheduler {
            kind: self.kind,
            profile: self.profile,
            days: self.days,
            schedule: self.schedule,
            run_on_start: self.run_on_start,
            feed,
            summarizer,
            notifier: self.notifier,
        })
    }
}

use crate::config::Config;
use crate::datasources::{OllamaClient, OpenMeteoClient, TelegramClient};
use crate::error::{Result, WindWatchError};
use crate::logic::scheduler::{CycleOutcome, ForecastFeed, Scheduler};
use crate::logic::{Notifier, Summarizer};
use crate::models::ProfileKind;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Clients and schedulers built once from an immutable config
pub struct App {
    config: Config,
    ollama: Arc<OllamaClient>,
    telegram: Option<Arc<TelegramClient>>,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    pub ollama: bool,
    /// `None` when notifications are not configured
    pub telegram: Option<bool>,
}

impl ConnectionStatus {
    pub fn all_connected(&self) -> bool {
        self.ollama && self.telegram.unwrap_or(true)
    }
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let ollama = Arc::new(OllamaClient::new(config.ollama.clone()));

        let telegram = match config.notifications() {
            Some(telegram) => Some(Arc::new(TelegramClient::new(telegram.clone())?)),
            None => {
                tracing::info!("Telegram token or chat id not set, notifications disabled");
                None
            }
        };

        Ok(Self {
            config,
            ollama,
            telegram,
        })
    }

    pub fn is_enabled(&self, kind: ProfileKind) -> bool {
        match kind {
            ProfileKind::Wind => self.config.wind.enabled,
            ProfileKind::Rain => self.config.rain.enabled,
        }
    }

    /// Build the scheduler for one profile
    pub fn scheduler(&self, kind: ProfileKind) -> Result<Scheduler> {
        let weather = Arc::new(OpenMeteoClient::new(
            self.config.weather.clone(),
            kind.profile(),
        ));

        let builder = Scheduler::builder(kind)
            .summarizer(self.ollama.clone() as Arc<dyn Summarizer>)
            .notifier(self.telegram.clone().map(|t| t as Arc<dyn Notifier>));

        let builder = match kind {
            ProfileKind::Wind => builder
                .feed(ForecastFeed::Wind(weather, self.config.wind.report))
                .days(self.config.wind.days)
                .schedule(self.config.wind.schedule)
                .run_on_start(self.config.wind.run_on_start),
            ProfileKind::Rain => builder
                .feed(ForecastFeed::Rain(weather))
                .days(self.config.rain.days)
                .schedule(self.config.rain.schedule)
                .run_on_start(self.config.rain.run_on_start),
        };

        builder.build()
    }

    /// Run every enabled profile until `cancel` fires
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let mut handles = Vec::new();
        for kind in [ProfileKind::Wind, ProfileKind::Rain] {
            if !self.is_enabled(kind) {
                tracing::info!("{} profile disabled", kind);
                continue;
            }
            let scheduler = self.scheduler(kind)?;
            tracing::info!(
                "Starting {} job, daily at {}",
                scheduler.kind(),
                scheduler.schedule()
            );
            let cancel = cancel.clone();
            handles.push((kind, tokio::spawn(async move { scheduler.run(cancel).await })));
        }

        for (kind, handle) in handles {
            match handle.await {
                Ok(Err(WindWatchError::Cancelled)) | Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("{} scheduler stopped: {}", kind, e),
                Err(e) => tracing::warn!("{} scheduler task failed: {}", kind, e),
            }
        }

        tracing::info!("All schedulers stopped");
        Ok(())
    }

    /// Run one cycle of `kind` immediately, ignoring its schedule
    pub async fn run_once(&self, kind: ProfileKind) -> Result<CycleOutcome> {
        let scheduler = self.scheduler(kind)?;
        Ok(scheduler.run_cycle().await)
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        let mut status = ConnectionStatus {
            ollama: self.ollama.test_connection().await.unwrap_or(false),
            ..Default::default()
        };

        if let Some(ref client) = self.telegram {
            status.telegram = Some(client.test_connection().await.unwrap_or(false));
        }

        status
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ollama_model(&self) -> &str {
        self.ollama.model()
    }
}

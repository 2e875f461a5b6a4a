use crate::composer::{AdvisoryComposer, PromptContext};
use crate::datasources::WeatherSource;
use crate::db::Database;
use crate::error::Result;
use crate::logic::formatter::{format_alerts, format_current, format_forecast};
use crate::logic::RuleTable;
use crate::models::{AlertBatch, WeatherReport};
use crate::transport::{IncomingMessage, MessageTransport, UpdateCursor};
use chrono::{DateTime, Utc};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

const STARTUP_MESSAGE: &str = "The System activating";
const THINKING_MESSAGE: &str = "Thinking...";

/// Result of one scheduled alert run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Sent { events: usize },
    NoAlerts,
    WeatherUnavailable(String),
    DeliveryFailed(String),
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Sent { events } => write!(f, "sent {} advisories", events),
            JobOutcome::NoAlerts => write!(f, "no alerts"),
            JobOutcome::WeatherUnavailable(e) => write!(f, "weather unavailable: {}", e),
            JobOutcome::DeliveryFailed(e) => write!(f, "delivery failed: {}", e),
        }
    }
}

/// Ties the rule table to its I/O collaborators.
///
/// The scheduled alert job and the message handler share one rule table and
/// one detector; only delivery differs.
pub struct AdvisoryBot {
    rules: RuleTable,
    weather: Arc<dyn WeatherSource>,
    transport: Arc<dyn MessageTransport>,
    composer: Option<Arc<dyn AdvisoryComposer>>,
    db: Database,
    chat_id: i64,
    location: String,
    cursor: UpdateCursor,
}

impl AdvisoryBot {
    pub fn new(
        rules: RuleTable,
        weather: Arc<dyn WeatherSource>,
        transport: Arc<dyn MessageTransport>,
        db: Database,
        chat_id: i64,
        location: impl Into<String>,
    ) -> Result<Self> {
        let cursor = db.get_update_cursor()?;
        Ok(Self {
            rules,
            weather,
            transport,
            composer: None,
            db,
            chat_id,
            location: location.into(),
            cursor,
        })
    }

    pub fn with_composer(mut self, composer: Arc<dyn AdvisoryComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn cursor(&self) -> UpdateCursor {
        self.cursor
    }

    /// Run the alert schedule and the inbound poll until Ctrl-C.
    pub async fn run(&mut self, alert_every: Duration, poll_every: Duration) -> Result<()> {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_until(alert_every, poll_every, ctrl_c).await
    }

    /// Run until `shutdown` resolves.
    ///
    /// The first alert tick fires immediately, so conditions are checked on startup.
    /// `shutdown` is polled across iterations, so a signal that lands while a job
    /// is running stops the loop as soon as that job returns.
    pub async fn run_until<F>(
        &mut self,
        alert_every: Duration,
        poll_every: Duration,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.deliver(self.chat_id, STARTUP_MESSAGE).await;

        let mut alert_tick = tokio::time::interval(alert_every);
        alert_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut poll_tick = tokio::time::interval(poll_every);
        poll_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            alert_every_secs = alert_every.as_secs(),
            poll_every_secs = poll_every.as_secs(),
            cursor = self.cursor().0,
            "Listening for messages and scheduled alerts"
        );

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                _ = alert_tick.tick() => {
                    let outcome = self.run_alert_job().await;
                    tracing::debug!(%outcome, "Alert job finished");
                }
                _ = poll_tick.tick() => {
                    self.poll_once().await;
                }
            }
        }

        Ok(())
    }

    pub async fn run_alert_job(&self) -> JobOutcome {
        self.run_alert_job_at(Utc::now()).await
    }

    pub async fn run_alert_job_at(&self, now: DateTime<Utc>) -> JobOutcome {
        tracing::info!("Starting scheduled weather alerts");

        let (report, index) = match self.fetch_current(now).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Scheduled alert skipped: {}", e);
                return JobOutcome::WeatherUnavailable(e.to_string());
            }
        };

        let sample = match report.sample_at(index) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Scheduled alert skipped: {}", e);
                return JobOutcome::WeatherUnavailable(e.to_string());
            }
        };

        let timestamp = timestamp_label(&report, now);
        let events = self.rules.evaluate(&timestamp, &sample);

        let Some(message) = format_alerts(&sample, &events) else {
            tracing::info!("Weather conditions are normal. No alerts need to be sent");
            return JobOutcome::NoAlerts;
        };

        if let Err(e) = self.transport.send(self.chat_id, &message).await {
            tracing::warn!("Failed to deliver scheduled alert via {}: {}", self.transport.name(), e);
            return JobOutcome::DeliveryFailed(e.to_string());
        }

        let count = events.len();
        if let Err(e) = self.db.record_alert_batch(&AlertBatch::new(sample, events)) {
            tracing::warn!("Failed to record alert history: {}", e);
        }

        tracing::info!(events = count, "Scheduled weather alert sent");
        JobOutcome::Sent { events: count }
    }

    /// Poll once for new messages and answer each.
    ///
    /// Transport errors are logged and leave the cursor where it was.
    pub async fn poll_once(&mut self) -> usize {
        let (messages, next) = match self.transport.poll(self.cursor).await {
            Ok(polled) => polled,
            Err(e) => {
                tracing::warn!("Polling {} failed: {}", self.transport.name(), e);
                return 0;
            }
        };

        if next != self.cursor {
            self.cursor = next;
            if let Err(e) = self.db.set_update_cursor(next) {
                tracing::warn!("Failed to persist update cursor: {}", e);
            }
        }

        let mut answered = 0;
        for message in &messages {
            if message.chat_id != self.chat_id {
                tracing::warn!(
                    chat_id = message.chat_id,
                    "Ignoring message from unconfigured chat"
                );
                continue;
            }
            self.handle_message(message).await;
            answered += 1;
        }
        answered
    }

    pub async fn handle_message(&self, message: &IncomingMessage) -> String {
        self.handle_message_at(message, Utc::now()).await
    }

    /// Answer one question; returns the reply that was sent
    pub async fn handle_message_at(&self, message: &IncomingMessage, now: DateTime<Utc>) -> String {
        let started = Instant::now();
        tracing::info!(update_id = message.update_id, text = %message.text, "Received message");

        let context = self.prompt_context(now).await;

        let reply = match &self.composer {
            Some(composer) => {
                self.deliver(message.chat_id, THINKING_MESSAGE).await;
                let answer = match composer.compose(&message.text, &context).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("{} failed: {}", composer.name(), e);
                        format!("{} is busy: {}", composer.name(), e)
                    }
                };
                format!(" {}:\n{}", composer.name(), answer)
            }
            None => plain_answer(&context),
        };

        self.deliver(message.chat_id, &reply).await;

        tracing::info!(
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Total response time"
        );
        reply
    }

    /// Current conditions, outlook and matches for a user question
    pub async fn prompt_context(&self, now: DateTime<Utc>) -> PromptContext {
        let (report, index) = match self.fetch_current(now).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Weather unavailable for reply: {}", e);
                return PromptContext::unavailable(self.location.clone(), e.to_string());
            }
        };

        let outlook = report.outlook(index);
        let current = match report.sample_at(index) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!("Current conditions unavailable: {}", e);
                None
            }
        };

        let timestamp = timestamp_label(&report, now);
        let events = current
            .map(|s| self.rules.evaluate(&timestamp, &s))
            .unwrap_or_default();

        PromptContext {
            location: self.location.clone(),
            current,
            outlook,
            events,
        }
    }

    async fn fetch_current(&self, now: DateTime<Utc>) -> Result<(WeatherReport, usize)> {
        let report = self.weather.fetch().await?;
        let index = report.current_slot(now)?;
        Ok((report, index))
    }

    /// Send and swallow failures; delivery problems never reach the caller
    async fn deliver(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.transport.send(chat_id, text).await {
            tracing::warn!("Failed to send via {}: {}", self.transport.name(), e);
        }
    }
}

/// Reply used when no language model is configured
pub fn plain_answer(ctx: &PromptContext) -> String {
    match ctx.current {
        Some(sample) if !ctx.events.is_empty() => {
            format_alerts(&sample, &ctx.events).unwrap_or_default()
        }
        _ => format!(
            "{}\n{}",
            format_current(ctx.current.as_ref()),
            format_forecast(&ctx.outlook)
        ),
    }
}

fn timestamp_label(report: &WeatherReport, now: DateTime<Utc>) -> String {
    report.local_time(now).format("%Y-%m-%d %H:%M").to_string()
}

//! Periodic scan for tasks that are due soon.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use duely_storage::{Store, TaskId, TaskView};

use crate::config::Config;
use crate::notifier::Notifier;

/// Where the scheduler reads due tasks from and records dispatched reminders
#[async_trait]
pub trait ReminderSource: Send + Sync {
    /// Open tasks with `from <= due_at <= until`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried
    async fn due_tasks(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        include_reminded: bool,
    ) -> Result<Vec<TaskView>>;

    /// Remember that a reminder went out for `id`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be updated
    async fn mark_reminded(&self, id: TaskId) -> Result<()>;
}

#[async_trait]
impl ReminderSource for Store {
    async fn due_tasks(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        include_reminded: bool,
    ) -> Result<Vec<TaskView>> {
        let tasks = self
            .run(move |db| db.due_tasks(from, until, include_reminded))
            .await?;
        Ok(tasks)
    }

    async fn mark_reminded(&self, id: TaskId) -> Result<()> {
        self.run(move |db| db.mark_reminder_sent(id)).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    pub interval: Duration,
    pub window: chrono::Duration,
    /// Re-notify every scan while a task stays in the window
    pub repeat: bool,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            window: chrono::Duration::hours(1),
            repeat: false,
        }
    }
}

impl From<&Config> for ReminderSettings {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.reminder_interval,
            window: config.reminder_window,
            repeat: config.reminder_repeat,
        }
    }
}

/// Outcome of one scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub matched: usize,
    pub dispatched: usize,
    pub failed: usize,
}

pub struct ReminderScheduler {
    source: Arc<dyn ReminderSource>,
    notifier: Arc<dyn Notifier>,
    settings: ReminderSettings,
}

impl ReminderScheduler {
    pub fn new(
        source: Arc<dyn ReminderSource>,
        notifier: Arc<dyn Notifier>,
        settings: ReminderSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            settings,
        }
    }

    /// Scan using the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns an error if the due tasks cannot be queried
    pub async fn scan(&self) -> Result<ScanReport> {
        self.scan_at(Utc::now()).await
    }

    /// Dispatch a reminder for every open task due in `[now, now + window]`.
    ///
    /// A failed dispatch is counted and logged; the remaining tasks are still
    /// notified and the failed one stays eligible for the next scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the due tasks cannot be queried
    pub async fn scan_at(&self, now: DateTime<Utc>) -> Result<ScanReport> {
        let until = now
            .checked_add_signed(self.settings.window)
            .with_context(|| {
                format!(
                    "Reminder window of {} minutes overflows the clock at {now}",
                    self.settings.window.num_minutes()
                )
            })?;
        let tasks = self
            .source
            .due_tasks(now, until, self.settings.repeat)
            .await
            .context("Failed to query due tasks")?;

        let mut report = ScanReport {
            matched: tasks.len(),
            ..ScanReport::default()
        };

        for task in &tasks {
            let id = task.task.id;
            if let Err(e) = self.notifier.notify(task).await {
                report.failed += 1;
                log::warn!(
                    "Failed to send reminder for task {id} via {}: {e:#}",
                    self.notifier.name()
                );
                continue;
            }
            report.dispatched += 1;

            if !self.settings.repeat {
                if let Err(e) = self.source.mark_reminded(id).await {
                    log::warn!("Failed to record reminder for task {id}: {e:#}");
                }
            }
        }

        Ok(report)
    }

    /// Scan every `interval` until `cancel` fires.
    ///
    /// The first scan happens one interval after start. Scan errors are
    /// logged and never end the loop.
    pub async fn run(&self, cancel: CancellationToken) {
        let period = self.settings.interval;
        let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Reminder scheduler started (every {}s, window {} min, notifier: {})",
            period.as_secs(),
            self.settings.window.num_minutes(),
            self.notifier.name()
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.tick().await,
            }
        }

        log::info!("Reminder scheduler stopped");
    }

    /// Run the loop on its own tokio task.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    async fn tick(&self) {
        match self.scan().await {
            Ok(report) if report.matched == 0 => log::debug!("Reminder scan found no due tasks"),
            Ok(report) => log::info!(
                "Reminder scan: {} due, {} sent, {} failed",
                report.matched,
                report.dispatched,
                report.failed
            ),
            Err(e) => log::error!("Reminder scan failed: {e:#}"),
        }
    }
}

use anyhow::Result;
use async_trait::async_trait;
use duely_storage::TaskView;

/// Delivery channel for task reminders
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one reminder for `task`
    ///
    /// # Errors
    ///
    /// Returns an error if the reminder could not be delivered
    async fn notify(&self, task: &TaskView) -> Result<()>;

    /// Get the channel name
    #[must_use]
    fn name(&self) -> &'static str;
}

/// Writes each reminder to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, task: &TaskView) -> Result<()> {
        log::info!(
            "Reminder: task {} \"{}\" is due at {} (category: {}, priority: {})",
            task.task.id,
            task.task.title,
            task.task.due_at.format("%Y-%m-%d %H:%M:%S UTC"),
            task.category.as_deref().unwrap_or("-"),
            task.priority.as_deref().unwrap_or("-"),
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use duely_storage::Task;

    #[tokio::test]
    async fn test_log_notifier_accepts_any_task() {
        let view = TaskView {
            task: Task {
                id: 1,
                title: "Stand-up".to_string(),
                description: None,
                due_at: Utc::now(),
                is_done: false,
                category_id: None,
                priority_id: None,
                reminder_sent: false,
            },
            category: None,
            priority: None,
        };

        assert!(LogNotifier.notify(&view).await.is_ok());
        assert_eq!(LogNotifier.name(), "log");
    }
}

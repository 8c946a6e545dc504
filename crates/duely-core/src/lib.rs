pub mod config;
pub mod notifier;
pub mod scheduler;

pub use config::Config;
pub use notifier::{LogNotifier, Notifier};
pub use scheduler::{ReminderScheduler, ReminderSettings, ReminderSource, ScanReport};

pub mod db;
pub mod error;
pub mod migrations;
pub mod models;
pub mod seed;
pub mod store;

pub use db::Database;
pub use error::{Result, StorageError};
pub use models::{
    Category, CategoryId, CategoryUpdate, NewCategory, NewPriority, NewTask, Priority, PriorityId,
    PriorityUpdate, Task, TaskId, TaskUpdate, TaskView,
};
pub use seed::{seed_defaults, SeedReport, DEFAULT_CATEGORIES, DEFAULT_PRIORITIES};
pub use store::Store;

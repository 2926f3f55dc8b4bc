//! In-memory task tracking: create, complete, remove, filter, search and
//! export to-do items.

pub mod clock;
pub mod commands;
pub mod error;
pub mod manager;
pub mod models;
pub mod storage;
pub mod tui;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, TaskError};
pub use manager::{TaskCount, TaskManager};
pub use models::{NewTask, Priority, Task, TaskRecord};
pub use storage::ExportDocument;

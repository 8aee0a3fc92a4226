pub mod config;
pub mod error;
pub mod migration;
pub mod operations;
pub mod planner;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{PlannerError, Result};
pub use store::TaskStore;
pub use task::Task;

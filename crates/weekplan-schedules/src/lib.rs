pub mod db;
pub mod error;
pub mod manager;
pub mod types;

pub use error::ScheduleError;
pub use manager::ScheduleManager;
pub use types::{Schedule, WeekSchedules};

mod repository;
mod types;


pub use repository::DailyTargetRepository;
pub use types::{DailyTarget, DEFAULT_DAILY_TARGET};

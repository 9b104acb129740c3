mod repository;
mod types;


pub use repository::LapEntryRepository;
pub use types::{DailyLapTotal, LapEntry};

mod compute;
mod types;


pub use compute::{completion_rate, current_streak, longest_streak, progress_percent};
pub use types::StreakData;

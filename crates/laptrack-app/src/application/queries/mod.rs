mod streaks;

pub use streaks::StreakOverview;

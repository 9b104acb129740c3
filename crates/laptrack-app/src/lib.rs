// Application layer - composes the domain ports into display-ready sessions

pub mod application;
pub mod bootstrap;

pub use application::queries::StreakOverview;
pub use application::services::{
    LapRecordsService, MutationOutcome, ProgressTracker, TargetService,
};
pub use bootstrap::App;

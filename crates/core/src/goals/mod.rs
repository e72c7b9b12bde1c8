//! Savings goals: income allocation, progress tracking and manual contributions.

pub mod engine;
pub mod progress;
pub mod types;


pub use engine::AllocationEngine;
pub use progress::{contribute, progress};
pub use types::{
    Allocation, AllocationResult, Goal, GoalContribution, GoalProgress, IncomeApplication,
    ManualContribution, Milestone,
};

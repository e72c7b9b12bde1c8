//! Common types used across the application.

pub mod calendar;
pub mod id;
pub mod money;

pub use calendar::MonthKey;
pub use id::*;
pub use money::Money;

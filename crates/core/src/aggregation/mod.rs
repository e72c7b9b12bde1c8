//! Monthly time series, chart data and category breakdowns.

pub mod service;
pub mod types;


pub use service::TimeSeriesAggregator;
pub use types::{AggregatedBucket, CategoryTotal, ChartSeries};

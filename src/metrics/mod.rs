// Metric engine: summary statistics, population comparisons, contact typing.

pub mod classify;
pub mod comparison;
pub mod summary;

mod aggregate;
mod day_grouped;
mod partition;

pub use aggregate::{Aggregator, OutputWeek};
pub use day_grouped::DayGroupedWeek;
pub use partition::{partition_by_week, WeekKey};

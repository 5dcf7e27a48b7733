pub mod frame;
pub mod observation;
pub mod series;
pub mod station;
pub mod time_range;
pub mod variable;

pub use frame::{Column, ColumnData, ObservationFrame};
pub use observation::{AccumulationWindow, ObservationRecord};
pub use series::{DisaggregatedRecord, DisaggregatedSeries, StationSeries};
pub use station::{StationIds, StationMetadata};
pub use time_range::{parse_range_timestamp, TimeRange};
pub use variable::{ValueKind, Variable};

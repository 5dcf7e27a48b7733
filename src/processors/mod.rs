pub mod parallel_processor;
pub mod precip_disaggregator;
pub mod report;
pub mod series_builder;
pub mod variable_projector;

pub use parallel_processor::ParallelProcessor;
pub use precip_disaggregator::PrecipDisaggregator;
pub use report::{ProcessingReport, StationOutcome, StationStatistics};
pub use series_builder::SeriesBuilder;
pub use variable_projector::{expand_request, VariableProjector};

pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{archive_file_name, decoded_file_name, source_file_names};
pub use progress::ProgressReporter;

pub mod isd_lite_reader;
pub mod station_reader;
pub mod station_registry;

pub use isd_lite_reader::{decode_line, IsdLiteIterator, IsdLiteReader, IN_MEMORY_SOURCE};
pub use station_reader::StationReader;
pub use station_registry::{StationLookup, StationRegistry};

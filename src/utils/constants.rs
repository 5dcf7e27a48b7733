/// ISD-Lite column widths: year, month, day, hour, then the eight observation fields
pub const ISD_LITE_WIDTHS: [usize; 12] = [5, 3, 3, 3, 6, 6, 6, 6, 6, 6, 6, 6];

/// Encoded value meaning "no observation"
pub const MISSING_SENTINEL: i32 = -9999;

/// Fixed-point scale applied to temperature, pressure, wind speed and precipitation
pub const SCALE_FACTOR: f64 = 10.0;

/// isd-history.txt column widths
pub const ISD_HISTORY_WIDTHS: [usize; 11] = [7, 6, 30, 5, 3, 5, 8, 9, 8, 9, 9];

/// File names and extensions
pub const STATION_HISTORY_FILE: &str = "isd-history.txt";
pub const DEFAULT_CONFIG_FILE: &str = "isd-lite.toml";
pub const ARCHIVE_EXTENSION: &str = "gz";
pub const DECODED_EXTENSION: &str = "isd";

/// Time range format used on the command line (e.g. 20200101_00)
pub const RANGE_DATE_FORMAT: &str = "%Y%m%d_%H";

/// Timestamp format for CSV output
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accumulation windows recognised in the six-hour field, in rows
pub const THREE_HOUR_WINDOW: usize = 3;
pub const SIX_HOUR_WINDOW: usize = 6;
pub const TWELVE_HOUR_WINDOW: usize = 12;

/// Largest backward counter value still resolved without looking ahead
pub const LOOKBACK_HORIZON: usize = 11;

/// Identity columns always present in projected output
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const STATION_CODE_COLUMN: &str = "station_code";

/// Generic variable request that expands to every precipitation column
pub const PRECIP_REQUEST: &str = "Precip";

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

pub const SUPPORTED_COMPRESSIONS: [&str; 5] = [
    COMPRESSION_SNAPPY,
    COMPRESSION_GZIP,
    COMPRESSION_LZ4,
    COMPRESSION_ZSTD,
    COMPRESSION_NONE,
];

use crate::error::{ProcessingError, Result};
use crate::models::ObservationRecord;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, ISD_LITE_WIDTHS, MISSING_SENTINEL, SCALE_FACTOR};
use chrono::NaiveDate;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Source label used for lines that did not come from a file
pub const IN_MEMORY_SOURCE: &str = "<memory>";

const FIELD_NAMES: [&str; 12] = [
    "year",
    "month",
    "day",
    "hour",
    "air temperature",
    "dew point temperature",
    "sea level pressure",
    "wind direction",
    "wind speed rate",
    "sky condition code",
    "one hour precipitation",
    "six hour precipitation",
];

/// Decoder for ISD-Lite fixed-width hourly observation files.
///
/// Every non-blank line must decode; a malformed line fails the whole file
/// because downstream window inference depends on exact row positions.
pub struct IsdLiteReader {
    use_mmap: bool,
}

impl IsdLiteReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read all observations from a decompressed `.isd` file, in file order
    pub fn read_file(&self, path: &Path) -> Result<Vec<ObservationRecord>> {
        let records = if self.use_mmap {
            self.read_file_mmap(path)?
        } else {
            self.stream_records(path)?.collect::<Result<Vec<_>>>()?
        };

        debug!(
            file = %path.display(),
            records = records.len(),
            "Decoded ISD-Lite file"
        );
        Ok(records)
    }

    fn read_file_mmap(&self, path: &Path) -> Result<Vec<ObservationRecord>> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let content = std::str::from_utf8(&mmap)
            .map_err(|e| ProcessingError::InvalidFormat(format!("Invalid UTF-8: {}", e)))?;

        self.decode_str(content, path)
    }

    /// Decode an in-memory block of lines attributed to `source`
    pub fn decode_str(&self, content: &str, source: &Path) -> Result<Vec<ObservationRecord>> {
        self.decode_lines(content.lines(), source)
    }

    /// Decode lines in order. Blank lines carry no observation and are skipped.
    pub fn decode_lines<'a, I>(&self, lines: I, source: &Path) -> Result<Vec<ObservationRecord>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut records = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            if line.trim().is_empty() {
                trace!(line = index + 1, "Skipping blank line");
                continue;
            }

            let record = decode_line(line)
                .map_err(|message| ProcessingError::decode(source, index + 1, message))?;
            records.push(record);
        }

        Ok(records)
    }

    /// Stream observations from a file without holding the whole file in memory
    pub fn stream_records(&self, path: &Path) -> Result<IsdLiteIterator> {
        IsdLiteIterator::new(path)
    }
}

impl Default for IsdLiteReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a single ISD-Lite line. The error is a human-readable description
/// without file context.
pub fn decode_line(line: &str) -> std::result::Result<ObservationRecord, String> {
    let raw = split_fields(line)?;

    let year = raw[0];
    let month = to_u32(raw[1], FIELD_NAMES[1])?;
    let day = to_u32(raw[2], FIELD_NAMES[2])?;
    let hour = to_u32(raw[3], FIELD_NAMES[3])?;

    let timestamp = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| {
            format!(
                "Invalid timestamp: year={} month={} day={} hour={}",
                year, month, day, hour
            )
        })?;

    Ok(ObservationRecord {
        timestamp,
        air_temperature: scaled(raw[4]),
        dew_point_temperature: scaled(raw[5]),
        sea_level_pressure: scaled(raw[6]),
        wind_direction: unscaled(raw[7]),
        wind_speed_rate: scaled(raw[8]),
        sky_condition_code: unscaled(raw[9]),
        one_hour_precip: scaled(raw[10]),
        six_hour_precip: scaled(raw[11]),
    })
}

/// Cut a line at the fixed column offsets and parse every field as an integer.
///
/// The final column may be one character short, since real files end the line
/// at 61 characters. Anything shorter has lost digits and is an error.
fn split_fields(line: &str) -> std::result::Result<[i32; 12], String> {
    if !line.is_ascii() {
        return Err("Line contains non-ASCII characters".to_string());
    }

    let line = line.trim_end();
    let total_width: usize = ISD_LITE_WIDTHS.iter().sum();
    if line.len() < total_width - 1 {
        return Err(format!(
            "Line too short: expected at least {} characters, got {}",
            total_width - 1,
            line.len()
        ));
    }
    if line.len() > total_width {
        return Err(format!(
            "Line too long: expected at most {} characters, got {}",
            total_width,
            line.len()
        ));
    }

    let mut values = [0i32; 12];
    let mut start = 0;

    for (i, width) in ISD_LITE_WIDTHS.iter().enumerate() {
        let end = (start + width).min(line.len());
        let text = line[start..end].trim();
        values[i] = text.parse::<i32>().map_err(|_| {
            format!("Invalid integer in column '{}': '{}'", FIELD_NAMES[i], text)
        })?;
        start += width;
    }

    Ok(values)
}

fn to_u32(value: i32, name: &str) -> std::result::Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("Invalid value in column '{}': {}", name, value))
}

/// Sentinel check happens before scaling so a scaled sentinel is never produced
fn scaled(raw: i32) -> Option<f64> {
    if raw == MISSING_SENTINEL {
        None
    } else {
        Some(f64::from(raw) / SCALE_FACTOR)
    }
}

fn unscaled(raw: i32) -> Option<i32> {
    if raw == MISSING_SENTINEL {
        None
    } else {
        Some(raw)
    }
}

/// Iterator for streaming observations from an ISD-Lite file
pub struct IsdLiteIterator {
    reader: BufReader<File>,
    path: PathBuf,
    line_count: usize,
}

impl IsdLiteIterator {
    fn new(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);

        Ok(Self {
            reader,
            path: path.to_path_buf(),
            line_count: 0,
        })
    }
}

impl Iterator for IsdLiteIterator {
    type Item = Result<ObservationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            line.clear();

            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) => {
                    self.line_count += 1;

                    if line.trim().is_empty() {
                        continue;
                    }

                    return Some(decode_line(&line).map_err(|message| {
                        ProcessingError::decode(&self.path, self.line_count, message)
                    }));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // Real ISD-Lite layout: 61 characters, last column ends at the line end
    const LINE: &str = "2020 01 01 00    50   -11 10259   330    31     4 -9999    13";

    fn memory() -> PathBuf {
        PathBuf::from(IN_MEMORY_SOURCE)
    }

    #[test]
    fn test_decode_line() {
        let record = decode_line(LINE).unwrap();

        assert_eq!(
            record.timestamp.format("%Y-%m-%d %H").to_string(),
            "2020-01-01 00"
        );
        assert_eq!(record.air_temperature, Some(5.0));
        assert_eq!(record.dew_point_temperature, Some(-1.1));
        assert_eq!(record.sea_level_pressure, Some(1025.9));
        assert_eq!(record.wind_direction, Some(330));
        assert_eq!(record.wind_speed_rate, Some(3.1));
        assert_eq!(record.sky_condition_code, Some(4));
        assert_eq!(record.one_hour_precip, None);
        assert_eq!(record.six_hour_precip, Some(1.3));
    }

    #[test]
    fn test_sentinel_is_missing_in_every_column() {
        let line = "1999 12 31 23 -9999 -9999 -9999 -9999 -9999 -9999 -9999 -9999";
        let record = decode_line(line).unwrap();

        assert_eq!(record, ObservationRecord::empty(record.timestamp));
    }

    #[test]
    fn test_scaling_divides_by_ten_exactly() {
        for raw in [-9998, -78, -1, 0, 1, 7, 125, 10259, 99999] {
            assert_eq!(scaled(raw), Some(f64::from(raw) / 10.0));
        }
        assert_eq!(scaled(MISSING_SENTINEL), None);
        assert_eq!(unscaled(MISSING_SENTINEL), None);
        assert_eq!(unscaled(270), Some(270));
    }

    #[test]
    fn test_trailing_whitespace_is_accepted() {
        let line = format!("{} ", LINE);
        assert!(decode_line(&line).is_ok());
    }

    #[test]
    fn test_rejects_non_numeric_field() {
        let line = "2020 01 01 00    5x   -11 10259   330    31     4 -9999    13";
        let err = decode_line(line).unwrap_err();
        assert!(err.contains("air temperature"), "{}", err);
    }

    #[test]
    fn test_rejects_short_and_long_lines() {
        assert!(decode_line("2020 01 01 00    50   -11").is_err());

        // Right-aligned values lose their low digits when the line is cut
        for cut in 1..=4 {
            let truncated = &LINE[..LINE.len() - cut];
            assert!(
                decode_line(truncated).unwrap_err().contains("too short"),
                "{} characters",
                truncated.len()
            );
        }

        let long = format!("{}  12345", LINE);
        assert!(decode_line(&long).unwrap_err().contains("too long"));
    }

    #[test]
    fn test_rejects_impossible_timestamp() {
        let line = "2021 02 30 00    50   -11 10259   330    31     4 -9999    13";
        assert!(decode_line(line).unwrap_err().contains("Invalid timestamp"));
    }

    #[test]
    fn test_decode_lines_reports_line_number() {
        let reader = IsdLiteReader::new();
        let content = format!("{}\n{}\nnot a record\n", LINE, LINE);

        match reader.decode_str(&content, Path::new("723060-13722-2020.isd")) {
            Err(ProcessingError::Decode { file, line, .. }) => {
                assert_eq!(file, PathBuf::from("723060-13722-2020.isd"));
                assert_eq!(line, 3);
            }
            other => panic!("Expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_preserves_order_and_skips_blank_lines() {
        let reader = IsdLiteReader::new();
        let later = "2020 01 01 05    50   -11 10259   330    31     4 -9999 -9999";
        let content = format!("{}\n\n{}\n", later, LINE);

        let records = reader.decode_str(&content, &memory()).unwrap();
        assert_eq!(records.len(), 2);
        // Input order is kept even though it is not chronological
        assert!(records[0].timestamp > records[1].timestamp);
    }

    #[test]
    fn test_decode_empty_input() {
        let reader = IsdLiteReader::new();
        assert!(reader.decode_str("", &memory()).unwrap().is_empty());
        assert!(reader
            .decode_lines(std::iter::empty(), &memory())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_read_file_buffered_and_mmap() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", LINE)?;
        writeln!(
            temp_file,
            "2020 01 01 01    44   -17 10262   340    36 -9999     0 -9999"
        )?;

        let buffered = IsdLiteReader::new().read_file(temp_file.path())?;
        let mapped = IsdLiteReader::with_mmap(true).read_file(temp_file.path())?;

        assert_eq!(buffered.len(), 2);
        assert_eq!(buffered, mapped);
        assert_eq!(buffered[1].one_hour_precip, Some(0.0));
        assert_eq!(buffered[1].sky_condition_code, None);

        Ok(())
    }

    #[test]
    fn test_stream_reports_file_and_line() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", LINE)?;
        writeln!(temp_file, "garbage")?;

        let results: Vec<_> = IsdLiteReader::new()
            .stream_records(temp_file.path())?
            .collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(ProcessingError::Decode { file, line, .. }) => {
                assert_eq!(file, temp_file.path());
                assert_eq!(*line, 2);
            }
            other => panic!("Expected decode error, got {:?}", other),
        }

        Ok(())
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use isd_lite_processor::config::ProcessorConfig;
use isd_lite_processor::error::ProcessingError;
use isd_lite_processor::models::{AccumulationWindow, StationIds, StationSeries, TimeRange, Variable};
use isd_lite_processor::processors::{
    ParallelProcessor, PrecipDisaggregator, SeriesBuilder, StationOutcome, VariableProjector,
};
use isd_lite_processor::readers::{IsdLiteReader, StationRegistry};
use isd_lite_processor::utils::filename::source_file_names;
use isd_lite_processor::writers::{write_frame, ParquetWriter};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn isd_line(ts: NaiveDateTime, six_hour: i32) -> String {
    format!(
        "{} {:5} {:5} {:5} {:5} {:5} {:5} {:5} {:5}",
        ts.format("%Y %m %d %H"),
        50,
        -11,
        10259,
        330,
        31,
        4,
        -9999,
        six_hour
    )
}

/// Hourly file starting at `start`, with a six-hour-field value at each
/// listed row offset
fn write_isd(dir: &Path, name: &str, start: NaiveDateTime, rows: usize, markers: &[usize]) {
    let lines: Vec<String> = (0..rows)
        .map(|i| {
            let ts = start + chrono::Duration::hours(i as i64);
            let value = if markers.contains(&i) { 25 } else { -9999 };
            isd_line(ts, value)
        })
        .collect();
    fs::write(dir.join(name), lines.join("\n") + "\n").unwrap();
}

fn jan_first(year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn lookup() -> HashMap<String, StationIds> {
    let mut map = HashMap::new();
    map.insert("KRDU".to_string(), StationIds::new("723060", "13722"));
    map.insert("KDCA".to_string(), StationIds::new("724050", "13743"));
    map
}

#[test]
fn test_end_to_end_mixed_windows() {
    let dir = TempDir::new().unwrap();
    write_isd(dir.path(), "723060-13722-2020.isd", jan_first(2020), 40, &[0, 3, 9, 21]);

    let range = TimeRange::new(jan_first(2020), jan_first(2021)).unwrap();
    let projector = VariableProjector::new(&["Precip"]);
    let (frame, report) = ParallelProcessor::new(1, dir.path())
        .process_stations(&lookup(), &["KRDU"], &projector, &range, None)
        .unwrap();

    assert_eq!(frame.len(), 40);
    let column = |v: Variable| frame.column(v).unwrap();
    let present = |v: Variable| -> Vec<usize> {
        (0..frame.len())
            .filter(|&row| !column(v).data.is_missing(row))
            .collect()
    };

    // Row 0 looks forward 3 rows, row 3 looks back 3 rows, row 9 looks back
    // 6 rows, row 21 looks back 12 rows.
    assert_eq!(present(Variable::ThreeHourPrecipDepth), vec![0, 3]);
    assert_eq!(present(Variable::SixHourPrecipDepth), vec![9]);
    assert_eq!(present(Variable::TwelveHourPrecipDepth), vec![21]);
    assert!(present(Variable::OtherPrecipDepth).is_empty());
    assert_eq!(
        column(Variable::TwelveHourPrecipDepth).data.format_value(21),
        Some("2.5".to_string())
    );

    assert_eq!(report.window_total(AccumulationWindow::ThreeHour), 2);
    assert_eq!(report.window_total(AccumulationWindow::TwelveHour), 1);
}

#[test]
fn test_series_spanning_year_files() {
    let dir = TempDir::new().unwrap();
    let late_2019 = jan_first(2020) - chrono::Duration::hours(6);
    write_isd(dir.path(), "723060-13722-2019.isd", late_2019, 6, &[0]);
    write_isd(dir.path(), "723060-13722-2020.isd", jan_first(2020), 6, &[0]);

    let range = TimeRange::new(late_2019, jan_first(2020) + chrono::Duration::hours(5)).unwrap();
    let series = SeriesBuilder::new(dir.path())
        .build("KRDU", &StationIds::new("723060", "13722"), &range)
        .unwrap();
    assert_eq!(series.len(), 12);
    assert!(series.is_chronological());

    // The second report is six rows after the first, across the file boundary
    let disaggregated = PrecipDisaggregator::new().disaggregate(&series);
    assert_eq!(disaggregated.window_count(AccumulationWindow::SixHour), 2);
}

#[test]
fn test_decode_error_aborts_processing() {
    let dir = TempDir::new().unwrap();
    let mut lines = vec![isd_line(jan_first(2020), -9999)];
    lines.push("2020 01 01 01    50   -11 10259   330    31     4 -9999    1X".to_string());
    fs::write(dir.path().join("723060-13722-2020.isd"), lines.join("\n")).unwrap();

    let range = TimeRange::new(jan_first(2020), jan_first(2021)).unwrap();
    let result = ParallelProcessor::new(1, dir.path()).process_stations(
        &lookup(),
        &["KRDU"],
        &VariableProjector::new(&["Precip"]),
        &range,
        None,
    );

    match result {
        Err(ProcessingError::Decode { file, line, .. }) => {
            assert_eq!(line, 2);
            assert!(file.ends_with("723060-13722-2020.isd"));
        }
        other => panic!("Expected decode error, got {:?}", other.map(|(f, _)| f.len())),
    }
}

#[test]
fn test_empty_station_is_reported_not_failed() {
    let dir = TempDir::new().unwrap();
    write_isd(dir.path(), "723060-13722-2020.isd", jan_first(2020), 6, &[]);

    let range = TimeRange::new(jan_first(2021), jan_first(2022)).unwrap();
    let (frame, report) = ParallelProcessor::new(2, dir.path())
        .process_stations(
            &lookup(),
            &["KRDU", "KDCA"],
            &VariableProjector::new(&["Air Temperature"]),
            &range,
            None,
        )
        .unwrap();

    assert!(frame.is_empty());
    assert_eq!(report.stations_with(StationOutcome::Empty), vec!["KRDU", "KDCA"]);
}

#[test]
fn test_csv_and_parquet_output() {
    let dir = TempDir::new().unwrap();
    write_isd(dir.path(), "724050-13743-2020.isd", jan_first(2020), 12, &[4]);

    let range = TimeRange::new(jan_first(2020), jan_first(2021)).unwrap();
    let projector = VariableProjector::new(&["Sky Condition Code", "Precip", "Bogus"]);
    let (frame, _) = ParallelProcessor::new(1, dir.path())
        .process_stations(&lookup(), &["KDCA"], &projector, &range, None)
        .unwrap();

    let config = ProcessorConfig::default();
    let csv_path = dir.path().join("out").join("kdca.csv");
    write_frame(&frame, &csv_path, &config).unwrap();

    let text = fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "timestamp,station_code,Sky Condition Code,One Hour Precip Depth,\
         Three Hour Precip Depth,Six Hour Precip Depth,Twelve Hour Precip Depth,\
         Other Precip Depth"
    );
    assert_eq!(lines.next().unwrap(), "2020-01-01 00:00:00,KDCA,4,,,,,");
    // A lone report at row 4 looks back five rows and matches no window
    assert_eq!(lines.nth(3).unwrap(), "2020-01-01 04:00:00,KDCA,4,,,,,2.5");

    let parquet_path = dir.path().join("kdca.parquet");
    write_frame(&frame, &parquet_path, &config).unwrap();
    let info = ParquetWriter::new().get_file_info(&parquet_path).unwrap();
    assert_eq!(info.total_rows, 12);
    assert_eq!(info.columns.len(), 8);
}

#[test]
fn test_registry_from_history_file() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("isd-history.txt");
    let line = format!(
        "{:<7}{:<6}{:<30}{:<5}{:<3}{:<5}{:<8}{:<9}{:<8}{:<9}{:<9}",
        "723060", "13722", "RALEIGH DURHAM INTL", "US", "NC", "KRDU", "+35.892", "-078.782",
        "+0126.8", "19730101", "20230709"
    );
    fs::write(&history, format!("USAF   WBAN  STATION NAME\n\n{}\n", line)).unwrap();

    let registry = StationRegistry::from_file(&history).unwrap();
    let range = TimeRange::parse("20200101_00", "20211231_23").unwrap();

    assert_eq!(
        source_file_names(&registry, &["KRDU", "KZZZ"], &range),
        vec!["723060-13722-2020.gz", "723060-13722-2021.gz"]
    );
}

#[test]
fn test_in_memory_decode_and_redisaggregate() {
    let text = [
        isd_line(jan_first(2020), 10),
        String::new(),
        isd_line(jan_first(2020) + chrono::Duration::hours(1), -9999),
        isd_line(jan_first(2020) + chrono::Duration::hours(2), -9999),
        isd_line(jan_first(2020) + chrono::Duration::hours(3), 20),
    ]
    .join("\n");

    let records = IsdLiteReader::new()
        .decode_str(&text, Path::new("<memory>"))
        .unwrap();
    assert_eq!(records.len(), 4);

    let disaggregator = PrecipDisaggregator::new();
    let once = disaggregator.disaggregate(&StationSeries::new("KRDU", records));
    assert_eq!(once.window_count(AccumulationWindow::ThreeHour), 2);
    assert_eq!(disaggregator.redisaggregate(&once), once);
}

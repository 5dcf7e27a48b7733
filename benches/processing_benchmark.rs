use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use isd_lite_processor::models::StationSeries;
use isd_lite_processor::processors::{PrecipDisaggregator, VariableProjector};
use isd_lite_processor::readers::IsdLiteReader;
use std::path::Path;

// One station-year of hourly lines with a six-hour-field report every `step` rows
fn create_isd_text(hours: usize, step: usize) -> String {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    (0..hours)
        .map(|i| {
            let ts = start + chrono::Duration::hours(i as i64);
            let six_hour = if i % step == 0 { (i % 97) as i32 } else { -9999 };
            format!(
                "{} {:5} {:5} {:5} {:5} {:5} {:5} {:5} {:5}",
                ts.format("%Y %m %d %H"),
                (i % 300) as i32 - 100,
                -11,
                10259,
                330,
                31,
                4,
                -9999,
                six_hour
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let reader = IsdLiteReader::new();

    for hours in [744, 8784].iter() {
        let text = create_isd_text(*hours, 6);
        group.bench_with_input(BenchmarkId::new("decode_str", hours), &text, |b, text| {
            b.iter(|| {
                reader
                    .decode_str(black_box(text), Path::new("<bench>"))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn benchmark_disaggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("disaggregate");
    let disaggregator = PrecipDisaggregator::new();

    for step in [3, 6, 12, 17].iter() {
        let records = IsdLiteReader::new()
            .decode_str(&create_isd_text(8784, *step), Path::new("<bench>"))
            .unwrap();
        let series = StationSeries::new("KRDU", records);

        group.bench_with_input(BenchmarkId::new("station_year", step), &series, |b, series| {
            b.iter(|| disaggregator.disaggregate(black_box(series)))
        });
    }

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let text = create_isd_text(8784, 6);
    let projector = VariableProjector::new(&["Air Temperature", "Precip"]);

    c.bench_function("decode_disaggregate_project", |b| {
        b.iter(|| {
            let records = IsdLiteReader::new()
                .decode_str(black_box(&text), Path::new("<bench>"))
                .unwrap();
            let series = PrecipDisaggregator::new()
                .disaggregate_owned(StationSeries::new("KRDU", records));
            projector.project_series(&series)
        })
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_disaggregate,
    benchmark_pipeline
);
criterion_main!(benches);

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use colplot_common::{Config, SourceConfig};
use colplot_core::{
    load_table, resolve_paths, Dimension, PlotKind, PlotObject, PlotObjectKind, PlotOrchestrator, PlotRequest,
};
use parquet::arrow::ArrowWriter;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_parquet() -> NamedTempFile {
    let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let schema = Arc::new(Schema::new(vec![
        Field::new("energy__GeV", DataType::Float64, true),
        Field::new("momentum__GeV", DataType::Float64, true),
        Field::new("detector", DataType::Utf8, true),
    ]));
    let energy: Vec<Option<f64>> = (0..100).map(|i| if i == 7 { None } else { Some(i as f64) }).collect();
    let momentum: Vec<Option<f64>> = (0..100).map(|i| Some(i as f64 * 0.5)).collect();
    let detector: Vec<Option<&str>> = (0..100).map(|i| Some(if i % 2 == 0 { "ecal" } else { "hcal" })).collect();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(energy)),
            Arc::new(Float64Array::from(momentum)),
            Arc::new(StringArray::from(detector)),
        ],
    )
    .unwrap();
    let mut writer = ArrowWriter::try_new(tmp.as_file(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    tmp
}

fn write_csv(body: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    tmp.write_all(body.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn request(x: usize, y: Option<usize>, kind: PlotKind, dimension: Dimension) -> PlotRequest {
    PlotRequest { x_index: x, y_index: y, kind, dimension }
}

#[test]
fn parquet_to_1d_histogram() {
    let tmp = write_parquet();
    let paths = resolve_paths(tmp.path().to_str().unwrap()).unwrap();
    let table = load_table(&paths, &SourceConfig::default()).unwrap();
    assert_eq!(table.row_count(), 100);
    assert_eq!(table.field(7, 0), None);

    let mut orch = PlotOrchestrator::from_config(&Config::default());
    let retained = orch.plot(&table, &request(0, None, PlotKind::Histogram, Dimension::One)).unwrap();
    assert_eq!(retained.x_dropped, 1);
    let PlotObject::Histogram1D(h) = &retained.plot else { panic!("expected 1D histogram") };
    assert_eq!(h.entries, 99);
    assert_eq!(h.counts.iter().sum::<u64>(), 99);
    assert_eq!(h.x_title, "energy (GeV)");
    assert!(h.y_title.starts_with("Entries / "));
    assert!(h.y_title.ends_with(" GeV"));
}

#[test]
fn parquet_paired_columns_fall_back_when_lengths_differ() {
    let tmp = write_parquet();
    let paths = resolve_paths(tmp.path().to_str().unwrap()).unwrap();
    let table = load_table(&paths, &SourceConfig::default()).unwrap();
    let mut orch = PlotOrchestrator::default();

    // energy has one null, momentum has none
    let r = orch.plot(&table, &request(0, Some(1), PlotKind::Histogram, Dimension::Two)).unwrap();
    assert_eq!(r.plot.kind(), PlotObjectKind::Histogram1D);
    let r = orch.plot(&table, &request(1, Some(1), PlotKind::Histogram, Dimension::Two)).unwrap();
    assert_eq!(r.plot.kind(), PlotObjectKind::Histogram2D);
    let r = orch.plot(&table, &request(0, Some(1), PlotKind::Scatter, Dimension::Two)).unwrap();
    let PlotObject::Scatter(s) = &r.plot else { panic!("expected scatter") };
    assert_eq!(s.points.len(), 99);
    assert_eq!(s.x_title, "Index");
}

#[test]
fn csv_session_cycles_canvases() {
    let tmp = write_csv("x__mm,y__mm,note\n1,2,a\n2,4,b\n3,6,c\n4,8,d\n");
    let paths = resolve_paths(tmp.path().to_str().unwrap()).unwrap();
    let table = load_table(&paths, &SourceConfig::default()).unwrap();
    let mut cfg = Config::default();
    cfg.plot.max_canvases = 2;
    let mut orch = PlotOrchestrator::from_config(&cfg);
    let mut last = None;
    for _ in 0..4 {
        let r = orch.plot(&table, &request(0, Some(1), PlotKind::Scatter, Dimension::Two)).unwrap();
        last = Some(r.surface);
    }
    assert_eq!(orch.pool().len(), 2);
    assert_eq!(orch.pool().active().map(|s| s.id()), last);
    let PlotObject::Scatter(s) = &orch.current().unwrap().plot else { panic!("expected scatter") };
    assert_eq!(s.points, vec![(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)]);

    assert!(orch.plot(&table, &request(3, None, PlotKind::Histogram, Dimension::One)).is_err());
    assert_eq!(orch.pool().active().map(|s| s.id()), last);
}

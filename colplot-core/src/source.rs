use crate::scanner::{SourceFormat, SourcePath};
use crate::table::Table;
use arrow::array::Array;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use colplot_common::{ColplotError, Result, SourceConfig};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// Load every file into one table. All files must carry the header of the first.
pub fn load_table(paths: &[SourcePath], cfg: &SourceConfig) -> Result<Table> {
    let mut table = Table::default();
    for (i, source) in paths.iter().enumerate() {
        if cfg.max_rows.is_some_and(|max| table.row_count() >= max) {
            break;
        }
        let (header, batches) = read_batches(source, cfg)?;
        if i == 0 {
            table.header = header;
        } else if header != table.header {
            return Err(ColplotError::SchemaMismatch { path: source.path.display().to_string() });
        }
        for batch in &batches {
            append_batch(&mut table, batch, cfg.max_rows)?;
        }
        tracing::info!(path = %source.path.display(), rows = table.row_count(), "loaded source");
    }
    Ok(table)
}

/// Convenience over [`load_table`] for a single path with a known extension.
pub fn load_path(path: &Path, cfg: &SourceConfig) -> Result<Table> {
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| ColplotError::UnsupportedFormat(path.display().to_string()))?;
    load_table(&[SourcePath { path: path.to_path_buf(), format }], cfg)
}

fn read_batches(source: &SourcePath, cfg: &SourceConfig) -> Result<(Vec<String>, Vec<RecordBatch>)> {
    let file = File::open(&source.path)?;
    match source.format {
        SourceFormat::Parquet => {
            let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
            let header = builder.schema().fields().iter().map(|f| f.name().clone()).collect();
            let reader = builder.build()?;
            let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
            Ok((header, batches))
        }
        SourceFormat::Csv => {
            let delimiter = u8::try_from(cfg.csv_delimiter)
                .map_err(|_| ColplotError::Config(format!("csv delimiter {:?} is not a single byte", cfg.csv_delimiter)))?;
            read_csv(file, delimiter, cfg)
        }
        SourceFormat::Tsv => read_csv(file, b'\t', cfg),
    }
}

fn read_csv(mut file: File, delimiter: u8, cfg: &SourceConfig) -> Result<(Vec<String>, Vec<RecordBatch>)> {
    let format = Format::default().with_header(cfg.csv_has_header).with_delimiter(delimiter);
    let (schema, _) = format.infer_schema(&mut file, Some(cfg.infer_rows))?;
    file.seek(SeekFrom::Start(0))?;
    let header = schema.fields().iter().map(|f| f.name().clone()).collect();
    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(cfg.csv_has_header)
        .with_delimiter(delimiter)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((header, batches))
}

fn append_batch(table: &mut Table, batch: &RecordBatch, max_rows: Option<usize>) -> Result<()> {
    let options = FormatOptions::default();
    let columns: Vec<&dyn Array> = batch.columns().iter().map(|c| c.as_ref()).collect();
    let formatters = columns
        .iter()
        .map(|c| ArrayFormatter::try_new(*c, &options))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let take = match max_rows {
        Some(max) => batch.num_rows().min(max.saturating_sub(table.row_count())),
        None => batch.num_rows(),
    };
    for row in 0..take {
        let fields = columns
            .iter()
            .zip(&formatters)
            .map(|(col, fmt)| (!col.is_null(row)).then(|| fmt.value(row).to_string()))
            .collect();
        table.rows.push(fields);
    }
    Ok(())
}

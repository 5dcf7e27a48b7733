use crate::error::{ProcessingError, Result};
use crate::models::{ColumnData, ObservationFrame};
use crate::utils::constants::{DEFAULT_ROW_GROUP_SIZE, STATION_CODE_COLUMN, TIMESTAMP_COLUMN};
use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray, TimestampSecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write a projected frame to a Parquet file
    pub fn write_frame(&self, frame: &ObservationFrame, path: &Path) -> Result<()> {
        self.write_frame_batched(frame, path, frame.len().max(1))
    }

    /// Write a frame in record batches of at most `batch_size` rows
    pub fn write_frame_batched(
        &self,
        frame: &ObservationFrame,
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        if frame.is_empty() {
            warn!(file = %path.display(), "No rows to write");
            return Ok(());
        }

        let schema = self.create_schema(frame);
        let batch = self.frame_to_batch(frame, schema.clone())?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;

        let batch_size = batch_size.max(1);
        let mut offset = 0;
        while offset < batch.num_rows() {
            let length = batch_size.min(batch.num_rows() - offset);
            writer.write(&batch.slice(offset, length))?;
            offset += length;
        }

        writer.close()?;
        debug!(file = %path.display(), rows = frame.len(), "Wrote Parquet file");
        Ok(())
    }

    /// Arrow schema: identity columns followed by the frame's variables
    fn create_schema(&self, frame: &ObservationFrame) -> Arc<Schema> {
        let mut fields = vec![
            Field::new(
                TIMESTAMP_COLUMN,
                DataType::Timestamp(TimeUnit::Second, None),
                false,
            ),
            Field::new(STATION_CODE_COLUMN, DataType::Utf8, false),
        ];

        fields.extend(frame.columns.iter().map(|column| {
            let data_type = match column.data {
                ColumnData::Scaled(_) => DataType::Float64,
                ColumnData::Integer(_) => DataType::Int32,
            };
            Field::new(column.name(), data_type, true)
        }));

        Arc::new(Schema::new(fields))
    }

    fn frame_to_batch(&self, frame: &ObservationFrame, schema: Arc<Schema>) -> Result<RecordBatch> {
        let timestamps: Vec<i64> = frame
            .timestamps
            .iter()
            .map(|ts| ts.and_utc().timestamp())
            .collect();

        let mut arrays: Vec<ArrayRef> = vec![
            Arc::new(TimestampSecondArray::from(timestamps)),
            Arc::new(StringArray::from(frame.station_codes.clone())),
        ];

        for column in &frame.columns {
            let array: ArrayRef = match &column.data {
                ColumnData::Scaled(values) => Arc::new(Float64Array::from(values.clone())),
                ColumnData::Integer(values) => Arc::new(Int32Array::from(values.clone())),
            };
            arrays.push(array);
        }

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Get basic information about a written Parquet file
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let columns = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            columns,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub columns: Vec<String>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - Columns: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.columns.join(", "),
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
        )
    }
}

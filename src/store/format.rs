//! JSON and CSV point files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::models::PointRecord;

/// Column order used when writing CSV.
const CSV_HEADERS: [&str; 6] = [
    "city",
    "street",
    "house",
    "addressdesc",
    "branchname",
    "geolocation",
];

/// On-disk layout of a point file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => Ok(RecordFormat::Json),
            "csv" => Ok(RecordFormat::Csv),
            _ => Err(StoreError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn load(self, path: &Path) -> Result<Vec<PointRecord>, StoreError> {
        let file = File::open(path).map_err(|source| io_error(path, source))?;
        let reader = BufReader::new(file);

        match self {
            RecordFormat::Json => {
                serde_json::from_reader(reader).map_err(|source| StoreError::Json {
                    path: path.to_path_buf(),
                    source,
                })
            }
            RecordFormat::Csv => {
                let mut csv_reader = csv::ReaderBuilder::new()
                    .has_headers(true)
                    .trim(csv::Trim::Headers)
                    .from_reader(reader);

                csv_reader
                    .deserialize()
                    .collect::<Result<Vec<PointRecord>, _>>()
                    .map_err(|source| csv_error(path, source))
            }
        }
    }

    /// Replace the file at `path` with `records`.
    ///
    /// Records are written to a sibling temporary file which is then renamed
    /// over the target, so an interrupted save leaves the previous contents
    /// intact.
    pub fn save(self, path: &Path, records: &[PointRecord]) -> Result<(), StoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| io_error(&dir, source))?;
        }

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|source| io_error(path, source))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            match self {
                RecordFormat::Json => write_json(&mut writer, path, records)?,
                RecordFormat::Csv => write_csv(&mut writer, path, records)?,
            }
            writer.flush().map_err(|source| io_error(path, source))?;
        }

        tmp.persist(path)
            .map_err(|e| io_error(path, e.error))?;
        Ok(())
    }
}

fn write_json<W: Write>(
    writer: &mut W,
    path: &Path,
    records: &[PointRecord],
) -> Result<(), StoreError> {
    serde_json::to_writer_pretty(&mut *writer, records).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer
        .write_all(b"\n")
        .map_err(|source| io_error(path, source))
}

/// The geolocation column is always present so every row has the same
/// width; unresolved points leave it empty.
fn write_csv<W: Write>(
    writer: &mut W,
    path: &Path,
    records: &[PointRecord],
) -> Result<(), StoreError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(CSV_HEADERS)
        .map_err(|source| csv_error(path, source))?;

    for record in records {
        let house = record.house.to_string();
        csv_writer
            .write_record([
                record.city.as_str(),
                record.street.as_deref().unwrap_or(""),
                house.as_str(),
                record.addressdesc.as_str(),
                record.branchname.as_str(),
                record.geolocation.as_deref().unwrap_or(""),
            ])
            .map_err(|source| csv_error(path, source))?;
    }

    csv_writer
        .flush()
        .map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_error(path: &Path, source: csv::Error) -> StoreError {
    StoreError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

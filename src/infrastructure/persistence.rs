use std::fs;

use thiserror::Error;

use crate::domain::Grid;

/// Failures from file and CSV storage, rendered into status-bar messages
/// at the presentation boundary.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file format: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// JSON persistence for whole grids.
pub struct FileRepository;

impl FileRepository {
    pub fn save_grid(grid: &Grid, filename: &str) -> Result<String, StorageError> {
        let json = serde_json::to_string_pretty(grid)?;
        fs::write(filename, json)?;
        Ok(filename.to_string())
    }

    pub fn load_grid(filename: &str) -> Result<(Grid, String), StorageError> {
        let content = fs::read_to_string(filename)?;
        let grid = serde_json::from_str(&content)?;
        Ok((grid, filename.to_string()))
    }
}

/// CSV import/export of displayed cell values.
///
/// Export writes one record per grid row. Import builds a fresh grid sized
/// to the data, at least the default dimensions, with columns capped at the
/// addressable ceiling; rows and columns beyond that cap are dropped.
pub struct CsvStore;

impl CsvStore {
    pub fn export(grid: &Grid, filename: &str) -> Result<String, StorageError> {
        let mut writer = csv::Writer::from_path(filename)?;
        for row in 0..grid.rows() {
            writer.write_record((0..grid.cols()).map(|col| grid.get(row, col)))?;
        }
        writer.flush()?;
        Ok(filename.to_string())
    }

    pub fn import(filename: &str) -> Result<Grid, StorageError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(filename)?;

        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record?);
        }

        let data_cols = records.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut grid = Grid::new(
            records.len().max(Grid::DEFAULT_ROWS),
            data_cols.max(Grid::DEFAULT_COLS),
        );

        for (row, record) in records.iter().enumerate() {
            for (col, field) in record.iter().enumerate() {
                grid.set(row, col, field.to_string());
            }
        }

        Ok(grid)
    }
}

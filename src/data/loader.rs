//! Source Loader Module
//! Loads the restaurant CSV with Polars and the country lookup workbook
//! with calamine.

use calamine::{open_workbook, DataType as CellType, Reader, Xlsx};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::data::{COL_COUNTRY, COL_COUNTRY_CODE};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("cannot read {}: {source}", path.display())]
    SourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("failed to open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },
    #[error("workbook {} contains no worksheets", path.display())]
    EmptyWorkbook { path: PathBuf },
    #[error("lookup sheet has no \"{0}\" column")]
    MissingLookupColumn(&'static str),
}

/// Loads the two source files. Both loads are one-shot; any failure is
/// fatal to the load cycle.
pub struct SourceLoader;

impl SourceLoader {
    /// Load the restaurant CSV. The file is Latin-1 encoded in the wild, so
    /// decoding is lossy-UTF8; malformed rows are skipped rather than
    /// aborting the parse.
    pub fn load_restaurants(path: &Path) -> Result<DataFrame, LoaderError> {
        fs::metadata(path).map_err(|source| LoaderError::SourceLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .with_encoding(CsvEncoding::LossyUtf8)
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| LoaderError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(rows = df.height(), cols = df.width(), "loaded restaurant source");
        Ok(df)
    }

    /// Load the country lookup from the first worksheet of an xlsx
    /// workbook. The header row must carry "Country Code" and "Country".
    pub fn load_country_lookup(path: &Path) -> Result<DataFrame, LoaderError> {
        fs::metadata(path).map_err(|source| LoaderError::SourceLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let mut workbook: Xlsx<_> =
            open_workbook(path).map_err(|source| LoaderError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoaderError::EmptyWorkbook {
                path: path.to_path_buf(),
            })?
            .map_err(|source| LoaderError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or(LoaderError::MissingLookupColumn(COL_COUNTRY_CODE))?;

        let position = |name: &'static str| {
            header
                .iter()
                .position(|cell| cell.as_string().map(|s| s.trim() == name).unwrap_or(false))
                .ok_or(LoaderError::MissingLookupColumn(name))
        };
        let code_idx = position(COL_COUNTRY_CODE)?;
        let country_idx = position(COL_COUNTRY)?;

        let mut codes: Vec<Option<i64>> = Vec::new();
        let mut countries: Vec<Option<String>> = Vec::new();
        for row in rows {
            let code = row.get(code_idx).and_then(|cell| {
                cell.as_i64().or_else(|| cell.as_f64().map(|f| f as i64))
            });
            let country = row.get(country_idx).and_then(|cell| cell.as_string());
            if code.is_none() && country.is_none() {
                continue; // blank trailing row
            }
            codes.push(code);
            countries.push(country);
        }

        let df = DataFrame::new(vec![
            Column::new(COL_COUNTRY_CODE.into(), codes),
            Column::new(COL_COUNTRY.into(), countries),
        ])
        .map_err(|source| LoaderError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(rows = df.height(), "loaded country lookup");
        Ok(df)
    }
}

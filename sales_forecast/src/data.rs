//! Loading retail sales data into per-entity series

use crate::error::{ForecastError, Result};
use crate::series::{Covariates, Observation, Series, COVARIATE_NAMES};
use crate::utils::{parse_date, sort_entity_ids};
use polars::prelude::{CsvReader, DataFrame, DataType, SerReader};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Which input columns hold the date, the sales value and the entity id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub date: String,
    pub sales: String,
    pub store: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            sales: "Sales".to_string(),
            store: "Store".to_string(),
        }
    }
}

/// Historical sales split into one series per entity
#[derive(Debug, Clone, PartialEq)]
pub struct SalesData {
    series: Vec<Series>,
    rows: usize,
}

impl SalesData {
    /// Series in forecasting order
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn into_series(self) -> Vec<Series> {
        self.series
    }

    pub fn entity_ids(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.entity_id()).collect()
    }

    /// Number of input rows
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Data loader for retail sales data
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load sales data from a CSV file
    pub fn from_csv<P, S>(path: P, columns: &ColumnMapping, date_formats: &[S]) -> Result<SalesData>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        info!(path = %path.display(), rows = df.height(), "read sales csv");
        Self::from_dataframe(df, columns, date_formats)
    }

    /// Build per-entity series from an existing DataFrame
    pub fn from_dataframe<S: AsRef<str>>(
        mut df: DataFrame,
        columns: &ColumnMapping,
        date_formats: &[S],
    ) -> Result<SalesData> {
        let trimmed: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        df.set_column_names(&trimmed)?;

        let rows = df.height();
        let dates = Self::string_column(&df, &columns.date)?;
        let stores = Self::string_column(&df, &columns.store)?;
        let sales = Self::float_column(&df, &columns.sales)?;

        let mut covariate_columns: Vec<Vec<f64>> = Vec::with_capacity(COVARIATE_NAMES.len());
        for name in COVARIATE_NAMES {
            if trimmed.iter().any(|c| c == name) {
                let values = Self::float_column(&df, name)?;
                covariate_columns.push(values.into_iter().map(|v| v.unwrap_or(0.0)).collect());
            } else {
                debug!(column = name, "covariate missing, defaulting to zero");
                covariate_columns.push(vec![0.0; rows]);
            }
        }

        let mut groups: HashMap<String, Vec<Observation>> = HashMap::new();

        for row in 0..rows {
            // Row numbers are reported 1-based, header excluded
            let line = row + 1;

            let store = stores[row].clone().ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Row {} has no value in column '{}'",
                    line, columns.store
                ))
            })?;

            let raw_date = dates[row].as_deref().ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Row {} has no value in column '{}'",
                    line, columns.date
                ))
            })?;
            let date = parse_date(raw_date, date_formats).map_err(|e| {
                ForecastError::DataError(format!("Row {}: {}", line, e))
            })?;

            let value = sales[row].ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Row {} has no numeric value in column '{}'",
                    line, columns.sales
                ))
            })?;

            let covariates = Covariates::from_array([
                covariate_columns[0][row],
                covariate_columns[1][row],
                covariate_columns[2][row],
                covariate_columns[3][row],
                covariate_columns[4][row],
            ]);

            groups
                .entry(store)
                .or_default()
                .push(Observation::observed(date, value, covariates));
        }

        let mut entity_ids: Vec<String> = groups.keys().cloned().collect();
        sort_entity_ids(&mut entity_ids);

        let mut series = Vec::with_capacity(entity_ids.len());
        for entity_id in entity_ids {
            let mut observations = groups.remove(&entity_id).unwrap_or_default();
            observations.sort_by_key(|o| o.date);
            series.push(Series::new(entity_id, observations)?);
        }

        info!(rows, entities = series.len(), "loaded sales series");
        Ok(SalesData { series, rows })
    }

    /// Read a column as trimmed strings
    fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
        let column = df
            .column(name)
            .map_err(|_| ForecastError::DataError(format!("Column '{}' not found", name)))?;
        let column = column.cast(&DataType::Utf8)?;

        Ok(column
            .utf8()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect())
    }

    /// Read a column as f64; cells that are not numbers come back as `None`
    fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
        let column = df
            .column(name)
            .map_err(|_| ForecastError::DataError(format!("Column '{}' not found", name)))?;
        let column = column.cast(&DataType::Float64)?;

        Ok(column.f64()?.into_iter().collect())
    }
}

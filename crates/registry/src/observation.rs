//! Yearly observations and their per-entity grouping.

use crate::error::{RegistryError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One `(entity, year, value)` row of the input dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub entity: String,
    pub year: i32,
    pub value: f64,
}

impl Observation {
    pub fn new(entity: impl Into<String>, year: i32, value: f64) -> Self {
        Self {
            entity: entity.into(),
            year,
            value,
        }
    }
}

/// Names of the CSV columns holding entity, year and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub entity: String,
    pub year: String,
    pub value: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            entity: "country_name".to_string(),
            year: "year".to_string(),
            value: "value".to_string(),
        }
    }
}

/// One entity's history, ordered by ascending year.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeries {
    pub entity: String,
    pub years: Vec<i32>,
    pub values: Vec<f64>,
}

impl EntitySeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }
}

/// Load observations from a CSV file with a header row.
pub fn load_observations(path: &Path, columns: &ColumnSpec) -> Result<Vec<Observation>> {
    let file = File::open(path).map_err(|e| RegistryError::io(path, e))?;
    read_observations(BufReader::new(file), columns)
}

/// Read observations from any CSV source.
///
/// Rows with an unparseable year, or a value that is empty or not a finite
/// number, are skipped.
pub fn read_observations<R: Read>(reader: R, columns: &ColumnSpec) -> Result<Vec<Observation>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| RegistryError::MissingColumn(name.to_string()))
    };
    let entity_idx = position(&columns.entity)?;
    let year_idx = position(&columns.year)?;
    let value_idx = position(&columns.value)?;

    let mut observations = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result?;
        let entity = record.get(entity_idx).map(str::trim).unwrap_or_default();
        let year = record.get(year_idx).and_then(|y| parse_year(y.trim()));
        let value = record
            .get(value_idx)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite());

        match (entity.is_empty(), year, value) {
            (false, Some(year), Some(value)) => {
                observations.push(Observation::new(entity, year, value));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "skipped rows with missing or non-numeric fields");
    }
    tracing::info!(rows = observations.len(), "loaded observations");

    Ok(observations)
}

/// Years are sometimes exported as floats ("2019.0").
fn parse_year(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|y| y.fract() == 0.0 && y.abs() < i32::MAX as f64)
            .map(|y| y as i32)
    })
}

/// Group observations into per-entity series sorted by year.
///
/// A repeated `(entity, year)` keeps the row read last.
pub fn group_by_entity(observations: &[Observation]) -> Vec<EntitySeries> {
    let mut grouped: BTreeMap<&str, BTreeMap<i32, f64>> = BTreeMap::new();

    for obs in observations {
        let by_year = grouped.entry(obs.entity.as_str()).or_default();
        if by_year.insert(obs.year, obs.value).is_some() {
            tracing::warn!(entity = %obs.entity, year = obs.year, "duplicate year, keeping last value");
        }
    }

    grouped
        .into_iter()
        .map(|(entity, by_year)| {
            let (years, values) = by_year.into_iter().unzip();
            EntitySeries {
                entity: entity.to_string(),
                years,
                values,
            }
        })
        .collect()
}

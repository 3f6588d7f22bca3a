//! The event registry: every quake loaded at startup, in dataset order.

use super::record::{Quake, QuakeId, QuakeRecord, RecordError};
use crate::utils::color::DEFAULT_MAX_MAGNITUDE;
use bevy::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Errors raised while reading a dataset file.
#[derive(Debug)]
pub enum CatalogError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Json(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io { path, source } => {
                write!(f, "failed to read dataset {path}: {source}")
            }
            CatalogError::Json(e) => write!(f, "dataset is not a valid JSON record list: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io { source, .. } => Some(source),
            CatalogError::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Json(e)
    }
}

/// A record skipped during loading, with its position in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub index: usize,
    pub id: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    Invalid(RecordError),
    DuplicateId,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Invalid(e) => e.fmt(f),
            RejectReason::DuplicateId => write!(f, "duplicate id"),
        }
    }
}

/// Ordered, read-only set of quakes with lookup by id.
#[derive(Resource, Debug, Clone, Default)]
pub struct QuakeCatalog {
    quakes: Vec<Quake>,
    index: HashMap<QuakeId, usize>,
}

impl QuakeCatalog {
    /// Builds a catalog from already validated quakes. Later duplicates of an
    /// id are dropped.
    pub fn new(quakes: impl IntoIterator<Item = Quake>) -> Self {
        let mut catalog = Self::default();
        for quake in quakes {
            catalog.insert(quake);
        }
        catalog
    }

    fn insert(&mut self, quake: Quake) -> bool {
        if self.index.contains_key(&quake.id) {
            return false;
        }
        self.index.insert(quake.id.clone(), self.quakes.len());
        self.quakes.push(quake);
        true
    }

    /// Reads and validates a JSON dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, Vec<RejectedRecord>), CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parses a JSON array of records, keeping the valid ones in order.
    pub fn from_json_str(json: &str) -> Result<(Self, Vec<RejectedRecord>), CatalogError> {
        let records: Vec<QuakeRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<QuakeRecord>) -> (Self, Vec<RejectedRecord>) {
        let mut catalog = Self::default();
        let mut rejected = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let id = record.id.clone();
            match Quake::try_from(record) {
                Ok(quake) => {
                    if !catalog.insert(quake) {
                        rejected.push(RejectedRecord {
                            index,
                            id,
                            reason: RejectReason::DuplicateId,
                        });
                    }
                }
                Err(e) => rejected.push(RejectedRecord {
                    index,
                    id,
                    reason: RejectReason::Invalid(e),
                }),
            }
        }

        (catalog, rejected)
    }

    pub fn get(&self, id: &QuakeId) -> Option<&Quake> {
        self.index.get(id).map(|&i| &self.quakes[i])
    }

    pub fn contains(&self, id: &QuakeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quake> {
        self.quakes.iter()
    }

    pub fn len(&self) -> usize {
        self.quakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quakes.is_empty()
    }

    /// Largest magnitude in the catalog, or [`DEFAULT_MAX_MAGNITUDE`] when the
    /// catalog is empty or every magnitude is zero.
    pub fn max_magnitude(&self) -> f64 {
        let max = self
            .quakes
            .iter()
            .map(|quake| quake.magnitude)
            .fold(0.0, f64::max);
        if max > 0.0 { max } else { DEFAULT_MAX_MAGNITUDE }
    }

    /// Smallest magnitude in the catalog, `0.0` when empty.
    pub fn min_magnitude(&self) -> f64 {
        self.quakes
            .iter()
            .map(|quake| quake.magnitude)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::BreedError;

/// One English → localized pair, as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedMapping {
    pub en: String,
    pub ko: String,
}

#[derive(Debug, Default)]
struct MappingTable {
    /// Classifier label order.
    labels: Vec<String>,
    localized: HashMap<String, String>,
}

/// Shared English → localized breed label table.
///
/// Cloning is cheap; clones share the same table. Empty until [`seed`](Self::seed) runs,
/// and every read or update before that fails with [`BreedError::NotInitialized`].
#[derive(Debug, Clone, Default)]
pub struct BreedMappingStore {
    inner: Arc<RwLock<Option<MappingTable>>>,
}

impl BreedMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the label table and marks the store ready.
    ///
    /// Labels keep their given order. A blank localized value means "not localized":
    /// the label lists under its English name and cannot be updated.
    pub fn seed<I, E, K>(&self, labels: I)
    where
        I: IntoIterator<Item = (E, K)>,
        E: Into<String>,
        K: Into<String>,
    {
        let mut table = MappingTable::default();
        for (en, ko) in labels {
            let en = en.into();
            let ko = ko.into();
            if table.labels.contains(&en) {
                continue;
            }
            let ko = ko.trim();
            if !ko.is_empty() {
                table.localized.insert(en.clone(), ko.to_string());
            }
            table.labels.push(en);
        }

        info!(
            labels = table.labels.len(),
            localized = table.localized.len(),
            "breed mappings seeded"
        );
        *self.inner.write() = Some(table);
    }

    pub fn is_ready(&self) -> bool {
        self.inner.read().is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.read().as_ref().map_or(0, |t| t.labels.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn list(&self) -> Result<Vec<BreedMapping>, BreedError> {
        let guard = self.inner.read();
        let table = guard.as_ref().ok_or(BreedError::NotInitialized)?;

        Ok(table
            .labels
            .iter()
            .map(|en| BreedMapping {
                en: en.clone(),
                ko: table.localized.get(en).unwrap_or(en).clone(),
            })
            .collect())
    }

    /// Overwrites the localized label of a known breed. Returns `false` (and changes
    /// nothing) when `english` has no localized entry.
    pub fn update(&self, english: &str, localized: &str) -> Result<bool, BreedError> {
        let mut guard = self.inner.write();
        let table = guard.as_mut().ok_or(BreedError::NotInitialized)?;

        let localized = localized.trim();
        match table.localized.get_mut(english) {
            Some(current) => {
                info!(en = english, from = %current, to = localized, "breed mapping updated");
                *current = localized.to_string();
                Ok(true)
            }
            None => {
                warn!(en = english, "unknown breed label, mapping not updated");
                Ok(false)
            }
        }
    }

    /// Localized label for `english`, or `english` itself when it has none.
    pub fn localize(&self, english: &str) -> Result<String, BreedError> {
        let guard = self.inner.read();
        let table = guard.as_ref().ok_or(BreedError::NotInitialized)?;
        Ok(table
            .localized
            .get(english)
            .cloned()
            .unwrap_or_else(|| english.to_string()))
    }
}

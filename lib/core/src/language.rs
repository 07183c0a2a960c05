use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One language documented in the feature database.
///
/// The record is keyed by its registry (WALS) code. External identifiers
/// (ISO 639-3) may be shared with other records. The characteristic map is
/// `None` until the store populates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRecord {
    pub code: String,
    pub external_ids: Vec<String>,
    /// Remaining columns of the entity table (name, family, genus, ...)
    pub fields: BTreeMap<String, String>,
    characteristics: Option<BTreeMap<String, String>>,
}

impl LanguageRecord {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            external_ids: Vec::new(),
            fields: BTreeMap::new(),
            characteristics: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_ids.push(id.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("Name").map(String::as_str)
    }

    #[inline]
    pub fn is_populated(&self) -> bool {
        self.characteristics.is_some()
    }

    /// All characteristics, keyed by code or by name depending on how the
    /// store was populated
    pub fn characteristics(&self) -> Option<&BTreeMap<String, String>> {
        self.characteristics.as_ref()
    }

    pub fn characteristic(&self, key: &str) -> Option<&str> {
        self.characteristics
            .as_ref()
            .and_then(|c| c.get(key))
            .map(String::as_str)
    }

    pub(crate) fn set_characteristics(&mut self, characteristics: BTreeMap<String, String>) {
        self.characteristics = Some(characteristics);
    }

    pub(crate) fn clear_characteristics(&mut self) {
        self.characteristics = None;
    }
}

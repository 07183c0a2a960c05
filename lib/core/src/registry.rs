//! Characteristic registry
//!
//! Global, read-only metadata about the structural features recorded in
//! WALS: characteristic (parameter) names, the chapter each belongs to, the
//! number of possible values, and the descriptions of individual value codes.
//! Built once per store and shared by every language record.

use crate::table::{cell, Table};
use crate::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const PARAMETERS_FILE: &str = "parameters.csv";
pub const CODES_FILE: &str = "codes.csv";
pub const CHAPTERS_FILE: &str = "chapters.csv";

/// A structural characteristic (WALS parameter)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<String>,
    /// Number of possible values (classes) for this characteristic
    pub value_count: usize,
}

/// A WALS chapter with its descriptive columns (e.g. `Area_ID`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub fields: BTreeMap<String, String>,
}

impl Chapter {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CharacteristicRegistry {
    characteristics: AHashMap<String, Characteristic>,
    value_names: AHashMap<String, String>,
    chapters: AHashMap<String, Chapter>,
}

impl CharacteristicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `parameters.csv`, `codes.csv` and, if present, `chapters.csv`
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let mut registry = Self::new();

        let mut params = Table::open(&data_dir.join(PARAMETERS_FILE))?;
        let idx_id = params.column("ID")?;
        let idx_name = params.column("Name")?;
        let idx_chapter = params.optional_column("Chapter_ID");
        params.for_each_row(|row| {
            let chapter = idx_chapter.map(|i| cell(row, i)).filter(|c| !c.is_empty());
            registry.insert_characteristic(cell(row, idx_id), cell(row, idx_name), chapter);
            Ok(())
        })?;

        let mut codes = Table::open(&data_dir.join(CODES_FILE))?;
        let idx_id = codes.column("ID")?;
        let idx_param = codes.column("Parameter_ID")?;
        let idx_name = codes.column("Name")?;
        let codes_path = codes.path().to_path_buf();
        codes.for_each_row(|row| {
            let param = cell(row, idx_param);
            if !registry.insert_value(cell(row, idx_id), param, cell(row, idx_name)) {
                return Err(Error::data_load(
                    &codes_path,
                    format!("value code references unknown characteristic '{param}'"),
                ));
            }
            Ok(())
        })?;

        let chapters_path = data_dir.join(CHAPTERS_FILE);
        if chapters_path.is_file() {
            let mut chapters = Table::open(&chapters_path)?;
            let idx_id = chapters.column("ID")?;
            let headers: Vec<String> = chapters.headers().iter().map(|h| h.trim().to_string()).collect();
            chapters.for_each_row(|row| {
                let fields = headers
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != idx_id)
                    .map(|(i, h)| (h.clone(), cell(row, i).to_string()))
                    .collect();
                registry.insert_chapter(Chapter {
                    id: cell(row, idx_id).to_string(),
                    fields,
                });
                Ok(())
            })?;
        }

        tracing::debug!(
            characteristics = registry.characteristics.len(),
            values = registry.value_names.len(),
            chapters = registry.chapters.len(),
            "Characteristic registry loaded"
        );

        Ok(registry)
    }

    pub fn insert_characteristic(&mut self, code: &str, name: &str, chapter_id: Option<&str>) {
        let value_count = self.characteristics.get(code).map_or(0, |c| c.value_count);
        self.characteristics.insert(
            code.to_string(),
            Characteristic {
                code: code.to_string(),
                name: name.to_string(),
                chapter_id: chapter_id.map(str::to_string),
                value_count,
            },
        );
    }

    /// Register a value code; returns false if the characteristic is unknown
    pub fn insert_value(&mut self, value_code: &str, characteristic: &str, description: &str) -> bool {
        match self.characteristics.get_mut(characteristic) {
            Some(c) => {
                if self
                    .value_names
                    .insert(value_code.to_string(), description.to_string())
                    .is_none()
                {
                    c.value_count += 1;
                }
                true
            }
            None => false,
        }
    }

    pub fn insert_chapter(&mut self, chapter: Chapter) {
        self.chapters.insert(chapter.id.clone(), chapter);
    }

    #[inline]
    pub fn characteristic(&self, code: &str) -> Option<&Characteristic> {
        self.characteristics.get(code)
    }

    #[inline]
    pub fn value_name(&self, value_code: &str) -> Option<&str> {
        self.value_names.get(value_code).map(String::as_str)
    }

    #[inline]
    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.get(id)
    }

    /// Characteristics filed under a chapter, sorted by code
    pub fn characteristics_in_chapter(&self, chapter_id: &str) -> Vec<&Characteristic> {
        let mut found: Vec<_> = self
            .characteristics
            .values()
            .filter(|c| c.chapter_id.as_deref() == Some(chapter_id))
            .collect();
        found.sort_by(|a, b| a.code.cmp(&b.code));
        found
    }

    pub fn len(&self) -> usize {
        self.characteristics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characteristics.is_empty()
    }
}

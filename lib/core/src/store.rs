//! Feature store
//!
//! Loads the WALS tables, owns every [`LanguageRecord`] and the
//! [`CharacteristicRegistry`], fills characteristic maps on demand and
//! resolves ISO 639-3 codes to WALS codes.

use crate::language::LanguageRecord;
use crate::registry::CharacteristicRegistry;
use crate::table::{cell, Table};
use crate::{Error, Result};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const LANGUAGES_FILE: &str = "languages.csv";
pub const VALUES_FILE: &str = "values.csv";

const MEMORY_SOURCE: &str = "<memory>";

/// How characteristic maps are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Parameter codes as keys, value codes as values (`81A` -> `81A-1`)
    #[default]
    Codes,
    /// Parameter names as keys, value descriptions as values
    Explicit,
}

/// One row of the values table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub language: String,
    pub characteristic: String,
    pub value: String,
}

impl Observation {
    pub fn new(
        language: impl Into<String>,
        characteristic: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            characteristic: characteristic.into(),
            value: value.into(),
        }
    }
}

/// Options for [`FeatureStore::populate_characteristics`]
#[derive(Debug, Clone, Default)]
pub struct PopulateOptions {
    /// Languages to populate; `None` populates every language
    pub codes: Option<Vec<String>>,
    pub explicit: bool,
    /// Treat `codes` as the only populated languages of this store
    pub partial: bool,
}

impl PopulateOptions {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: Some(codes.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }

    #[must_use]
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }
}

enum ValueSource {
    File(PathBuf),
    Memory(Vec<Observation>),
}

pub struct FeatureStore {
    registry: CharacteristicRegistry,
    languages: AHashMap<String, LanguageRecord>,
    /// Registry codes in table order
    order: Vec<String>,
    /// External id -> registry codes, in table order
    external: AHashMap<String, Vec<String>>,
    values: ValueSource,
    key_mode: KeyMode,
    default_preferences: Option<Vec<String>>,
    partial: Option<AHashSet<String>>,
}

impl FeatureStore {
    /// Load the language table and the characteristic registry from a WALS
    /// CLDF export. The values table is only checked here; it is read when
    /// characteristics are populated.
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let registry = CharacteristicRegistry::load(data_dir)?;

        let mut table = Table::open(&data_dir.join(LANGUAGES_FILE))?;
        let idx_id = table.column("ID")?;
        let idx_iso = table.column("ISO639P3code")?;
        let headers: Vec<String> = table.headers().iter().map(|h| h.trim().to_string()).collect();

        let mut records = Vec::new();
        table.for_each_row(|row| {
            let mut record = LanguageRecord::new(cell(row, idx_id));
            let iso = cell(row, idx_iso);
            if !iso.is_empty() {
                record = record.with_external_id(iso);
            }
            for (i, header) in headers.iter().enumerate() {
                if i != idx_id && i != idx_iso {
                    record.fields.insert(header.clone(), cell(row, i).to_string());
                }
            }
            records.push(record);
            Ok(())
        })?;

        let values_path = data_dir.join(VALUES_FILE);
        let values = Table::open(&values_path)?;
        values.column("Language_ID")?;
        values.column("Parameter_ID")?;
        values.column("Code_ID")?;

        let store = Self::build(registry, records, ValueSource::File(values_path), data_dir)?;
        info!(
            "Loaded {} languages ({} external ids) and {} characteristics from {:?}",
            store.order.len(),
            store.external.len(),
            store.registry.len(),
            data_dir
        );
        Ok(store)
    }

    /// Build a store whose values table is held in memory
    pub fn from_memory(
        registry: CharacteristicRegistry,
        languages: Vec<LanguageRecord>,
        observations: Vec<Observation>,
    ) -> Result<Self> {
        Self::build(
            registry,
            languages,
            ValueSource::Memory(observations),
            Path::new(MEMORY_SOURCE),
        )
    }

    fn build(
        registry: CharacteristicRegistry,
        records: Vec<LanguageRecord>,
        values: ValueSource,
        origin: &Path,
    ) -> Result<Self> {
        let mut languages = AHashMap::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());
        let mut external: AHashMap<String, Vec<String>> = AHashMap::new();

        for record in records {
            if record.code.is_empty() {
                return Err(Error::data_load(origin, "language with empty ID"));
            }
            if languages.contains_key(&record.code) {
                return Err(Error::data_load(
                    origin,
                    format!("duplicate language ID '{}'", record.code),
                ));
            }
            // Some ISO codes are shared (WALS 'ger' and 'gti' are both 'deu'),
            // so every mapping is kept.
            for id in &record.external_ids {
                external.entry(id.clone()).or_default().push(record.code.clone());
            }
            order.push(record.code.clone());
            languages.insert(record.code.clone(), record);
        }

        Ok(Self {
            registry,
            languages,
            order,
            external,
            values,
            key_mode: KeyMode::default(),
            default_preferences: None,
            partial: None,
        })
    }

    /// Fill characteristic maps from the values table.
    ///
    /// When codes are given they also become the default preferences for
    /// [`resolve_external_id`](Self::resolve_external_id). An empty code list
    /// means every language. Nothing changes when the values table fails to
    /// load.
    pub fn populate_characteristics(&mut self, options: &PopulateOptions) -> Result<()> {
        let codes = options.codes.as_ref().filter(|codes| !codes.is_empty());
        if options.partial && codes.is_none() {
            return Err(Error::InvalidConfig(
                "partial population requires an explicit list of languages".to_string(),
            ));
        }

        let targets = match codes {
            Some(codes) => {
                for code in codes {
                    self.require(code)?;
                }
                codes.clone()
            }
            None => self.order.clone(),
        };

        let mode = if options.explicit { KeyMode::Explicit } else { KeyMode::Codes };
        let filled = self.read_characteristics(&targets, mode)?;

        if mode != self.key_mode {
            let keep: AHashSet<&str> = targets.iter().map(String::as_str).collect();
            let mut reset = 0usize;
            for record in self.languages.values_mut() {
                if record.is_populated() && !keep.contains(record.code.as_str()) {
                    record.clear_characteristics();
                    reset += 1;
                }
            }
            debug!("Key mode changed to {:?}; {} languages reset", mode, reset);
            self.key_mode = mode;
        }

        match codes {
            Some(codes) => {
                self.default_preferences = Some(codes.clone());
                if options.partial {
                    self.partial = Some(codes.iter().cloned().collect());
                }
            }
            None => self.partial = None,
        }

        self.commit(filled);
        info!(
            "Populated characteristics for {} languages (mode: {:?}, partial: {})",
            targets.len(),
            self.key_mode,
            self.partial.is_some()
        );
        Ok(())
    }

    /// Populate exactly the listed languages that are not populated yet, in
    /// one pass and with the store's current key mode.
    pub fn ensure_populated(&mut self, codes: &[&str]) -> Result<()> {
        let mut missing: Vec<String> = Vec::new();
        for code in codes {
            let record = self.require(code)?;
            if let Some(partial) = &self.partial {
                if !partial.contains(*code) {
                    return Err(Error::NotPopulated(code.to_string()));
                }
            }
            if !record.is_populated() && !missing.iter().any(|m| m == code) {
                missing.push(code.to_string());
            }
        }

        if missing.is_empty() {
            return Ok(());
        }
        debug!("Lazily populating {:?}", missing);
        let filled = self.read_characteristics(&missing, self.key_mode)?;
        self.commit(filled);
        Ok(())
    }

    /// Read the maps of `targets` without touching any record
    fn read_characteristics(
        &self,
        targets: &[String],
        mode: KeyMode,
    ) -> Result<AHashMap<String, BTreeMap<String, String>>> {
        let mut maps: AHashMap<String, BTreeMap<String, String>> = targets
            .iter()
            .map(|code| (code.clone(), BTreeMap::new()))
            .collect();

        self.visit_observations(|language, characteristic, value, origin| {
            let Some(map) = maps.get_mut(language) else {
                if !self.languages.contains_key(language) {
                    return Err(Error::data_load(
                        origin,
                        format!("value recorded for unknown language '{language}'"),
                    ));
                }
                return Ok(());
            };

            match mode {
                KeyMode::Codes => {
                    map.insert(characteristic.to_string(), value.to_string());
                }
                KeyMode::Explicit => {
                    let key = self.registry.characteristic(characteristic).ok_or_else(|| {
                        Error::data_load(origin, format!("unknown characteristic '{characteristic}'"))
                    })?;
                    let name = self.registry.value_name(value).ok_or_else(|| {
                        Error::data_load(origin, format!("unknown value code '{value}'"))
                    })?;
                    map.insert(key.name.clone(), name.to_string());
                }
            }
            Ok(())
        })?;

        Ok(maps)
    }

    fn commit(&mut self, filled: AHashMap<String, BTreeMap<String, String>>) {
        for (code, map) in filled {
            if let Some(record) = self.languages.get_mut(&code) {
                record.set_characteristics(map);
            }
        }
    }

    fn visit_observations<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&str, &str, &str, &Path) -> Result<()>,
    {
        match &self.values {
            ValueSource::File(path) => {
                let mut table = Table::open(path)?;
                let idx_lang = table.column("Language_ID")?;
                let idx_param = table.column("Parameter_ID")?;
                let idx_code = table.column("Code_ID")?;
                table.for_each_row(|row| {
                    visit(
                        cell(row, idx_lang),
                        cell(row, idx_param),
                        cell(row, idx_code),
                        path.as_path(),
                    )
                })
            }
            ValueSource::Memory(observations) => {
                let origin = Path::new(MEMORY_SOURCE);
                for obs in observations {
                    visit(&obs.language, &obs.characteristic, &obs.value, origin)?;
                }
                Ok(())
            }
        }
    }

    /// Resolve an external id to one registry code.
    ///
    /// Ambiguous ids are settled by `preferences`, then by the session
    /// default preferences, then by table order.
    pub fn resolve_external_id(&self, id: &str, preferences: Option<&[String]>) -> Result<&str> {
        let candidates = self
            .external
            .get(id)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::UnknownIdentifier(id.to_string()))?;

        if candidates.len() > 1 {
            for prefs in [preferences, self.default_preferences.as_deref()].into_iter().flatten() {
                if let Some(code) = prefs
                    .iter()
                    .find_map(|p| candidates.iter().find(|c| *c == p))
                {
                    return Ok(code.as_str());
                }
            }
        }

        Ok(candidates[0].as_str())
    }

    #[inline]
    #[must_use]
    pub fn verify_registry_code(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    #[inline]
    #[must_use]
    pub fn verify_external_id(&self, id: &str) -> bool {
        self.external.get(id).is_some_and(|c| !c.is_empty())
    }

    /// Every registry code an external id maps to
    pub fn registry_codes_for(&self, id: &str) -> &[String] {
        self.external.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn language(&self, code: &str) -> Option<&LanguageRecord> {
        self.languages.get(code)
    }

    pub fn require(&self, code: &str) -> Result<&LanguageRecord> {
        self.languages
            .get(code)
            .ok_or_else(|| Error::UnknownRegistryCode(code.to_string()))
    }

    /// Records in table order
    pub fn languages(&self) -> impl Iterator<Item = &LanguageRecord> {
        self.order.iter().filter_map(|code| self.languages.get(code))
    }

    #[inline]
    pub fn registry_codes(&self) -> &[String] {
        &self.order
    }

    #[inline]
    pub fn registry(&self) -> &CharacteristicRegistry {
        &self.registry
    }

    #[inline]
    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    #[inline]
    pub fn is_partial(&self) -> bool {
        self.partial.is_some()
    }

    pub fn partial_population(&self) -> Option<&AHashSet<String>> {
        self.partial.as_ref()
    }

    /// Whether a language may be scored under the current population state
    pub fn is_available(&self, code: &str) -> bool {
        self.verify_registry_code(code)
            && self.partial.as_ref().map_or(true, |p| p.contains(code))
    }

    pub fn default_preferences(&self) -> Option<&[String]> {
        self.default_preferences.as_deref()
    }

    pub fn set_default_preferences(&mut self, preferences: Option<Vec<String>>) {
        self.default_preferences = preferences;
    }

    pub fn populated_count(&self) -> usize {
        self.languages.values().filter(|l| l.is_populated()).count()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CODES_FILE, PARAMETERS_FILE};
    use std::fs;

    fn write_dataset(dir: &Path) {
        fs::write(
            dir.join(LANGUAGES_FILE),
            "ID,Name,Macroarea,ISO639P3code,Family\n\
             ger,German,Eurasia,deu,Indo-European\n\
             gti,German (Tirol),Eurasia,deu,Indo-European\n\
             dut,Dutch,Eurasia,nld,Indo-European\n\
             fin,Finnish,Eurasia,fin,Uralic\n\
             xyz,Unclassified,Papunesia,,\n",
        )
        .unwrap();
        fs::write(
            dir.join(PARAMETERS_FILE),
            "ID,Name,Description,Chapter_ID\n\
             1A,Consonant Inventories,,1\n\
             81A,Order of Subject Object and Verb,,81\n",
        )
        .unwrap();
        fs::write(
            dir.join(CODES_FILE),
            "ID,Parameter_ID,Name,Description\n\
             1A-1,1A,Small,\n\
             1A-3,1A,Average,\n\
             81A-1,81A,SOV,\n\
             81A-2,81A,SVO,\n",
        )
        .unwrap();
        fs::write(
            dir.join(VALUES_FILE),
            "ID,Language_ID,Parameter_ID,Value,Code_ID,Comment,Source\n\
             1A-ger,ger,1A,3,1A-3,,\n\
             81A-ger,ger,81A,1,81A-1,,\n\
             1A-dut,dut,1A,3,1A-3,,\n\
             81A-dut,dut,81A,1,81A-1,,\n\
             81A-fin,fin,81A,2,81A-2,,\n",
        )
        .unwrap();
    }

    fn load() -> (tempfile::TempDir, FeatureStore) {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        let store = FeatureStore::load(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_load_languages() {
        let (_dir, store) = load();
        assert_eq!(store.len(), 5);
        assert_eq!(store.registry_codes()[0], "ger");
        assert_eq!(store.language("dut").unwrap().name(), Some("Dutch"));
        assert_eq!(
            store.language("fin").unwrap().fields.get("Family").map(String::as_str),
            Some("Uralic")
        );
        assert_eq!(store.registry_codes_for("deu"), ["ger", "gti"]);
        assert!(!store.verify_external_id(""));
        assert!(store.language("xyz").unwrap().external_ids.is_empty());
    }

    #[test]
    fn test_verify_codes() {
        let (_dir, store) = load();
        assert!(store.verify_registry_code("ger"));
        assert!(!store.verify_registry_code("deu"));
        assert!(store.verify_external_id("deu"));
        assert!(!store.verify_external_id("ger"));
    }

    #[test]
    fn test_missing_values_file() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        fs::remove_file(dir.path().join(VALUES_FILE)).unwrap();
        assert!(matches!(
            FeatureStore::load(dir.path()),
            Err(Error::DataLoad { .. })
        ));
    }

    #[test]
    fn test_malformed_languages_table() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        fs::write(dir.path().join(LANGUAGES_FILE), "ID,Name\nger,German\n").unwrap();
        let Err(err) = FeatureStore::load(dir.path()) else {
            panic!("load should fail without an ISO639P3code column");
        };
        assert!(err.to_string().contains("ISO639P3code"));
    }

    #[test]
    fn test_populate_all_codes() {
        let (_dir, mut store) = load();
        store.populate_characteristics(&PopulateOptions::all()).unwrap();

        let ger = store.language("ger").unwrap();
        assert_eq!(ger.characteristic("81A"), Some("81A-1"));
        assert_eq!(ger.characteristics().unwrap().len(), 2);
        // documented in WALS but without any values
        assert!(store.language("gti").unwrap().characteristics().unwrap().is_empty());
        assert_eq!(store.populated_count(), 5);
        assert!(!store.is_partial());
    }

    #[test]
    fn test_populate_explicit() {
        let (_dir, mut store) = load();
        store
            .populate_characteristics(&PopulateOptions::all().explicit(true))
            .unwrap();
        let fin = store.language("fin").unwrap();
        assert_eq!(fin.characteristic("Order of Subject Object and Verb"), Some("SVO"));
        assert_eq!(store.key_mode(), KeyMode::Explicit);
    }

    #[test]
    fn test_populate_is_idempotent() {
        let (_dir, mut store) = load();
        let options = PopulateOptions::codes(["ger"]);
        store.populate_characteristics(&options).unwrap();
        let first = store.language("ger").unwrap().characteristics().cloned();
        store.populate_characteristics(&options).unwrap();
        let second = store.language("ger").unwrap().characteristics().cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn test_switching_mode_resets_others() {
        let (_dir, mut store) = load();
        store.populate_characteristics(&PopulateOptions::all()).unwrap();
        store
            .populate_characteristics(&PopulateOptions::codes(["dut"]).explicit(true))
            .unwrap();
        assert!(store.language("dut").unwrap().is_populated());
        assert!(!store.language("ger").unwrap().is_populated());

        // lazy population follows the explicit mode
        store.ensure_populated(&["ger"]).unwrap();
        assert_eq!(
            store.language("ger").unwrap().characteristic("Consonant Inventories"),
            Some("Average")
        );
    }

    #[test]
    fn test_partial_population() {
        let (_dir, mut store) = load();
        store
            .populate_characteristics(&PopulateOptions::codes(["ger", "dut"]).partial(true))
            .unwrap();
        assert!(store.is_partial());
        assert!(store.is_available("ger"));
        assert!(!store.is_available("fin"));
        assert!(store.ensure_populated(&["ger", "dut"]).is_ok());
        assert!(matches!(
            store.ensure_populated(&["ger", "fin"]),
            Err(Error::NotPopulated(code)) if code == "fin"
        ));
        assert!(!store.language("fin").unwrap().is_populated());
    }

    #[test]
    fn test_partial_requires_codes() {
        let (_dir, mut store) = load();
        assert!(matches!(
            store.populate_characteristics(&PopulateOptions::all().partial(true)),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_populate_unknown_code() {
        let (_dir, mut store) = load();
        assert!(matches!(
            store.populate_characteristics(&PopulateOptions::codes(["nope"])),
            Err(Error::UnknownRegistryCode(_))
        ));
    }

    #[test]
    fn test_ensure_populated_only_missing() {
        let (_dir, mut store) = load();
        store.ensure_populated(&["ger", "fin"]).unwrap();
        assert_eq!(store.populated_count(), 2);
        assert!(!store.language("dut").unwrap().is_populated());
    }

    #[test]
    fn test_resolve_external_id() {
        let (_dir, mut store) = load();
        assert_eq!(store.resolve_external_id("nld", None).unwrap(), "dut");
        // table order when nothing else decides
        assert_eq!(store.resolve_external_id("deu", None).unwrap(), "ger");

        let prefs = vec!["gti".to_string()];
        assert_eq!(store.resolve_external_id("deu", Some(&prefs)).unwrap(), "gti");

        // session default from populating with explicit codes
        store
            .populate_characteristics(&PopulateOptions::codes(["gti", "dut"]))
            .unwrap();
        assert_eq!(store.resolve_external_id("deu", None).unwrap(), "gti");

        // supplied preferences win over the session default
        let prefs = vec!["ger".to_string()];
        assert_eq!(store.resolve_external_id("deu", Some(&prefs)).unwrap(), "ger");

        assert!(matches!(
            store.resolve_external_id("zzz", None),
            Err(Error::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn test_values_for_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path());
        fs::write(
            dir.path().join(VALUES_FILE),
            "ID,Language_ID,Parameter_ID,Value,Code_ID\n1A-qqq,qqq,1A,1,1A-1\n",
        )
        .unwrap();
        let mut store = FeatureStore::load(dir.path()).unwrap();
        assert!(matches!(
            store.populate_characteristics(&PopulateOptions::all()),
            Err(Error::DataLoad { .. })
        ));
    }

    #[test]
    fn test_from_memory() {
        let mut registry = CharacteristicRegistry::new();
        registry.insert_characteristic("1A", "Consonants", None);
        assert!(registry.insert_value("1A-1", "1A", "Small"));

        let languages = vec![
            LanguageRecord::new("aaa").with_external_id("abc"),
            LanguageRecord::new("bbb").with_external_id("abc"),
        ];
        let observations = vec![Observation::new("aaa", "1A", "1A-1")];
        let mut store = FeatureStore::from_memory(registry, languages, observations).unwrap();

        store.ensure_populated(&["aaa", "bbb"]).unwrap();
        assert_eq!(store.language("aaa").unwrap().characteristic("1A"), Some("1A-1"));
        assert_eq!(store.registry_codes_for("abc").len(), 2);
    }

    #[test]
    fn test_from_memory_duplicate_code() {
        let languages = vec![LanguageRecord::new("aaa"), LanguageRecord::new("aaa")];
        assert!(matches!(
            FeatureStore::from_memory(CharacteristicRegistry::new(), languages, Vec::new()),
            Err(Error::DataLoad { .. })
        ));
    }

    #[test]
    fn test_failed_populate_leaves_store_unchanged() {
        let languages = vec![
            LanguageRecord::new("aaa").with_external_id("xx"),
            LanguageRecord::new("bbb").with_external_id("xx"),
        ];
        let observations = vec![
            Observation::new("aaa", "1A", "1A-1"),
            Observation::new("qqq", "1A", "1A-1"),
        ];
        let mut store =
            FeatureStore::from_memory(CharacteristicRegistry::new(), languages, observations).unwrap();
        assert_eq!(store.resolve_external_id("xx", None).unwrap(), "aaa");

        let options = PopulateOptions::codes(["bbb"]).partial(true).explicit(true);
        assert!(matches!(
            store.populate_characteristics(&options),
            Err(Error::DataLoad { .. })
        ));
        assert!(!store.is_partial());
        assert_eq!(store.key_mode(), KeyMode::Codes);
        assert!(store.default_preferences().is_none());
        assert_eq!(store.resolve_external_id("xx", None).unwrap(), "aaa");
        assert_eq!(store.populated_count(), 0);
    }

    #[test]
    fn test_empty_code_list_means_all() {
        let (_dir, mut store) = load();
        store
            .populate_characteristics(&PopulateOptions::codes(Vec::<String>::new()))
            .unwrap();
        assert_eq!(store.populated_count(), 5);
        assert!(store.default_preferences().is_none());

        assert!(matches!(
            store.populate_characteristics(&PopulateOptions::codes(Vec::<String>::new()).partial(true)),
            Err(Error::InvalidConfig(_))
        ));
        assert!(!store.is_partial());
    }

    #[test]
    fn test_set_default_preferences() {
        let (_dir, mut store) = load();
        store.set_default_preferences(Some(vec!["gti".to_string()]));
        assert_eq!(store.default_preferences(), Some(&["gti".to_string()][..]));
        assert_eq!(store.resolve_external_id("deu", None).unwrap(), "gti");

        store.set_default_preferences(None);
        assert_eq!(store.resolve_external_id("deu", None).unwrap(), "ger");
    }
}

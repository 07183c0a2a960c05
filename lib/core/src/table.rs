// CSV access by header name for the WALS source tables
use crate::{Error, Result};
use csv::{Reader, StringRecord};
use std::fs::File;
use std::path::{Path, PathBuf};

pub(crate) struct Table {
    path: PathBuf,
    reader: Reader<File>,
    headers: StringRecord,
}

impl Table {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::data_load(path, "file not found"));
        }

        let mut reader = csv::ReaderBuilder::new()
            .from_path(path)
            .map_err(|e| Error::data_load(path, e))?;
        let headers = reader
            .headers()
            .map_err(|e| Error::data_load(path, format!("failed to read headers: {e}")))?
            .clone();

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
        })
    }

    pub(crate) fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub(crate) fn column(&self, name: &str) -> Result<usize> {
        self.optional_column(name)
            .ok_or_else(|| Error::data_load(&self.path, format!("missing column '{name}'")))
    }

    pub(crate) fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Visit every data row in file order; stops at the first malformed row.
    pub(crate) fn for_each_row<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&StringRecord) -> Result<()>,
    {
        let mut record = StringRecord::new();
        loop {
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|e| Error::data_load(&self.path, e))?;
            if !more {
                return Ok(());
            }
            visit(&record)?;
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

#[inline]
pub(crate) fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

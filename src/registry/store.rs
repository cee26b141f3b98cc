//! Document Store
//!
//! A named bucket of uploaded file names. Stores carry no sizes of their own;
//! the registry derives used disk from the file count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named collection of uploaded documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    name: String,
    files: Vec<String>,
    created_at: DateTime<Utc>,
}

impl Store {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            files: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File names in upload order, duplicates included
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn append<I, S>(&mut self, file_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(file_names.into_iter().map(Into::into));
    }

    pub(crate) fn clear(&mut self) {
        self.files.clear();
    }
}

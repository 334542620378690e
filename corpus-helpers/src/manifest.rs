// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The corpus manifest, `corpus.json`.
//!
//! ```json
//! {
//!   "collections": {
//!     "GO": { "languages": ["en", "ja"], "files": ["text"], ... },
//!     ...
//!   },
//!   ...
//! }
//! ```
//!
//! Only `languages` and `files` are interpreted; everything else is
//! carried along untouched for the web app.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CorpusError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionFiles {
    pub languages: Vec<String>,
    pub files: Vec<String>,
}

/// One text file listed by the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub collection: String,
    pub language: String,
    pub file: String,
}

impl ManifestEntry {
    fn file_name(&self) -> String {
        format!("{}_{}.txt", self.language, self.file)
    }

    /// Path of the plain text file below the corpus text root.
    pub fn text_path(&self, text_root: &Path) -> PathBuf {
        text_root.join(&self.collection).join(self.file_name())
    }

    /// Path of the compressed file below the compressed corpus root.
    pub fn gzip_path(&self, gzip_root: &Path) -> PathBuf {
        compressed_path(gzip_root, &self.collection, &self.file_name())
    }

    /// `/`-separated path of the compressed file relative to the public
    /// directory, as the web app requests it.
    pub fn public_url(&self) -> String {
        format!("corpus/{}/{}.gz", self.collection, self.file_name())
    }
}

fn compressed_path(gzip_root: &Path, collection: &str, file_name: &str) -> PathBuf {
    gzip_root.join(collection).join(format!("{file_name}.gz"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    raw: Value,
    collections: Vec<(String, CollectionFiles)>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| CorpusError::io(path, err))?;
        let raw = serde_json::from_str(&content).map_err(|err| CorpusError::json(path, err))?;
        Manifest::from_value(raw, path)
    }

    /// Interprets an already parsed manifest; `path` is used in errors.
    pub fn from_value(raw: Value, path: &Path) -> Result<Self> {
        let collections = raw
            .get("collections")
            .and_then(Value::as_object)
            .ok_or_else(|| CorpusError::malformed(path, "expected a `collections` object"))?
            .iter()
            .map(|(key, collection)| {
                let files = CollectionFiles::deserialize(collection)
                    .map_err(|err| CorpusError::json(path, err))?;
                Ok((key.clone(), files))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Manifest { raw, collections })
    }

    /// The manifest exactly as parsed.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Every listed file, ordered by collection, then language, then file.
    pub fn entries(&self) -> Vec<ManifestEntry> {
        let mut entries = Vec::new();
        for (collection, files) in &self.collections {
            for language in &files.languages {
                for file in &files.files {
                    entries.push(ManifestEntry {
                        collection: collection.clone(),
                        language: language.clone(),
                        file: file.clone(),
                    });
                }
            }
        }
        entries
    }
}

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

//! In-memory aggregation of dump entries across languages.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use log::{debug, info};

use crate::error::{CorpusError, Result};
use crate::id::IdScheme;
use crate::repair::repair_number_branches;
use crate::source::{Dump, DumpSource};

/// One localized string in every language it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    /// Translations in language discovery order.
    translations: Vec<(String, String)>,
}

impl Record {
    /// Returns the text for `language`, if this record has one.
    pub fn text(&self, language: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|(known, _)| known == language)
            .map(|(_, text)| text.as_str())
    }

    fn set_text(&mut self, language: &str, text: String) {
        match self
            .translations
            .iter_mut()
            .find(|(known, _)| known == language)
        {
            Some((_, existing)) => {
                debug!("Overwriting {} text of {}", language, self.id);
                *existing = text;
            }
            None => self.translations.push((language.to_string(), text)),
        }
    }
}

/// The records of one source table or in-dump file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileGroup {
    records: Vec<Record>,
    by_id: HashMap<String, usize>,
}

impl FileGroup {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    fn sort_by_id(&mut self) {
        self.records.sort_by(|a, b| a.id.cmp(&b.id));
        self.by_id = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.id.clone(), idx))
            .collect();
    }
}

/// Every record of one output corpus, grouped by file group.
///
/// Groups iterate in lexicographic order; records keep the order in
/// which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    groups: BTreeMap<String, FileGroup>,
    languages: Vec<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Corpus::default()
    }

    /// Languages in the order they were discovered.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &FileGroup)> {
        self.groups
            .iter()
            .map(|(name, group)| (name.as_str(), group))
    }

    pub fn group(&self, name: &str) -> Option<&FileGroup> {
        self.groups.get(name)
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.groups.values().map(|group| group.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_language(&mut self, language: &str) {
        if !self.languages.iter().any(|known| known == language) {
            self.languages.push(language.to_string());
        }
    }

    pub fn add_group(&mut self, group: &str) {
        if !self.groups.contains_key(group) {
            self.groups.insert(group.to_string(), FileGroup::default());
        }
    }

    /// Stores `text` as the `language` translation of the record `id`.
    ///
    /// A second text for the same record and language replaces the first.
    pub fn insert(&mut self, group: &str, id: String, language: &str, text: String) {
        self.add_language(language);
        let file_group = self.groups.entry(group.to_string()).or_default();
        match file_group.by_id.get(&id).copied() {
            Some(idx) => file_group.records[idx].set_text(language, text),
            None => {
                file_group.by_id.insert(id.clone(), file_group.records.len());
                file_group.records.push(Record {
                    id,
                    translations: vec![(language.to_string(), text)],
                });
            }
        }
    }

    /// Adds every entry of `dump`, deriving IDs with `scheme`.
    ///
    /// Within one dump, two different keys of a group resolving to the
    /// same ID are a [`CorpusError::DuplicateId`]. Across dumps such keys
    /// name the same string in different languages and are merged.
    pub fn add_dump(&mut self, dump: Dump, scheme: &IdScheme, repair: bool) -> Result<()> {
        self.add_language(&dump.language);
        for group in &dump.groups {
            self.add_group(group);
        }
        let mut keys_by_id = HashMap::<(String, String), String>::new();
        for entry in dump.entries {
            let id = scheme.canonical_id(&entry.group, &entry.key)?;
            let known = keys_by_id
                .entry((entry.group.clone(), id.clone()))
                .or_insert_with(|| entry.key.clone());
            if *known != entry.key {
                return Err(CorpusError::DuplicateId {
                    key: entry.key,
                    reason: format!("{id} is already used by {known:?}"),
                });
            }
            let text = if repair {
                repair_number_branches(&entry.text).into_owned()
            } else {
                entry.text
            };
            self.insert(&entry.group, id, &dump.language, text);
        }
        Ok(())
    }

    /// Orders the records of every group by ID instead of discovery order.
    pub fn sort_records(&mut self) {
        for group in self.groups.values_mut() {
            group.sort_by_id();
        }
    }
}

/// Reads every file in `files` and aggregates it into one corpus.
///
/// Nothing is written here: a malformed file anywhere aborts before any
/// output exists.
pub fn aggregate(
    source: &dyn DumpSource,
    files: &[PathBuf],
    scheme: &IdScheme,
    repair: bool,
) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    for path in files {
        let dump = source.read(path)?;
        debug!(
            "Loaded {} ({} entries, language {})",
            path.display(),
            dump.entries.len(),
            dump.language
        );
        corpus.add_dump(dump, scheme, repair)?;
    }
    info!(
        "Loaded {} files: {} strings in {} languages",
        files.len(),
        corpus.len(),
        corpus.languages().len()
    );
    Ok(corpus)
}

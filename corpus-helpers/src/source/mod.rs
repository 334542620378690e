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

//! Readers for localization dumps.
//!
//! Two dump shapes are supported: JSON tables ([`keyed::KeyedTableSource`])
//! and MSBT text exports ([`block::BlockSource`]). Both turn one file into
//! a [`Dump`]: the language of the file plus the entries it contains.

pub mod block;
pub mod keyed;

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{CorpusError, Result};

/// One string as found in a dump file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry {
    /// File group the string belongs to. Empty for ungrouped collections.
    pub group: String,
    pub key: String,
    pub text: String,
}

/// The contents of one dump file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dump {
    /// Language code as spelled by the source, e.g. `usa` or `zh-TW`.
    pub language: String,
    /// Every group seen in the file, in order, including empty ones.
    pub groups: Vec<String>,
    pub entries: Vec<DumpEntry>,
}

impl Dump {
    pub fn new(language: &str) -> Self {
        Dump {
            language: language.to_string(),
            ..Dump::default()
        }
    }

    /// Records `group`, keeping the first-seen order.
    pub fn add_group(&mut self, group: &str) {
        if !self.groups.iter().any(|known| known == group) {
            self.groups.push(group.to_string());
        }
    }

    pub fn push(&mut self, group: &str, key: &str, text: &str) {
        self.add_group(group);
        self.entries.push(DumpEntry {
            group: group.to_string(),
            key: key.to_string(),
            text: text.to_string(),
        });
    }
}

/// A kind of localization dump.
pub trait DumpSource {
    /// Returns every dump file of this kind below `root`, sorted by path.
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Reads one dump file.
    fn read(&self, path: &Path) -> Result<Dump>;
}

/// How deep below the root dump files live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Exactly this many directory levels, `1` meaning directly in the root.
    Exactly(usize),
    Any,
}

/// Lists the files below `root` whose name matches `pattern`.
///
/// A missing root yields no files.
pub fn discover_files(root: &Path, depth: Depth, pattern: &Regex) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        log::warn!("Dump directory {} does not exist", root.display());
        return Ok(Vec::new());
    }
    let walker = match depth {
        Depth::Exactly(levels) => WalkDir::new(root).min_depth(levels).max_depth(levels),
        Depth::Any => WalkDir::new(root).min_depth(1),
    };

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            CorpusError::Io {
                source: err.into(),
                path,
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.is_match(name))
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Returns the file name of `path`, which must be valid UTF-8.
pub(crate) fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CorpusError::malformed(path, "file name is not valid UTF-8"))
}

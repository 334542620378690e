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

//! JSON string tables, one file per table and language.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{discover_files, file_name, Depth, Dump, DumpSource};
use crate::error::{CorpusError, Result};

/// Layout of the JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// `{"key": "text", ...}`
    Object,
    /// `{"data": ["key", "text", "key", "text", ...]}`
    AlternatingData,
}

/// Reads JSON tables whose file name encodes the language and,
/// optionally, the group.
///
/// The file name pattern must have a `lang` capture group and may have a
/// `group` capture group. Without one, entries are ungrouped.
#[derive(Debug, Clone)]
pub struct KeyedTableSource {
    name_pattern: Regex,
    shape: TableShape,
    depth: Depth,
}

impl KeyedTableSource {
    pub fn new(name_pattern: Regex, shape: TableShape, depth: Depth) -> Self {
        KeyedTableSource {
            name_pattern,
            shape,
            depth,
        }
    }

    pub fn parse(&self, path: &Path, content: &str) -> Result<Dump> {
        let name = file_name(path)?;
        let captures = self.name_pattern.captures(name).ok_or_else(|| {
            CorpusError::malformed(
                path,
                format!("file name does not match {}", self.name_pattern.as_str()),
            )
        })?;
        let language = captures
            .name("lang")
            .ok_or_else(|| CorpusError::malformed(path, "no language in file name"))?
            .as_str();
        let group = captures.name("group").map_or("", |group| group.as_str());

        let body: Value =
            serde_json::from_str(content).map_err(|err| CorpusError::json(path, err))?;
        let mut dump = Dump::new(language);
        dump.add_group(group);
        match self.shape {
            TableShape::Object => {
                let Value::Object(table) = body else {
                    return Err(CorpusError::malformed(path, "expected a JSON object"));
                };
                for (key, text) in &table {
                    let text = text.as_str().ok_or_else(|| {
                        CorpusError::malformed(path, format!("value of {key:?} is not a string"))
                    })?;
                    dump.push(group, key, text);
                }
            }
            TableShape::AlternatingData => {
                let data = body
                    .get("data")
                    .and_then(Value::as_array)
                    .ok_or_else(|| CorpusError::malformed(path, "expected a `data` array"))?;
                if data.len() % 2 != 0 {
                    return Err(CorpusError::malformed(
                        path,
                        format!("`data` has an odd number of items ({})", data.len()),
                    ));
                }
                for (idx, pair) in data.chunks_exact(2).enumerate() {
                    let (Some(key), Some(text)) = (pair[0].as_str(), pair[1].as_str()) else {
                        return Err(CorpusError::malformed(
                            path,
                            format!("`data` pair {idx} is not two strings"),
                        ));
                    };
                    dump.push(group, key, text);
                }
            }
        }
        Ok(dump)
    }
}

fn json_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.json$").expect("well-formed regex"))
}

impl DumpSource for KeyedTableSource {
    /// Every `.json` file at the configured depth. Files whose name does
    /// not match the naming pattern are rejected when read.
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        discover_files(root, self.depth, json_file_regex())
    }

    fn read(&self, path: &Path) -> Result<Dump> {
        let content = fs::read_to_string(path).map_err(|err| CorpusError::io(path, err))?;
        self.parse(path, &content)
    }
}

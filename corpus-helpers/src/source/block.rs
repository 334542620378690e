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

//! MSBT text exports.
//!
//! Each language is one `msbt_{lang}_lf.txt` file made of blocks:
//!
//! ```text
//! Text File : monsname_usa.msbt
//! MONSNAME_001	Bulbasaur
//! MONSNAME_002	Ivysaur
//! Text File : wazaname_usa.msbt
//! ...
//! ```
//!
//! Lines with a tab are entries of the current block; everything else
//! that is not a block header is ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use super::{discover_files, file_name, Depth, Dump, DumpSource};
use crate::error::{CorpusError, Result};

pub const HEADER_PREFIX: &str = "Text File : ";

fn dump_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^msbt_(?<lang>.+)_lf\.txt$").expect("well-formed regex"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockSource;

impl BlockSource {
    /// Parses `content` as the dump file at `path`. Only the file name of
    /// `path` is used.
    pub fn parse(&self, path: &Path, content: &str) -> Result<Dump> {
        let name = file_name(path)?;
        let language = dump_name_regex()
            .captures(name)
            .map(|captures| captures["lang"].to_string())
            .ok_or_else(|| CorpusError::malformed(path, "expected msbt_{lang}_lf.txt"))?;
        let suffix = format!("_{language}.msbt");

        let mut dump = Dump::new(&language);
        let mut group: Option<&str> = None;
        for (idx, line) in content.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if let Some(header) = line
                .strip_prefix(HEADER_PREFIX)
                .and_then(|rest| rest.strip_suffix(&suffix))
            {
                dump.add_group(header);
                group = Some(header);
            } else if let Some((key, text)) = line.split_once('\t') {
                let Some(group) = group else {
                    return Err(CorpusError::malformed(
                        path,
                        format!("line {}: entry before any block header", idx + 1),
                    ));
                };
                dump.push(group, key, text);
            }
        }
        Ok(dump)
    }
}

impl DumpSource for BlockSource {
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        discover_files(root, Depth::Any, dump_name_regex())
    }

    fn read(&self, path: &Path) -> Result<Dump> {
        let content = fs::read_to_string(path).map_err(|err| CorpusError::io(path, err))?;
        self.parse(path, &content)
    }
}

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

//! The mirrored text collections and the pipeline that rebuilds them.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use regex::Regex;

use crate::corpus::aggregate;
use crate::error::{CorpusError, Result};
use crate::freshness::{self, Freshness};
use crate::id::IdScheme;
use crate::languages::LanguageMap;
use crate::source::block::BlockSource;
use crate::source::keyed::{KeyedTableSource, TableShape};
use crate::source::{Depth, DumpSource};
use crate::writer::{write_corpus, WriterOptions};

/// One output corpus: a set of dump directories merged into one
/// `qid_{name}.txt` plus one file per language.
pub struct CorpusSpec {
    /// Directories below the repository root holding the dumps.
    pub input_dirs: Vec<PathBuf>,
    pub source: Box<dyn DumpSource>,
    pub ids: IdScheme,
    pub languages: LanguageMap,
    pub writer: WriterOptions,
    /// Whether number branches in the text are repaired.
    pub repair: bool,
    /// Whether records are written sorted by ID rather than in
    /// discovery order.
    pub sort_records: bool,
}

impl CorpusSpec {
    pub fn discover(&self, repo: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for dir in &self.input_dirs {
            files.extend(self.source.discover(&repo.join(dir))?);
        }
        Ok(files)
    }

    /// Output files of an earlier run that are still on disk.
    fn existing_outputs(&self, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let suffix = format!("_{}.txt", self.writer.corpus_name);
        let entries = match fs::read_dir(out_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(CorpusError::io(out_dir, err)),
        };
        let mut outputs = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| CorpusError::io(out_dir, err))?.path();
            if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(&suffix))
            {
                outputs.push(path);
            }
        }
        Ok(outputs)
    }
}

/// An upstream text repository and the corpora built from it.
pub struct Collection {
    /// Name used in log messages and on the command line.
    pub name: &'static str,
    pub repo_url: &'static str,
    /// Directory name of the local mirror.
    pub repo_dir: &'static str,
    /// Directory name below the corpus root.
    pub output_dir: &'static str,
    pub corpora: Vec<CorpusSpec>,
}

/// What a pipeline run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Outputs were newer than every dump; nothing was written.
    UpToDate,
    /// Paths of the files written.
    Written(Vec<PathBuf>),
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("well-formed regex")
}

impl Collection {
    /// Pokémon GO text: flat `{"data": [key, text, ...]}` tables per
    /// language under `Release/` and `Remote/`.
    pub fn go() -> Self {
        let source = KeyedTableSource::new(
            regex(r"^(?<lang>.+)_raw\.json$"),
            TableShape::AlternatingData,
            Depth::Exactly(2),
        );
        Collection {
            name: "GO",
            repo_url: "https://github.com/sora10pls/holoholo-text.git",
            repo_dir: "holoholo-text",
            output_dir: "GO",
            corpora: vec![CorpusSpec {
                input_dirs: vec!["Release".into(), "Remote".into()],
                source: Box::new(source),
                ids: IdScheme::flat("go").escaping_keys(),
                languages: LanguageMap::Go,
                writer: WriterOptions {
                    corpus_name: "text".into(),
                    group_banners: false,
                    escape_text: true,
                },
                repair: false,
                sort_records: true,
            }],
        }
    }

    /// Pokémon HOME text: MSBT text exports, one file per language.
    pub fn home() -> Self {
        Collection {
            name: "HOME",
            repo_url: "https://github.com/sora10pls/megaturtle-text.git",
            repo_dir: "megaturtle-text",
            output_dir: "HOME",
            corpora: vec![CorpusSpec {
                input_dirs: vec![PathBuf::new()],
                source: Box::new(BlockSource),
                ids: IdScheme::grouped("home", Some("sp")),
                languages: LanguageMap::Home,
                writer: WriterOptions {
                    corpus_name: "megaturtle_sp".into(),
                    group_banners: true,
                    escape_text: false,
                },
                repair: true,
                sort_records: false,
            }],
        }
    }

    /// Pokémon Masters text: `{group}_{lang}.json` tables in three
    /// folders, each written as its own corpus.
    pub fn masters() -> Self {
        let corpora = ["Messages", "Messages/talk", "Messages/ui"]
            .into_iter()
            .map(|dir| {
                let folder = Path::new(dir)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(dir)
                    .to_lowercase();
                let prefix = (folder != "messages").then_some(folder.as_str());
                CorpusSpec {
                    input_dirs: vec![dir.into()],
                    source: Box::new(KeyedTableSource::new(
                        regex(r"^(?<group>.+)_(?<lang>[^_]+?)\.json$"),
                        TableShape::Object,
                        Depth::Exactly(1),
                    )),
                    ids: IdScheme::grouped("masters", prefix).for_json_keys(),
                    languages: LanguageMap::Masters,
                    writer: WriterOptions {
                        corpus_name: folder.clone(),
                        group_banners: true,
                        escape_text: true,
                    },
                    repair: false,
                    sort_records: false,
                }
            })
            .collect();
        Collection {
            name: "Masters",
            repo_url: "https://github.com/abcboy101/masters-text.git",
            repo_dir: "masters-text",
            output_dir: "Masters",
            corpora,
        }
    }

    /// Rebuilds every corpus of this collection from the mirror at `repo`
    /// into `out_dir`.
    ///
    /// Unless `force` is set, nothing happens when the outputs are newer
    /// than every dump. Each corpus is fully read before any of its files
    /// are written.
    pub fn build(&self, repo: &Path, out_dir: &Path, force: bool) -> Result<Outcome> {
        let mut inputs = Vec::with_capacity(self.corpora.len());
        for spec in &self.corpora {
            inputs.push(spec.discover(repo)?);
        }

        if !force {
            let mut outputs = Vec::new();
            for spec in &self.corpora {
                outputs.extend(spec.existing_outputs(out_dir)?);
            }
            let all_inputs = inputs.iter().flatten().collect::<Vec<_>>();
            if freshness::check(&all_inputs, &outputs)? == Freshness::Fresh {
                info!("No changes found for {}", self.name);
                return Ok(Outcome::UpToDate);
            }
        }

        let mut written = Vec::new();
        for (spec, files) in self.corpora.iter().zip(&inputs) {
            info!(
                "Loading {} files for {}/{}...",
                files.len(),
                self.name,
                spec.writer.corpus_name
            );
            let mut corpus = aggregate(spec.source.as_ref(), files, &spec.ids, spec.repair)?;
            if spec.sort_records {
                corpus.sort_records();
            }
            info!("Writing files for {}/{}...", self.name, spec.writer.corpus_name);
            written.extend(write_corpus(corpus, out_dir, spec.languages, &spec.writer)?);
        }
        Ok(Outcome::Written(written))
    }
}

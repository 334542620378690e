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

//! Writes a [`Corpus`] as parallel line-oriented text files.
//!
//! Line `n` of `qid_{name}.txt` holds a canonical ID and line `n` of
//! every `{language}_{name}.txt` holds that string's text in the
//! language, or [`SENTINEL`] if it has none.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::corpus::Corpus;
use crate::error::{CorpusError, Result};
use crate::escape::escape_line;
use crate::languages::LanguageMap;

/// Written in place of a missing translation.
pub const SENTINEL: &str = "[NULL]";

const BANNER_RULE: &str = "~~~~~~~~~~~~~~~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Suffix of every output file name.
    pub corpus_name: String,
    /// Whether each group is introduced by a `Text File : {group}` banner.
    pub group_banners: bool,
    /// Whether texts are escaped with [`escape_line`].
    pub escape_text: bool,
}

/// Returns the banner written before the records of `group`.
pub fn group_banner(group: &str) -> String {
    format!("{BANNER_RULE}\nText File : {group}\n{BANNER_RULE}\n")
}

/// Path of the ID index for `corpus_name`.
pub fn index_path(out_dir: &Path, corpus_name: &str) -> PathBuf {
    out_dir.join(format!("qid_{corpus_name}.txt"))
}

/// Path of the `language` file for `corpus_name`.
pub fn language_path(out_dir: &Path, language: &str, corpus_name: &str) -> PathBuf {
    out_dir.join(format!("{language}_{corpus_name}.txt"))
}

/// A buffered output file that remembers its path for error messages.
///
/// Dropping it closes the file; [`OutputFile::finish`] additionally
/// reports flush errors.
struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl OutputFile {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path).map_err(|err| CorpusError::io(&path, err))?;
        Ok(OutputFile {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|err| CorpusError::io(&self.path, err))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_str(line)?;
        self.write_str("\n")
    }

    fn finish(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .map_err(|err| CorpusError::io(&self.path, err))?;
        Ok(self.path)
    }
}

/// Writes `corpus` to `out_dir` and returns the paths written, the ID
/// index first.
pub fn write_corpus(
    corpus: Corpus,
    out_dir: &Path,
    languages: LanguageMap,
    options: &WriterOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|err| CorpusError::io(out_dir, err))?;

    let mut language_files = corpus
        .languages()
        .iter()
        .map(|language| {
            let code = languages.convert(language)?;
            OutputFile::create(language_path(out_dir, &code, &options.corpus_name))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut index = OutputFile::create(index_path(out_dir, &options.corpus_name))?;

    for (group_name, group) in corpus.groups() {
        if options.group_banners {
            let banner = group_banner(group_name);
            index.write_str(&banner)?;
            for file in &mut language_files {
                file.write_str(&banner)?;
            }
        }
        for record in group.records() {
            index.write_line(&record.id)?;
            for (language, file) in corpus.languages().iter().zip(&mut language_files) {
                let text = record.text(language).unwrap_or(SENTINEL);
                let text = if options.escape_text {
                    escape_line(text)
                } else {
                    Cow::Borrowed(text)
                };
                file.write_line(&text)?;
            }
        }
    }

    let mut written = vec![index.finish()?];
    for file in language_files {
        written.push(file.finish()?);
    }
    info!(
        "Wrote {} records to {} files for {}",
        corpus.len(),
        written.len(),
        options.corpus_name
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::unescape_line;
    use crate::id::IdScheme;
    use crate::source::Dump;
    use pretty_assertions::assert_eq;

    fn dump(language: &str, group: &str, entries: &[(&str, &str)]) -> Dump {
        let mut dump = Dump::new(language);
        dump.add_group(group);
        for (key, text) in entries {
            dump.push(group, key, text);
        }
        dump
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_missing_translations_get_sentinel() -> anyhow::Result<()> {
        let scheme = IdScheme::grouped("masters", None).for_json_keys();
        let mut corpus = Corpus::new();
        corpus.add_dump(dump("en", "g", &[("A", "a"), ("B", "b")]), &scheme, false)?;
        corpus.add_dump(dump("zh-TW", "g", &[("A", "甲"), ("C", "丙")]), &scheme, false)?;
        let tmp_dir = tempfile::tempdir()?;
        let options = WriterOptions {
            corpus_name: "messages".into(),
            group_banners: true,
            escape_text: true,
        };

        let written = write_corpus(corpus, tmp_dir.path(), LanguageMap::Masters, &options)?;

        assert_eq!(
            written,
            vec![
                tmp_dir.path().join("qid_messages.txt"),
                tmp_dir.path().join("en_messages.txt"),
                tmp_dir.path().join("zh-Hant_messages.txt"),
            ]
        );
        let banner = "~~~~~~~~~~~~~~~\nText File : g\n~~~~~~~~~~~~~~~\n";
        assert_eq!(
            read(&written[0]),
            format!("{banner}masters.g.A\nmasters.g.B\nmasters.g.C\n")
        );
        assert_eq!(read(&written[1]), format!("{banner}a\nb\n[NULL]\n"));
        assert_eq!(read(&written[2]), format!("{banner}甲\n[NULL]\n丙\n"));
        Ok(())
    }

    #[test]
    fn test_lines_align_with_index() -> anyhow::Result<()> {
        let scheme = IdScheme::grouped("masters", None).for_json_keys();
        let mut corpus = Corpus::new();
        corpus.add_dump(
            dump("en", "b", &[("x", "two\nlines"), ("y", "back\\slash")]),
            &scheme,
            false,
        )?;
        corpus.add_dump(dump("en", "a", &[("z", "first")]), &scheme, false)?;
        corpus.add_dump(dump("fr", "a", &[("z", "premier")]), &scheme, false)?;
        let expected = corpus.clone();
        let tmp_dir = tempfile::tempdir()?;
        let options = WriterOptions {
            corpus_name: "ui".into(),
            group_banners: false,
            escape_text: true,
        };

        let written = write_corpus(corpus, tmp_dir.path(), LanguageMap::Masters, &options)?;

        let ids = read(&written[0]);
        let ids = ids.lines().collect::<Vec<_>>();
        assert_eq!(ids, ["masters.a.z", "masters.b.x", "masters.b.y"]);
        for (language, path) in expected.languages().iter().zip(&written[1..]) {
            let content = read(path);
            let lines = content.lines().collect::<Vec<_>>();
            assert_eq!(lines.len(), ids.len());
            let records = expected.groups().flat_map(|(_, group)| group.records());
            for (line, record) in lines.iter().zip(records) {
                let text = record.text(language).unwrap_or(SENTINEL);
                assert_eq!(unescape_line(line), text);
            }
        }
        Ok(())
    }

    #[test]
    fn test_unescaped_output() -> anyhow::Result<()> {
        let scheme = IdScheme::grouped("home", Some("sp"));
        let mut corpus = Corpus::new();
        corpus.add_dump(dump("usa", "g", &[("A", r"Line\nbreak")]), &scheme, false)?;
        let tmp_dir = tempfile::tempdir()?;
        let options = WriterOptions {
            corpus_name: "megaturtle_sp".into(),
            group_banners: true,
            escape_text: false,
        };

        let written = write_corpus(corpus, tmp_dir.path(), LanguageMap::Home, &options)?;

        assert_eq!(written[1], tmp_dir.path().join("en_megaturtle_sp.txt"));
        assert!(read(&written[1]).ends_with("Line\\nbreak\n"));
        Ok(())
    }

    #[test]
    fn test_unknown_language_fails_before_writing_index() -> anyhow::Result<()> {
        let scheme = IdScheme::grouped("home", Some("sp"));
        let mut corpus = Corpus::new();
        corpus.add_dump(dump("xyz", "g", &[("A", "a")]), &scheme, false)?;
        let tmp_dir = tempfile::tempdir()?;
        let options = WriterOptions {
            corpus_name: "megaturtle_sp".into(),
            group_banners: true,
            escape_text: false,
        };

        let result = write_corpus(corpus, tmp_dir.path(), LanguageMap::Home, &options);

        assert!(matches!(result, Err(CorpusError::UnknownLanguage(_))));
        assert!(!index_path(tmp_dir.path(), "megaturtle_sp").exists());
        Ok(())
    }
}

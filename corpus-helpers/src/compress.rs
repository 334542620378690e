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

//! Gzip copies of the corpus text files for the web app.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};
use log::{debug, info, warn};

use crate::error::{CorpusError, Result};
use crate::freshness::{self, Freshness};
use crate::manifest::Manifest;
use crate::pool::run_bounded;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressOutcome {
    /// The compressed file is newer than the text file.
    UpToDate,
    /// The compressed file already holds the same text.
    Unchanged,
    /// The compressed file was (re)written.
    Written,
}

fn normalize_newlines(bytes: &[u8]) -> Vec<u8> {
    let mut normalized = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().peekable();
    while let Some(&byte) = iter.next() {
        if byte == b'\r' && iter.peek() == Some(&&b'\n') {
            continue;
        }
        normalized.push(byte);
    }
    normalized
}

/// Returns the decompressed content of `path`, or `None` if it does not
/// exist or is not a valid gzip file.
fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(CorpusError::io(path, err)),
    };
    let mut content = Vec::new();
    match GzDecoder::new(file).read_to_end(&mut content) {
        Ok(_) => Ok(Some(content)),
        Err(err) => {
            warn!("Replacing unreadable {}: {err}", path.display());
            Ok(None)
        }
    }
}

/// Compresses `text_path` into `gzip_path`.
///
/// The output carries no timestamp or file name, so the same text always
/// produces the same bytes.
pub fn compress_file(text_path: &Path, gzip_path: &Path) -> Result<CompressOutcome> {
    if freshness::check(&[text_path], &[gzip_path])? == Freshness::Fresh {
        return Ok(CompressOutcome::UpToDate);
    }

    let content = fs::read(text_path).map_err(|err| CorpusError::io(text_path, err))?;
    let text = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

    if let Some(existing) = read_existing(gzip_path)? {
        if normalize_newlines(&existing) == normalize_newlines(text) {
            debug!("{} is unchanged", gzip_path.display());
            return Ok(CompressOutcome::Unchanged);
        }
    }

    if let Some(parent) = gzip_path.parent() {
        fs::create_dir_all(parent).map_err(|err| CorpusError::io(parent, err))?;
    }
    let file = File::create(gzip_path).map_err(|err| CorpusError::io(gzip_path, err))?;
    let mut encoder = GzBuilder::new().mtime(0).write(file, Compression::best());
    encoder
        .write_all(text)
        .map_err(|err| CorpusError::io(gzip_path, err))?;
    encoder
        .finish()
        .map_err(|err| CorpusError::io(gzip_path, err))?;
    Ok(CompressOutcome::Written)
}

/// Compresses every text file listed in `manifest` from `text_dir` into
/// `gzip_dir`, using `workers` threads.
pub fn compress_manifest(
    manifest: &Manifest,
    text_dir: &Path,
    gzip_dir: &Path,
    workers: usize,
) -> Result<Vec<CompressOutcome>> {
    let entries = manifest.entries();
    let outcomes = run_bounded(&entries, workers, |entry| {
        let gzip_path = entry.gzip_path(gzip_dir);
        let outcome = compress_file(&entry.text_path(text_dir), &gzip_path)?;
        if outcome == CompressOutcome::Written {
            info!("Compressed {}", gzip_path.display());
        }
        Ok(outcome)
    })?;
    let written = outcomes
        .iter()
        .filter(|&&outcome| outcome == CompressOutcome::Written)
        .count();
    info!("{written} of {} files compressed", outcomes.len());
    Ok(outcomes)
}

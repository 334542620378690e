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

//! Modification-time comparison used to skip regenerating outputs.
//!
//! The gate only ever saves work: running a pipeline while ignoring it
//! produces the same files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{CorpusError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The newest output is at least as new as the newest input.
    Fresh,
    /// Outputs are missing or older than some input.
    Stale,
}

/// Returns the newest modification time among `paths`, or `None` if
/// `paths` is empty. Every path must exist.
pub fn newest_mtime<P: AsRef<Path>>(paths: &[P]) -> Result<Option<SystemTime>> {
    let mut newest = None;
    for path in paths {
        let path = path.as_ref();
        let modified = fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|err| CorpusError::io(path, err))?;
        newest = newest.max(Some(modified));
    }
    Ok(newest)
}

/// Like [`newest_mtime`], but outputs that do not exist are skipped.
fn newest_existing_mtime<P: AsRef<Path>>(paths: &[P]) -> Result<Option<SystemTime>> {
    let mut newest = None;
    for path in paths {
        let path = path.as_ref();
        match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(modified) => newest = newest.max(Some(modified)),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(CorpusError::io(path, err)),
        }
    }
    Ok(newest)
}

/// Compares the newest input against the newest existing output.
///
/// Missing outputs always make the gate stale. With no inputs at all
/// there is nothing newer than the outputs, so they count as fresh.
pub fn check<I: AsRef<Path>, O: AsRef<Path>>(inputs: &[I], outputs: &[O]) -> Result<Freshness> {
    let Some(newest_output) = newest_existing_mtime(outputs)? else {
        return Ok(Freshness::Stale);
    };
    match newest_mtime(inputs)? {
        Some(newest_input) if newest_input > newest_output => Ok(Freshness::Stale),
        _ => Ok(Freshness::Fresh),
    }
}

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

//! Local mirrors of the upstream text repositories.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use log::info;

use crate::error::{CorpusError, Result};

/// Returns true if `path` is missing or an empty directory.
fn needs_clone(path: &Path) -> Result<bool> {
    match fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(true),
        Err(err) => Err(CorpusError::io(path, err)),
    }
}

fn run_git(mut command: Command, description: &str) -> Result<()> {
    let status = command
        .status()
        .map_err(|err| CorpusError::io(Path::new("git"), err))?;
    if !status.success() {
        return Err(CorpusError::Git {
            command: description.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}

/// Clones `url` into `path` if needed, then pulls the latest changes.
///
/// The clone is blob-less: file contents are only fetched for the
/// checked-out revision.
pub fn sync_mirror(url: &str, path: &Path) -> Result<()> {
    if needs_clone(path)? {
        info!("Downloading repository {url}...");
        let mut clone = Command::new("git");
        clone.args(["clone", "--filter=blob:none", url]).arg(path);
        run_git(clone, "clone")?;
    }

    info!("Checking if {} is up to date...", path.display());
    let mut pull = Command::new("git");
    pull.arg("pull").current_dir(path);
    run_git(pull, "pull")
}

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

//! Exports the manifest as a TypeScript module for the web app.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{CorpusError, Result};

/// Wraps the manifest source text in a `const` TypeScript module.
///
/// The JSON is embedded verbatim, so its key order and formatting carry
/// over to the generated module.
pub fn render_manifest_module(manifest_source: &str) -> String {
    format!(
        "const corpusJson = {} as const;\n\n\nexport default corpusJson;",
        manifest_source.trim()
    )
}

/// Writes `output` from the manifest at `manifest`.
pub fn export_manifest(manifest: &Path, output: &Path) -> Result<()> {
    let source = fs::read_to_string(manifest).map_err(|err| CorpusError::io(manifest, err))?;
    serde_json::from_str::<serde_json::Value>(&source)
        .map_err(|err| CorpusError::json(manifest, err))?;
    fs::write(output, render_manifest_module(&source)).map_err(|err| CorpusError::io(output, err))?;
    info!("Wrote {}", output.display());
    Ok(())
}

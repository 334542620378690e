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

//! Post-processing of the web app build directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{CorpusError, Result};

/// Minified files that replace their unminified counterpart. The first
/// one must exist.
const MINIFIED: &[(&str, &str)] = &[
    ("index.min.html", "index.html"),
    ("noscript.min.css", "noscript.css"),
];

/// Prerendered page only needed while building.
const SSR_PAGE: &str = "index.ssr.html";

/// Rewrites `path` as compact JSON.
pub fn compact_json(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|err| CorpusError::io(path, err))?;
    let value: Value = serde_json::from_str(&content).map_err(|err| CorpusError::json(path, err))?;
    let compact = serde_json::to_string(&value).map_err(|err| CorpusError::json(path, err))?;
    fs::write(path, compact).map_err(|err| CorpusError::io(path, err))
}

fn remove_if_present(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(CorpusError::io(path, err)),
    }
}

/// Compacts the top-level JSON files of `dist` and swaps in the minified
/// page and stylesheet. Returns the JSON files that were rewritten.
pub fn minify_dist(dist: &Path) -> Result<Vec<PathBuf>> {
    let mut json_files = Vec::new();
    for entry in WalkDir::new(dist).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dist).to_path_buf();
            CorpusError::io(&path, err.into())
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            debug!("Compacting {}", path.display());
            compact_json(path)?;
            json_files.push(path.to_path_buf());
        }
    }

    for (idx, (minified, target)) in MINIFIED.iter().enumerate() {
        let minified = dist.join(minified);
        if idx > 0 && !minified.exists() {
            continue;
        }
        let target = dist.join(target);
        fs::rename(&minified, &target).map_err(|err| CorpusError::io(&minified, err))?;
        debug!("Replaced {}", target.display());
    }
    if remove_if_present(&dist.join(SSR_PAGE))? {
        debug!("Removed {SSR_PAGE}");
    }

    info!(
        "Minified {} ({} JSON files)",
        dist.display(),
        json_files.len()
    );
    Ok(json_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minify_dist() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let dist = tmp_dir.path();
        fs::write(dist.join("manifest.json"), "{\n  \"name\": \"ポケモン\",\n  \"icons\": [1, 2]\n}")?;
        fs::create_dir(dist.join("assets"))?;
        fs::write(dist.join("assets/nested.json"), "{ \"a\": 1 }")?;
        fs::write(dist.join("index.html"), "<html>  </html>")?;
        fs::write(dist.join("index.min.html"), "<html></html>")?;
        fs::write(dist.join("index.ssr.html"), "<html>ssr</html>")?;
        fs::write(dist.join("noscript.css"), "a { }")?;

        let json_files = minify_dist(dist)?;

        assert_eq!(json_files, vec![dist.join("manifest.json")]);
        assert_eq!(
            fs::read_to_string(dist.join("manifest.json"))?,
            r#"{"name":"ポケモン","icons":[1,2]}"#
        );
        assert_eq!(
            fs::read_to_string(dist.join("assets/nested.json"))?,
            "{ \"a\": 1 }"
        );
        assert_eq!(fs::read_to_string(dist.join("index.html"))?, "<html></html>");
        assert!(!dist.join("index.min.html").exists());
        assert!(!dist.join("index.ssr.html").exists());
        assert_eq!(fs::read_to_string(dist.join("noscript.css"))?, "a { }");
        Ok(())
    }

    #[test]
    fn test_swaps_minified_stylesheet() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let dist = tmp_dir.path();
        fs::write(dist.join("index.min.html"), "<p>")?;
        fs::write(dist.join("noscript.css"), "a { }")?;
        fs::write(dist.join("noscript.min.css"), "a{}")?;

        minify_dist(dist)?;

        assert_eq!(fs::read_to_string(dist.join("index.html"))?, "<p>");
        assert_eq!(fs::read_to_string(dist.join("noscript.css"))?, "a{}");
        assert!(!dist.join("noscript.min.css").exists());
        Ok(())
    }

    #[test]
    fn test_missing_minified_page_is_an_error() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let result = minify_dist(tmp_dir.path());
        assert!(matches!(result, Err(CorpusError::Io { .. })));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let tmp_dir = tempfile::tempdir().unwrap();
        fs::write(tmp_dir.path().join("bad.json"), "{").unwrap();
        let result = minify_dist(tmp_dir.path());
        assert!(matches!(result, Err(CorpusError::Json { .. })));
    }
}

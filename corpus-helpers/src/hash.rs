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

//! Checksums of the compressed corpus files, used by the web app to
//! invalidate its cache.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{CorpusError, Result};
use crate::manifest::Manifest;
use crate::pool::run_bounded;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDigest {
    /// CRC-32 of the file as eight uppercase hex digits.
    pub hash: String,
    pub size: u64,
}

impl FileDigest {
    pub fn of(bytes: &[u8]) -> Self {
        FileDigest {
            hash: format!("{:08X}", crc32fast::hash(bytes)),
            size: bytes.len() as u64,
        }
    }
}

pub fn digest_file(path: &Path) -> Result<FileDigest> {
    let bytes = fs::read(path).map_err(|err| CorpusError::io(path, err))?;
    Ok(FileDigest::of(&bytes))
}

/// Digests of every compressed file listed in `manifest`, keyed by their
/// path relative to `public_dir`, in manifest order.
pub fn digest_manifest(
    manifest: &Manifest,
    public_dir: &Path,
    workers: usize,
) -> Result<Vec<(String, FileDigest)>> {
    let entries = manifest.entries();
    info!("Calculating hashes for {} files...", entries.len());
    run_bounded(&entries, workers, |entry| {
        let url = entry.public_url();
        let digest = digest_file(&public_dir.join(&url))?;
        debug!("{url}: {} ({} bytes)", digest.hash, digest.size);
        Ok((url, digest))
    })
}

/// The `data.json` layout: the manifest itself followed by parallel
/// `hashes` and `sizes` arrays.
pub fn data_document(manifest: &Manifest, digests: &[(String, FileDigest)]) -> Value {
    let hashes = digests
        .iter()
        .map(|(_, digest)| digest.hash.clone())
        .collect::<Vec<_>>();
    let sizes = digests
        .iter()
        .map(|(_, digest)| digest.size)
        .collect::<Vec<_>>();
    json!({
        "corpus": manifest.raw(),
        "hashes": hashes,
        "sizes": sizes,
    })
}

/// The `files.json` layout: one `{hash, size}` object per path.
pub fn files_document(digests: &[(String, FileDigest)]) -> Value {
    let files = digests
        .iter()
        .map(|(url, digest)| {
            let digest = json!({"hash": digest.hash, "size": digest.size});
            (url.clone(), digest)
        })
        .collect::<Map<_, _>>();
    Value::Object(files)
}

/// Writes `document` as pretty-printed JSON unless `path` already holds
/// an equal document. Returns whether the file was written.
pub fn write_if_changed(path: &Path, document: &Value) -> Result<bool> {
    match fs::read_to_string(path) {
        Ok(existing) => {
            if serde_json::from_str::<Value>(&existing).ok().as_ref() == Some(document) {
                info!("{} is up to date", path.display());
                return Ok(false);
            }
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(CorpusError::io(path, err)),
    }

    let content = serde_json::to_string_pretty(document).map_err(|err| CorpusError::json(path, err))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| CorpusError::io(parent, err))?;
    }
    fs::write(path, content).map_err(|err| CorpusError::io(path, err))?;
    info!("Updated {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest() -> Manifest {
        let raw = json!({
            "collections": {
                "GO": {"languages": ["en", "ja"], "files": ["text"]},
            },
        });
        Manifest::from_value(raw, Path::new("corpus.json")).unwrap()
    }

    #[test]
    fn test_digest_of_known_bytes() {
        assert_eq!(
            FileDigest::of(b"123456789"),
            FileDigest {
                hash: "CBF43926".into(),
                size: 9
            }
        );
        assert_eq!(FileDigest::of(b"").hash, "00000000");
    }

    #[test]
    fn test_documents() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let dir = tmp_dir.path().join("corpus/GO");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("en_text.txt.gz"), "123456789")?;
        fs::write(dir.join("ja_text.txt.gz"), "")?;

        let digests = digest_manifest(&manifest(), tmp_dir.path(), 2)?;

        assert_eq!(
            data_document(&manifest(), &digests),
            json!({
                "corpus": {"collections": {"GO": {"languages": ["en", "ja"], "files": ["text"]}}},
                "hashes": ["CBF43926", "00000000"],
                "sizes": [9, 0],
            })
        );
        assert_eq!(
            serde_json::to_string(&files_document(&digests))?,
            r#"{"corpus/GO/en_text.txt.gz":{"hash":"CBF43926","size":9},"corpus/GO/ja_text.txt.gz":{"hash":"00000000","size":0}}"#
        );
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let result = digest_manifest(&manifest(), tmp_dir.path(), 4);
        assert!(matches!(result, Err(CorpusError::Io { .. })));
    }

    #[test]
    fn test_write_if_changed() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("data.json");
        let document = json!({"corpus": {"name": "ポケモン"}, "sizes": [1]});

        assert!(write_if_changed(&path, &document)?);
        assert_eq!(
            fs::read_to_string(&path)?,
            "{\n  \"corpus\": {\n    \"name\": \"ポケモン\"\n  },\n  \"sizes\": [\n    1\n  ]\n}"
        );
        assert!(!write_if_changed(&path, &document)?);
        assert!(write_if_changed(&path, &json!({"sizes": [2]}))?);
        Ok(())
    }
}

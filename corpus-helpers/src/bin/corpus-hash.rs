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

//! Records the checksum and size of every compressed corpus file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use corpus_helpers::hash::{data_document, digest_manifest, files_document, write_if_changed};
use corpus_helpers::manifest::Manifest;
use corpus_helpers::pool::DEFAULT_WORKERS;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Layout {
    /// `{"corpus": ..., "hashes": [...], "sizes": [...]}`
    Data,
    /// `{"corpus/...": {"hash": ..., "size": ...}, ...}`
    Files,
}

impl Layout {
    fn default_output(self) -> &'static Path {
        match self {
            Layout::Data => Path::new("./public/data.json"),
            Layout::Files => Path::new("./src/res/files.json"),
        }
    }
}

#[derive(Debug, Parser)]
struct Cli {
    #[arg(value_enum)]
    layout: Layout,
    #[arg(long, value_name = "DIR", default_value = "./public")]
    public_dir: PathBuf,
    #[arg(long, value_name = "corpus.json", default_value = "./src/res/corpus.json")]
    manifest: PathBuf,
    /// Defaults to `public/data.json` or `src/res/files.json`.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    jobs: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    let manifest = Manifest::load(&cli.manifest)?;
    let digests = digest_manifest(&manifest, &cli.public_dir, cli.jobs)
        .context("Could not hash the compressed corpus")?;

    let document = match cli.layout {
        Layout::Data => data_document(&manifest, &digests),
        Layout::Files => files_document(&digests),
    };
    let output = cli
        .output
        .unwrap_or_else(|| cli.layout.default_output().to_path_buf());
    write_if_changed(&output, &document)?;
    Ok(())
}

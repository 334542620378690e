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

//! Compresses every corpus text file listed in the manifest.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use corpus_helpers::compress::compress_manifest;
use corpus_helpers::manifest::Manifest;
use corpus_helpers::pool::DEFAULT_WORKERS;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(long, value_name = "DIR", default_value = "./corpus")]
    text_dir: PathBuf,
    #[arg(long, value_name = "DIR", default_value = "./public/corpus")]
    gzip_dir: PathBuf,
    #[arg(long, value_name = "corpus.json", default_value = "./src/res/corpus.json")]
    manifest: PathBuf,
    /// Number of files compressed in parallel.
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    jobs: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    let manifest = Manifest::load(&cli.manifest)?;
    compress_manifest(&manifest, &cli.text_dir, &cli.gzip_dir, cli.jobs)
        .with_context(|| format!("Could not compress into {}", cli.gzip_dir.display()))?;
    Ok(())
}

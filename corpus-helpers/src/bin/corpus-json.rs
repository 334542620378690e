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

//! Exports `corpus.json` as a TypeScript module.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use corpus_helpers::export::export_manifest;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(long, value_name = "corpus.json", default_value = "./src/res/corpus.json")]
    manifest: PathBuf,
    #[arg(short, long, value_name = "FILE", default_value = "./src/res/corpusJson.ts")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    export_manifest(&cli.manifest, &cli.output)
        .with_context(|| format!("Could not export {}", cli.manifest.display()))?;
    Ok(())
}

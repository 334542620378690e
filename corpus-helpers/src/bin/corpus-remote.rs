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

//! Mirrors an upstream text repository and rebuilds its corpus files.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use corpus_helpers::collection::{Collection, Outcome};
use corpus_helpers::remote::sync_mirror;
use log::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    Go,
    Home,
    Masters,
}

impl Source {
    fn collection(self) -> Collection {
        match self {
            Source::Go => Collection::go(),
            Source::Home => Collection::home(),
            Source::Masters => Collection::masters(),
        }
    }
}

#[derive(Debug, Parser)]
struct Cli {
    /// Collection to rebuild.
    #[arg(value_enum)]
    source: Source,
    /// Directory holding the repository mirrors.
    #[arg(long, value_name = "DIR", default_value = "./remote")]
    remote_dir: PathBuf,
    /// Directory holding the corpus text files.
    #[arg(long, value_name = "DIR", default_value = "./corpus")]
    corpus_dir: PathBuf,
    /// Mirror to read instead of `{remote-dir}/{repository}`.
    #[arg(long, value_name = "DIR")]
    repo: Option<PathBuf>,
    /// Output directory instead of `{corpus-dir}/{collection}`.
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Rebuild even if the outputs are newer than every dump.
    #[arg(long)]
    force: bool,
    /// Use the mirror as it is, without running git.
    #[arg(long)]
    offline: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    let collection = cli.source.collection();
    let repo = cli
        .repo
        .unwrap_or_else(|| cli.remote_dir.join(collection.repo_dir));
    let output = cli
        .output
        .unwrap_or_else(|| cli.corpus_dir.join(collection.output_dir));

    if !cli.offline {
        sync_mirror(collection.repo_url, &repo)
            .with_context(|| format!("Could not update the {} mirror", collection.name))?;
    }

    match collection
        .build(&repo, &output, cli.force)
        .with_context(|| format!("Could not build the {} corpus", collection.name))?
    {
        Outcome::UpToDate => {}
        Outcome::Written(files) => info!("Done! Wrote {} files", files.len()),
    }
    Ok(())
}

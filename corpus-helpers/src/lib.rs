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

//! Helpers for building a multi-language text corpus.
//!
//! The text pipeline turns localization dumps mirrored from upstream
//! repositories into aligned line-oriented files: one ID index plus one
//! file per language, where line `n` of every file describes the same
//! string. See [`collection::Collection`] for the supported dumps.
//!
//! The asset pipeline then compresses those files for the web app
//! ([`compress`]), records their checksums ([`hash`]), exports the
//! corpus manifest ([`export`]) and tidies the build output
//! ([`minify`]).

pub mod collection;
pub mod compress;
pub mod corpus;
pub mod error;
pub mod escape;
pub mod export;
pub mod freshness;
pub mod hash;
pub mod id;
pub mod languages;
pub mod manifest;
pub mod minify;
pub mod pool;
pub mod remote;
pub mod repair;
pub mod source;
pub mod writer;

pub use error::{CorpusError, Result};

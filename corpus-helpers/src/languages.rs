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

//! Mapping from the language codes used by each upstream repository to
//! the codes used in corpus file names.

use crate::error::{CorpusError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageMap {
    /// Lowercase region-tagged codes such as `en-us`; the region is
    /// dropped except where it selects a distinct variant.
    Go,
    /// Three-letter console region codes. Unknown codes are an error.
    Home,
    /// BCP 47 codes, kept as is apart from Traditional Chinese.
    Masters,
}

impl LanguageMap {
    /// Returns the corpus language code for `code`.
    pub fn convert(self, code: &str) -> Result<String> {
        let converted = match self {
            LanguageMap::Go => match code {
                "zh-tw" => "zh-Hant",
                "pt-br" => "pt-BR",
                "es-mx" => "es-419",
                _ => code.split('-').next().unwrap_or(code),
            },
            LanguageMap::Home => match code {
                "jpn" => "ja-Hrkt",
                "jpn_kanji" => "ja",
                "usa" => "en",
                "fra" => "fr",
                "ita" => "it",
                "deu" => "de",
                "esp" => "es",
                "kor" => "ko",
                "sch" => "zh-Hans",
                "tch" => "zh-Hant",
                _ => return Err(CorpusError::UnknownLanguage(code.to_string())),
            },
            LanguageMap::Masters => match code {
                "zh-TW" => "zh-Hant",
                _ => code,
            },
        };
        Ok(converted.to_string())
    }
}

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

//! Line escaping for the flat corpus files.
//!
//! Every record occupies exactly one line, so a literal newline inside a
//! key or a translation is written as `\n` and a literal backslash as
//! `\\`. These two characters form the output escape set; the characters
//! reserved inside canonical IDs live in [`crate::id`] and are unrelated.

use std::borrow::Cow;

/// Escapes backslashes and newlines so that `text` fits on one line.
///
/// # Examples
///
/// ```
/// use corpus_helpers::escape::escape_line;
///
/// assert_eq!(escape_line("a\\b\nc"), "a\\\\b\\nc");
/// assert_eq!(escape_line("plain"), "plain");
/// ```
pub fn escape_line(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '\n']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Reverses [`escape_line`].
///
/// Backslash sequences other than `\\` and `\n` are kept verbatim.
pub fn unescape_line(line: &str) -> Cow<'_, str> {
    if !line.contains('\\') {
        return Cow::Borrowed(line);
    }
    let mut text = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => text.push('\\'),
            Some('n') => text.push('\n'),
            Some(other) => {
                text.push('\\');
                text.push(other);
            }
            None => text.push('\\'),
        }
    }
    Cow::Owned(text)
}

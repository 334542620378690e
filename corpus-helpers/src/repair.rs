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

//! Repair of numeric-branch control codes in MSBT text dumps.
//!
//! A number branch looks like `[VAR 1101(xxxx,PPSS)]` and is followed
//! by two segments: the singular form (`SS` characters) and then the
//! plural form (`PP` characters). The lengths are hexadecimal. The
//! consumer of the corpus reads the segments by these lengths, so a
//! stray `\n` escape inserted by the dump tool next to the marker or
//! between the two segments shifts every character after it.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Line break as it appears inside a dumped string.
const LINE_BREAK: &str = "\\n";

fn number_branch_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = r"(?x)
            \[VAR\ 1101\(
            [0-9A-F]{4},            # the argument
            (?<plural>[0-9A-F]{2})  # length of the plural segment
            (?<singular>[0-9A-F]{2}) # length of the singular segment
            \)\]
        ";
        Regex::new(pattern).expect("well-formed regex")
    })
}

fn hex_length(digits: &str) -> usize {
    usize::from_str_radix(digits, 16).expect("two hex digits")
}

/// Splits `text` after `count` characters, or at its end if it is shorter.
fn split_chars(text: &str, count: usize) -> (&str, &str) {
    match text.char_indices().nth(count) {
        Some((offset, _)) => text.split_at(offset),
        None => (text, ""),
    }
}

/// Removes spurious line breaks around every number branch in `text`.
///
/// Segment boundaries are found by counting the declared lengths on the
/// text as dumped, skipping over at most one line break directly after
/// the marker and one directly after the singular segment. Text without
/// a marker is returned unchanged.
///
/// # Examples
///
/// ```
/// use corpus_helpers::repair::repair_number_branches;
///
/// assert_eq!(
///     repair_number_branches(r"A\n[VAR 1101(0001,0102)]\nBC\nDE"),
///     r"A[VAR 1101(0001,0102)]BCDE"
/// );
/// ```
pub fn repair_number_branches(text: &str) -> Cow<'_, str> {
    let re = number_branch_regex();
    if !re.is_match(text) {
        return Cow::Borrowed(text);
    }

    let mut repaired = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(captures) = re.captures(rest) {
        let marker = captures.get(0).expect("whole match");
        let singular_len = hex_length(&captures["singular"]);
        let plural_len = hex_length(&captures["plural"]);

        let before = &rest[..marker.start()];
        repaired.push_str(before.strip_suffix(LINE_BREAK).unwrap_or(before));
        repaired.push_str(marker.as_str());

        let after = &rest[marker.end()..];
        let after = after.strip_prefix(LINE_BREAK).unwrap_or(after);
        let (singular, after) = split_chars(after, singular_len);
        repaired.push_str(singular);

        let after = after.strip_prefix(LINE_BREAK).unwrap_or(after);
        let (plural, after) = split_chars(after, plural_len);
        repaired.push_str(plural);

        rest = after;
    }
    repaired.push_str(rest);
    Cow::Owned(repaired)
}

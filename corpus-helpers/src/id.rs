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

//! Canonical string IDs.
//!
//! A canonical ID is a `.`-separated path such as
//! `masters.talk.ev_001.line_03`. Keys may themselves contain `.`, which
//! is swapped for [`PLACEHOLDER`] so that the segments stay unambiguous.

use std::borrow::Cow;

use crate::error::{CorpusError, Result};
use crate::escape::escape_line;

/// Separates the segments of a canonical ID.
pub const SEGMENT_DELIMITER: char = '.';

/// Stands in for [`SEGMENT_DELIMITER`] inside a key.
pub const PLACEHOLDER: char = '^';

/// Separates a group name from the rest of a key that repeats it.
pub const GROUP_SEPARATOR: char = '/';

/// How one collection turns source keys into canonical IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdScheme {
    /// First segment of every ID, e.g. `go`.
    pub namespace: String,
    /// Dump-kind segment after the namespace; `None` for the default kind.
    pub prefix: Option<String>,
    /// Whether the file group name becomes a segment.
    pub include_group: bool,
    /// Whether backslashes and newlines in keys are escaped.
    pub escape_keys: bool,
    /// Whether `.` in keys is replaced by [`PLACEHOLDER`].
    pub protect_delimiter: bool,
}

impl IdScheme {
    /// A scheme producing `{namespace}.{key}`.
    pub fn flat(namespace: &str) -> Self {
        IdScheme {
            namespace: namespace.to_string(),
            prefix: None,
            include_group: false,
            escape_keys: false,
            protect_delimiter: false,
        }
    }

    /// A scheme producing `{namespace}[.{prefix}].{group}.{key}`.
    pub fn grouped(namespace: &str, prefix: Option<&str>) -> Self {
        IdScheme {
            namespace: namespace.to_string(),
            prefix: prefix.map(str::to_string),
            include_group: true,
            escape_keys: false,
            protect_delimiter: false,
        }
    }

    /// Escapes backslashes and newlines in keys so that every ID fits on
    /// one line.
    pub fn escaping_keys(mut self) -> Self {
        self.escape_keys = true;
        self
    }

    /// Escapes keys and protects the delimiter, as grouped JSON tables need.
    pub fn for_json_keys(self) -> Self {
        IdScheme {
            protect_delimiter: true,
            ..self.escaping_keys()
        }
    }

    /// Returns the canonical ID of `key` inside `group`.
    ///
    /// Fails with [`CorpusError::DuplicateId`] if the key already contains
    /// [`PLACEHOLDER`], since it could then collide with a key that had a
    /// `.` in the same position.
    pub fn canonical_id(&self, group: &str, key: &str) -> Result<String> {
        let mut key = if self.escape_keys {
            escape_line(key)
        } else {
            Cow::Borrowed(key)
        };
        if self.protect_delimiter {
            if key.contains(PLACEHOLDER) {
                return Err(CorpusError::DuplicateId {
                    key: key.into_owned(),
                    reason: format!("key already contains the placeholder {PLACEHOLDER:?}"),
                });
            }
            key = Cow::Owned(key.replace(SEGMENT_DELIMITER, &PLACEHOLDER.to_string()));
        }

        let mut segments = vec![self.namespace.as_str()];
        if let Some(prefix) = &self.prefix {
            segments.push(prefix);
        }
        let mut key: &str = &key;
        if self.include_group {
            segments.push(group);
            if let Some(stripped) = key
                .strip_prefix(group)
                .and_then(|rest| rest.strip_prefix(GROUP_SEPARATOR))
            {
                key = stripped;
            }
        }
        segments.push(key);
        let delimiter = SEGMENT_DELIMITER.to_string();
        Ok(segments.join(delimiter.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flat_scheme() {
        let scheme = IdScheme::flat("go");
        assert_eq!(
            scheme.canonical_id("", "pokemon_name_0025").unwrap(),
            "go.pokemon_name_0025"
        );
    }

    #[test]
    fn test_grouped_scheme_with_prefix() {
        let scheme = IdScheme::grouped("home", Some("sp"));
        assert_eq!(
            scheme.canonical_id("monsname", "MONSNAME_025").unwrap(),
            "home.sp.monsname.MONSNAME_025"
        );
    }

    #[test]
    fn test_default_prefix_is_omitted() {
        let scheme = IdScheme::grouped("masters", None).for_json_keys();
        assert_eq!(
            scheme.canonical_id("skill", "skill_name_1").unwrap(),
            "masters.skill.skill_name_1"
        );
    }

    #[test]
    fn test_delimiter_is_protected() {
        let scheme = IdScheme::grouped("masters", Some("talk")).for_json_keys();
        assert_eq!(
            scheme.canonical_id("ev", "line.1.a").unwrap(),
            "masters.talk.ev.line^1^a"
        );
    }

    #[test]
    fn test_redundant_group_prefix_is_stripped() {
        let scheme = IdScheme::grouped("masters", Some("ui")).for_json_keys();
        assert_eq!(
            scheme.canonical_id("menu", "menu/title").unwrap(),
            "masters.ui.menu.title"
        );
        assert_eq!(
            scheme.canonical_id("menu", "menubar/title").unwrap(),
            "masters.ui.menu.menubar/title"
        );
    }

    #[test]
    fn test_keys_are_escaped() {
        let scheme = IdScheme::grouped("masters", None).for_json_keys();
        assert_eq!(
            scheme.canonical_id("msg", "a\\b\nc").unwrap(),
            "masters.msg.a\\\\b\\nc"
        );
    }

    #[test]
    fn test_flat_keys_are_escaped_without_protection() {
        let scheme = IdScheme::flat("go").escaping_keys();
        assert_eq!(
            scheme.canonical_id("", "a\nb.c\\d").unwrap(),
            "go.a\\nb.c\\\\d"
        );
    }

    #[test]
    fn test_placeholder_in_key_is_rejected() {
        let scheme = IdScheme::grouped("masters", None).for_json_keys();
        assert!(matches!(
            scheme.canonical_id("msg", "odd^key"),
            Err(CorpusError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_placeholder_allowed_without_protection() {
        let scheme = IdScheme::grouped("home", Some("sp"));
        assert_eq!(scheme.canonical_id("g", "a^b.c").unwrap(), "home.sp.g.a^b.c");
    }
}

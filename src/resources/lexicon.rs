//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Lexicon Resources
//!
//! Table-driven implementations of [`ZiSynonymSource`] and
//! [`ZiPartOfSpeechTagger`].
//!
//! A [`ZiSynonymTable`] is either built in memory or pointed at a JSON file
//! of the form `{"word": ["synonym", ...]}`. File tables are read the first
//! time a lookup happens; a read or parse failure is reported as
//! [`ZiError::ResourceUnavailable`] on that lookup and every later one.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::errors::{Result, ZiError};
use crate::resources::{ZiPartOfSpeechTagger, ZiSynonymSource};

type ZiSynonymMap = HashMap<String, Vec<String>>;

/// Synonym table keyed by lowercased word.
#[derive(Debug)]
pub struct ZiSynonymTable {
    path: Option<PathBuf>,
    entries: OnceLock<std::result::Result<ZiSynonymMap, String>>,
}

impl Default for ZiSynonymTable {
    fn default() -> Self {
        Self::from_map(HashMap::new())
    }
}

impl ZiSynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: HashMap<String, Vec<String>>) -> Self {
        let entries = OnceLock::new();
        let normalized = map
            .into_iter()
            .map(|(word, synonyms)| (word.to_lowercase(), synonyms))
            .collect();
        let _ = entries.set(Ok(normalized));
        Self {
            path: None,
            entries,
        }
    }

    /// Table backed by a JSON file, read on first lookup.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            entries: OnceLock::new(),
        }
    }

    /// Adds or replaces the synonyms of `word`. Has no effect on a file table
    /// that failed to load.
    pub fn add(&mut self, word: &str, synonyms: &[&str]) {
        if self.entries.get().is_none() {
            let loaded = self.load();
            let _ = self.entries.set(loaded);
        }
        if let Some(Ok(map)) = self.entries.get_mut() {
            map.insert(
                word.to_lowercase(),
                synonyms.iter().map(|s| (*s).to_string()).collect(),
            );
        }
    }

    fn load(&self) -> std::result::Result<ZiSynonymMap, String> {
        let Some(path) = &self.path else {
            return Ok(HashMap::new());
        };
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        let parsed: ZiSynonymMap = serde_json::from_str(&raw)
            .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
        log::debug!(
            "augment.resource.synonyms.loaded: synonym table loaded - path={}, words={}",
            path.display(),
            parsed.len()
        );
        Ok(parsed
            .into_iter()
            .map(|(word, synonyms)| (word.to_lowercase(), synonyms))
            .collect())
    }

    fn entries(&self) -> Result<&ZiSynonymMap> {
        self.entries
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(|message| ZiError::resource_unavailable("synonyms", message.clone()))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.entries()?.is_empty())
    }
}

impl ZiSynonymSource for ZiSynonymTable {
    fn synonyms(&self, word: &str) -> Result<Vec<String>> {
        let entries = self.entries()?;
        let Some(candidates) = entries.get(&word.to_lowercase()) else {
            return Ok(Vec::new());
        };

        let mut out: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            // Multi-word lemmas are stored with underscores.
            if candidate.contains('_') || candidate.eq_ignore_ascii_case(word) {
                continue;
            }
            if !out.contains(candidate) {
                out.push(candidate.clone());
            }
        }
        Ok(out)
    }
}

/// Tags words by dictionary lookup, falling back to a default tag.
#[derive(Clone, Debug)]
pub struct ZiLexiconTagger {
    tags: HashMap<String, String>,
    default_tag: String,
}

impl Default for ZiLexiconTagger {
    fn default() -> Self {
        Self {
            tags: HashMap::new(),
            default_tag: "X".to_string(),
        }
    }
}

impl ZiLexiconTagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_tag(mut self, tag: &str) -> Self {
        self.default_tag = tag.to_string();
        self
    }

    pub fn add(&mut self, word: &str, tag: &str) {
        self.tags.insert(word.to_lowercase(), tag.to_string());
    }
}

impl ZiPartOfSpeechTagger for ZiLexiconTagger {
    fn tag(&self, words: &[&str]) -> Result<Vec<String>> {
        Ok(words
            .iter()
            .map(|word| {
                self.tags
                    .get(&word.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| self.default_tag.clone())
            })
            .collect())
    }
}

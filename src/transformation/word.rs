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

//! # Word Transformations
//!
//! Whole-word perturbations: deletion, swapping two words, replacing a word
//! with a synonym or an embedding neighbour, and inserting a synonym of a
//! random word.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::{Result, ZiError};
use crate::resources::{ZiSynonymSource, ZiWordEmbedding};
use crate::rng::ZiRng;
use crate::text::ZiAttackedText;
use crate::transformation::{word_swap_candidates, ZiTransform};

/// Attempts made to find a random word that has synonyms.
const ZI_SYNONYM_INSERTION_ATTEMPTS: usize = 7;

/// Re-applies the casing pattern of `reference` to `word`.
pub fn recover_word_case(word: &str, reference: &str) -> String {
    let letters: Vec<char> = reference.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() || letters.iter().all(|c| c.is_lowercase()) {
        return word.to_lowercase();
    }
    if letters.iter().all(|c| c.is_uppercase()) && letters.len() > 1 {
        return word.to_uppercase();
    }
    let starts_upper = reference.chars().next().map(char::is_uppercase).unwrap_or(false);
    if starts_upper && letters.iter().skip(1).all(|c| c.is_lowercase()) {
        let lower = word.to_lowercase();
        let mut chars = lower.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    word.to_string()
}

/// Removes one eligible word per candidate.
#[derive(Debug, Default)]
pub struct ZiWordDeletion;

impl ZiTransform for ZiWordDeletion {
    fn name(&self) -> &'static str {
        "word.deletion"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        _rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        if text.num_words() <= 1 {
            return Ok(Vec::new());
        }
        indices
            .iter()
            .filter(|&&index| index < text.num_words())
            .map(|&index| text.delete_word_at_index(index))
            .collect()
    }
}

/// Swaps each eligible word with another eligible word chosen at random.
#[derive(Debug, Default)]
pub struct ZiWordInnerSwapRandom;

impl ZiTransform for ZiWordInnerSwapRandom {
    fn name(&self) -> &'static str {
        "word.inner_swap_random"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let words = text.words();
        let mut candidates = Vec::new();

        for &index in indices {
            if index >= words.len() {
                continue;
            }
            let others: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|&i| i != index && i < words.len())
                .collect();
            let Some(&other) = rng.choose(&others) else {
                continue;
            };
            if words[index] == words[other] {
                continue;
            }
            candidates.push(text.replace_words_at_indices(
                &[index, other],
                &[words[other].to_string(), words[index].to_string()],
            )?);
        }
        Ok(candidates)
    }
}

/// Replaces eligible words with their synonyms.
#[derive(Debug)]
pub struct ZiWordSwapSynonym {
    synonyms: Arc<dyn ZiSynonymSource>,
}

impl ZiWordSwapSynonym {
    pub fn new(synonyms: Arc<dyn ZiSynonymSource>) -> Self {
        Self { synonyms }
    }
}

impl ZiTransform for ZiWordSwapSynonym {
    fn name(&self) -> &'static str {
        "word.swap_synonym"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        _rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        word_swap_candidates(text, indices, |word| {
            Ok(self
                .synonyms
                .synonyms(word)?
                .into_iter()
                .map(|synonym| recover_word_case(&synonym, word))
                .collect())
        })
    }
}

/// Inserts a synonym of a randomly chosen word before each eligible position.
#[derive(Debug)]
pub struct ZiWordInsertionRandomSynonym {
    synonyms: Arc<dyn ZiSynonymSource>,
}

impl ZiWordInsertionRandomSynonym {
    pub fn new(synonyms: Arc<dyn ZiSynonymSource>) -> Self {
        Self { synonyms }
    }
}

impl ZiTransform for ZiWordInsertionRandomSynonym {
    fn name(&self) -> &'static str {
        "word.insertion_random_synonym"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let words: Vec<String> = text.words().into_iter().map(str::to_string).collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();
        for &index in indices {
            if index > words.len() {
                continue;
            }

            let mut found = Vec::new();
            for _ in 0..ZI_SYNONYM_INSERTION_ATTEMPTS {
                if let Some(word) = rng.choose(&words) {
                    found = self.synonyms.synonyms(word)?;
                }
                if !found.is_empty() {
                    break;
                }
            }

            let Some(synonym) = rng.choose(&found) else {
                continue;
            };
            candidates.push(text.insert_text_before_word_index(index, synonym)?);
        }
        Ok(candidates)
    }
}

/// Replaces eligible words with their nearest embedding neighbours.
#[derive(Debug)]
pub struct ZiWordSwapEmbedding {
    embedding: Arc<dyn ZiWordEmbedding>,
    max_candidates: usize,
}

impl ZiWordSwapEmbedding {
    #[allow(non_snake_case)]
    pub fn new(embedding: Arc<dyn ZiWordEmbedding>, max_candidates: usize) -> Result<Self> {
        if max_candidates == 0 {
            return Err(ZiError::validation(
                "word.swap_embedding 'max_candidates' must be positive",
            ));
        }
        Ok(Self {
            embedding,
            max_candidates,
        })
    }
}

impl ZiTransform for ZiWordSwapEmbedding {
    fn name(&self) -> &'static str {
        "word.swap_embedding"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        _rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        word_swap_candidates(text, indices, |word| {
            let lower = word.to_lowercase();
            Ok(self
                .embedding
                .nearest_neighbours(&lower, self.max_candidates)?
                .into_iter()
                .filter(|neighbour| *neighbour != lower)
                .map(|neighbour| recover_word_case(&neighbour, word))
                .collect())
        })
    }
}

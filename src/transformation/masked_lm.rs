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

//! # Masked Language Model Transformations
//!
//! Word replacement, insertion and merging driven by a masked language model.
//! Each transformation masks a position, asks the injected
//! [`ZiMaskedLanguageModel`] for the most likely fillers and keeps those whose
//! probability reaches `min_confidence`.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::{Result, ZiError};
use crate::resources::{ZiMaskedLanguageModel, ZiTokenScore};
use crate::rng::ZiRng;
use crate::text::ZiAttackedText;
use crate::transformation::ZiTransform;

/// A filler is usable when it is a single alphanumeric token.
fn is_usable_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

fn validate(name: &str, max_candidates: usize, min_confidence: f64) -> Result<()> {
    if max_candidates == 0 {
        return Err(ZiError::validation(format!(
            "{name} 'max_candidates' must be positive"
        )));
    }
    if !(0.0..=1.0).contains(&min_confidence) {
        return Err(ZiError::validation(format!(
            "{name} 'min_confidence' must be within [0, 1], got {min_confidence}"
        )));
    }
    Ok(())
}

/// Shared settings of the three masked-LM transformations.
#[derive(Debug)]
struct ZiMaskedLmSettings {
    model: Arc<dyn ZiMaskedLanguageModel>,
    max_candidates: usize,
    min_confidence: f64,
}

impl ZiMaskedLmSettings {
    /// Fills the mask in `masked`, keeping confident, usable tokens that differ
    /// from `exclude` (case-insensitively). Order follows the model's ranking.
    fn fill(&self, masked: &ZiAttackedText, exclude: &[&str]) -> Result<Vec<String>> {
        let scores: Vec<ZiTokenScore> = self
            .model
            .fill_mask(&masked.text(), self.max_candidates)?;

        let mut out: Vec<String> = Vec::new();
        for score in scores {
            if score.probability < self.min_confidence {
                continue;
            }
            let token = score.token.trim().trim_start_matches("##").to_string();
            if !is_usable_token(&token)
                || exclude.iter().any(|word| word.eq_ignore_ascii_case(&token))
                || out.contains(&token)
            {
                continue;
            }
            out.push(token);
            if out.len() == self.max_candidates {
                break;
            }
        }
        Ok(out)
    }
}

/// Replaces a word with the model's predictions for its masked position.
#[derive(Debug)]
pub struct ZiWordSwapMaskedLm {
    settings: ZiMaskedLmSettings,
}

impl ZiWordSwapMaskedLm {
    #[allow(non_snake_case)]
    pub fn new(
        model: Arc<dyn ZiMaskedLanguageModel>,
        max_candidates: usize,
        min_confidence: f64,
    ) -> Result<Self> {
        validate("masked_lm.swap", max_candidates, min_confidence)?;
        Ok(Self {
            settings: ZiMaskedLmSettings {
                model,
                max_candidates,
                min_confidence,
            },
        })
    }
}

impl ZiTransform for ZiWordSwapMaskedLm {
    fn name(&self) -> &'static str {
        "masked_lm.swap"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        _rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let mask = self.settings.model.mask_token().to_string();
        let mut candidates = Vec::new();

        for &index in indices {
            let Some(word) = text.word(index) else {
                continue;
            };
            let masked = text.replace_word_at_index(index, &mask)?;
            for token in self.settings.fill(&masked, &[word])? {
                candidates.push(text.replace_word_at_index(index, &token)?);
            }
        }
        Ok(candidates)
    }
}

/// Inserts the model's predictions for a mask placed before a word.
#[derive(Debug)]
pub struct ZiWordInsertionMaskedLm {
    settings: ZiMaskedLmSettings,
}

impl ZiWordInsertionMaskedLm {
    #[allow(non_snake_case)]
    pub fn new(
        model: Arc<dyn ZiMaskedLanguageModel>,
        max_candidates: usize,
        min_confidence: f64,
    ) -> Result<Self> {
        validate("masked_lm.insert", max_candidates, min_confidence)?;
        Ok(Self {
            settings: ZiMaskedLmSettings {
                model,
                max_candidates,
                min_confidence,
            },
        })
    }
}

impl ZiTransform for ZiWordInsertionMaskedLm {
    fn name(&self) -> &'static str {
        "masked_lm.insert"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        _rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let mask = self.settings.model.mask_token().to_string();
        let mut candidates = Vec::new();

        for &index in indices {
            if index > text.num_words() {
                continue;
            }
            let masked = text.insert_text_before_word_index(index, &mask)?;
            for token in self.settings.fill(&masked, &[])? {
                candidates.push(text.insert_text_before_word_index(index, &token)?);
            }
        }
        Ok(candidates)
    }
}

/// Merges two adjacent words into the model's predictions for a single mask.
#[derive(Debug)]
pub struct ZiWordMergeMaskedLm {
    settings: ZiMaskedLmSettings,
}

impl ZiWordMergeMaskedLm {
    #[allow(non_snake_case)]
    pub fn new(
        model: Arc<dyn ZiMaskedLanguageModel>,
        max_candidates: usize,
        min_confidence: f64,
    ) -> Result<Self> {
        validate("masked_lm.merge", max_candidates, min_confidence)?;
        Ok(Self {
            settings: ZiMaskedLmSettings {
                model,
                max_candidates,
                min_confidence,
            },
        })
    }
}

impl ZiTransform for ZiWordMergeMaskedLm {
    fn name(&self) -> &'static str {
        "masked_lm.merge"
    }

    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        _rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let mask = self.settings.model.mask_token().to_string();
        let mut candidates = Vec::new();

        for &index in indices {
            if !indices.contains(&(index + 1)) {
                continue;
            }
            let (Some(first), Some(second)) = (text.word(index), text.word(index + 1)) else {
                continue;
            };
            if text.column_of_word(index) != text.column_of_word(index + 1) {
                continue;
            }
            let masked = text.merge_words_at_index(index, &mask)?;
            for token in self.settings.fill(&masked, &[first, second])? {
                candidates.push(text.merge_words_at_index(index, &token)?);
            }
        }
        Ok(candidates)
    }
}

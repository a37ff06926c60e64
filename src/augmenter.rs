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

//! # Augmenter Module
//!
//! [`ZiAugmenter`] drives one transformation under a constraint chain to turn
//! an input text into up to `transformations_per_example` distinct variants.
//!
//! ## Algorithm
//!
//! For each requested variant the augmenter starts from the original text and
//! repeatedly:
//!
//! 1. asks the constraint chain which word indices are still eligible,
//! 2. lets the transformation propose candidates at those indices,
//! 3. drops candidates already produced during this call,
//! 4. keeps the candidates every post-transformation constraint accepts,
//! 5. continues from one accepted candidate chosen at random,
//!
//! until `max(floor(pct_words_to_swap * num_words), 1)` words are perturbed or
//! nothing acceptable remains. Results are deduplicated, shuffled and
//! truncated. Texts identical to the input are never returned.
//!
//! With `high_yield`, every accepted candidate that already perturbs enough
//! words is collected, not only the final one. With `fast_augment`, the loop
//! stops as soon as enough variants exist.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constraints::{ZiConstraint, ZiConstraintChain};
use crate::errors::{Result, ZiError};
use crate::rng::ZiRng;
use crate::text::ZiAttackedText;
use crate::transformation::ZiTransformation;

/// Shared augmentation knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiAugmenterConfig {
    /// Fraction of words to perturb per variant, in `[0, 1]`.
    pub pct_words_to_swap: f64,
    /// Maximum number of variants per input, at least 1.
    pub transformations_per_example: usize,
    pub high_yield: bool,
    pub fast_augment: bool,
}

impl Default for ZiAugmenterConfig {
    fn default() -> Self {
        Self {
            pct_words_to_swap: 0.1,
            transformations_per_example: 1,
            high_yield: false,
            fast_augment: false,
        }
    }
}

impl ZiAugmenterConfig {
    pub fn pct_words_to_swap(mut self, pct: f64) -> Self {
        self.pct_words_to_swap = pct;
        self
    }

    pub fn transformations_per_example(mut self, count: usize) -> Self {
        self.transformations_per_example = count;
        self
    }

    pub fn high_yield(mut self, enabled: bool) -> Self {
        self.high_yield = enabled;
        self
    }

    pub fn fast_augment(mut self, enabled: bool) -> Self {
        self.fast_augment = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pct_words_to_swap.is_finite() || !(0.0..=1.0).contains(&self.pct_words_to_swap) {
            return Err(ZiError::validation(format!(
                "pct_words_to_swap must be within [0, 1], got {}",
                self.pct_words_to_swap
            )));
        }
        if self.transformations_per_example == 0 {
            return Err(ZiError::validation(
                "transformations_per_example must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Transformation, constraints and selection policy bound together.
#[derive(Debug)]
pub struct ZiAugmenter {
    transformation: ZiTransformation,
    constraints: ZiConstraintChain,
    config: ZiAugmenterConfig,
    rng: ZiRng,
}

impl ZiAugmenter {
    #[allow(non_snake_case)]
    pub fn new(
        transformation: ZiTransformation,
        constraints: Vec<ZiConstraint>,
        config: ZiAugmenterConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transformation,
            constraints: ZiConstraintChain::new(constraints),
            config,
            rng,
        })
    }

    pub fn config(&self) -> &ZiAugmenterConfig {
        &self.config
    }

    pub fn transformation(&self) -> &ZiTransformation {
        &self.transformation
    }

    pub fn constraints(&self) -> &ZiConstraintChain {
        &self.constraints
    }

    pub fn rng(&self) -> &ZiRng {
        &self.rng
    }

    /// Perturbed variants of `original`, at most `transformations_per_example`.
    pub fn augment_text(&self, original: &ZiAttackedText) -> Result<Vec<ZiAttackedText>> {
        let num_words = original.num_words();
        if num_words == 0 {
            return Ok(Vec::new());
        }

        let wanted = self.config.transformations_per_example;
        let num_words_to_swap =
            ((self.config.pct_words_to_swap * num_words as f64).floor() as usize).max(1);
        let collect_ready = self.config.high_yield || self.config.fast_augment;

        let mut produced: Vec<ZiAttackedText> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(original.printable_text());

        for _ in 0..wanted {
            let mut current = original.clone();
            let mut words_swapped = current.modified_indices().len();

            while words_swapped < num_words_to_swap {
                let eligible = self.constraints.eligible_indices(&current)?;
                let candidates = self.transformation.apply(&current, &eligible, &self.rng)?;
                let fresh: Vec<ZiAttackedText> = candidates
                    .into_iter()
                    .filter(|candidate| !seen.contains(&candidate.printable_text()))
                    .collect();
                let accepted = self.constraints.filter_candidates(original, &current, fresh)?;
                if accepted.is_empty() {
                    break;
                }

                let next = if collect_ready {
                    let (ready, unfinished): (Vec<_>, Vec<_>) = accepted
                        .into_iter()
                        .partition(|c| c.modified_indices().len() >= num_words_to_swap);
                    for text in ready {
                        if seen.insert(text.printable_text()) {
                            produced.push(text);
                        }
                    }
                    match self.rng.choose(&unfinished) {
                        Some(text) => text.clone(),
                        None => break,
                    }
                } else {
                    match self.rng.choose(&accepted) {
                        Some(text) => text.clone(),
                        None => break,
                    }
                };

                current = next;
                words_swapped = current.modified_indices().len().max(words_swapped + 1);
            }

            if seen.insert(current.printable_text()) {
                produced.push(current);
            }
            if self.config.fast_augment && produced.len() >= wanted {
                break;
            }
        }

        self.rng.shuffle(&mut produced);
        produced.truncate(wanted);

        log::debug!(
            "augment.augmenter.augment: variants produced - transformation={}, words={}, to_swap={}, variants={}",
            self.transformation.name(),
            num_words,
            num_words_to_swap,
            produced.len()
        );
        Ok(produced)
    }

    pub fn augment(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .augment_text(&ZiAttackedText::new(text))?
            .iter()
            .map(ZiAttackedText::printable_text)
            .collect())
    }

    pub fn augment_many(&self, texts: &[&str]) -> Result<Vec<Vec<String>>> {
        texts.iter().map(|text| self.augment(text)).collect()
    }

    /// Each input followed by its variants, with `ids` repeated to match.
    pub fn augment_text_with_ids(
        &self,
        texts: &[&str],
        ids: &[String],
    ) -> Result<(Vec<String>, Vec<String>)> {
        if texts.len() != ids.len() {
            return Err(ZiError::validation(format!(
                "got {} texts but {} ids",
                texts.len(),
                ids.len()
            )));
        }

        let mut all_texts = Vec::new();
        let mut all_ids = Vec::new();
        for (text, id) in texts.iter().zip(ids) {
            let variants = self.augment(text)?;
            all_texts.push(text.to_string());
            all_ids.push(id.clone());
            all_ids.extend(std::iter::repeat(id.clone()).take(variants.len()));
            all_texts.extend(variants);
        }
        Ok((all_texts, all_ids))
    }
}

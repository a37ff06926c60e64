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

//! # Transformations Module
//!
//! A transformation takes a text and the set of word indices it may touch and
//! produces candidate perturbed texts. Atomic transformations implement
//! [`ZiTransform`]; [`ZiTransformation`] is the tagged variant a recipe holds,
//! either a single atomic transformation or a [`ZiCompositeTransformation`].
//!
//! ## Transformation Families
//!
//! - **word**: deletion, random inner swap, synonym swap and insertion,
//!   embedding neighbour swap
//! - **character**: neighbour swap, substitution, deletion, insertion,
//!   QWERTY typos, homoglyphs
//! - **checklist**: numbers, names, locations, contractions
//! - **masked_lm**: masked-language-model swap, insertion, merge
//! - **sentence**: back-translation
//!
//! ## Composite Strategies
//!
//! - `RandomOne`: children are tried in random order and the first one that
//!   yields candidates supplies all of them
//! - `All`: every child runs and the candidates are unioned
//! - `Weighted`: like `RandomOne` with a weighted visiting order

pub mod character;
pub mod checklist;
pub mod masked_lm;
pub mod sentence;
pub mod word;

use std::collections::{BTreeSet, HashSet};
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::rng::ZiRng;
use crate::text::ZiAttackedText;

pub use character::{
    ZiCharacterEditOptions, ZiWordSwapHomoglyphSwap, ZiWordSwapNeighboringCharacterSwap,
    ZiWordSwapQwerty, ZiWordSwapRandomCharacterDeletion, ZiWordSwapRandomCharacterInsertion,
    ZiWordSwapRandomCharacterSubstitution,
};
pub use checklist::{
    ZiWordSwapChangeLocation, ZiWordSwapChangeName, ZiWordSwapChangeNumber, ZiWordSwapContract,
    ZiWordSwapExtend,
};
pub use masked_lm::{ZiWordInsertionMaskedLm, ZiWordMergeMaskedLm, ZiWordSwapMaskedLm};
pub use sentence::ZiBackTranslation;
pub use word::{
    ZiWordDeletion, ZiWordInnerSwapRandom, ZiWordInsertionRandomSynonym, ZiWordSwapEmbedding,
    ZiWordSwapSynonym,
};

/// Contract every atomic transformation fulfills.
pub trait ZiTransform: Debug + Send + Sync {
    /// Unique, human-readable name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Candidate texts obtained by perturbing `text` at positions drawn from
    /// `indices`. An empty result is not an error.
    fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>>;
}

/// How a composite picks among its children on each call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ZiCompositeStrategy {
    RandomOne,
    All,
    Weighted(Vec<f64>),
}

impl Default for ZiCompositeStrategy {
    fn default() -> Self {
        Self::RandomOne
    }
}

/// Several atomic transformations presented as one. The child list is fixed
/// at construction.
#[derive(Debug)]
pub struct ZiCompositeTransformation {
    children: Vec<Box<dyn ZiTransform>>,
    strategy: ZiCompositeStrategy,
}

impl ZiCompositeTransformation {
    #[allow(non_snake_case)]
    pub fn new(children: Vec<Box<dyn ZiTransform>>, strategy: ZiCompositeStrategy) -> Result<Self> {
        if children.is_empty() {
            return Err(ZiError::validation(
                "composite transformation requires at least one child",
            ));
        }
        if let ZiCompositeStrategy::Weighted(weights) = &strategy {
            if weights.len() != children.len() {
                return Err(ZiError::validation(format!(
                    "composite transformation has {} children but {} weights",
                    children.len(),
                    weights.len()
                )));
            }
            if weights.iter().any(|w| !w.is_finite() || *w <= 0.0) {
                return Err(ZiError::validation(
                    "composite transformation weights must be positive",
                ));
            }
        }

        Ok(Self { children, strategy })
    }

    pub fn strategy(&self) -> &ZiCompositeStrategy {
        &self.strategy
    }

    pub fn children(&self) -> impl Iterator<Item = &dyn ZiTransform> {
        self.children.iter().map(|child| child.as_ref())
    }

    pub fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        let order = match &self.strategy {
            ZiCompositeStrategy::All => {
                let mut union = Vec::new();
                for child in &self.children {
                    union.extend(child.apply(text, indices, rng)?);
                }
                return Ok(dedupe_candidates(union));
            }
            ZiCompositeStrategy::RandomOne => {
                let mut order: Vec<usize> = (0..self.children.len()).collect();
                rng.shuffle(&mut order);
                order
            }
            ZiCompositeStrategy::Weighted(weights) => rng.weighted_order(weights)?,
        };

        for position in order {
            let child = &self.children[position];
            let candidates = child.apply(text, indices, rng)?;
            if !candidates.is_empty() {
                log::trace!(
                    "augment.transformation.composite: child selected - child={}, candidates={}",
                    child.name(),
                    candidates.len()
                );
                return Ok(candidates);
            }
        }
        Ok(Vec::new())
    }
}

/// The transformation bound into a recipe.
#[derive(Debug)]
pub enum ZiTransformation {
    Atomic(Box<dyn ZiTransform>),
    Composite(ZiCompositeTransformation),
}

impl ZiTransformation {
    pub fn atomic(transform: impl ZiTransform + 'static) -> Self {
        Self::Atomic(Box::new(transform))
    }

    pub fn composite(
        children: Vec<Box<dyn ZiTransform>>,
        strategy: ZiCompositeStrategy,
    ) -> Result<Self> {
        Ok(Self::Composite(ZiCompositeTransformation::new(children, strategy)?))
    }

    pub fn name(&self) -> String {
        match self {
            Self::Atomic(transform) => transform.name().to_string(),
            Self::Composite(composite) => format!(
                "composite({})",
                composite
                    .children()
                    .map(|child| child.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    pub fn apply(
        &self,
        text: &ZiAttackedText,
        indices: &BTreeSet<usize>,
        rng: &ZiRng,
    ) -> Result<Vec<ZiAttackedText>> {
        match self {
            Self::Atomic(transform) => transform.apply(text, indices, rng),
            Self::Composite(composite) => composite.apply(text, indices, rng),
        }
    }
}

/// Drops candidates whose printable text was already seen, keeping the first.
pub fn dedupe_candidates(candidates: Vec<ZiAttackedText>) -> Vec<ZiAttackedText> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.printable_text()))
        .collect()
}

/// One candidate per replacement word per eligible index, skipping
/// replacements equal to the current word.
pub(crate) fn word_swap_candidates<F>(
    text: &ZiAttackedText,
    indices: &BTreeSet<usize>,
    mut replacements: F,
) -> Result<Vec<ZiAttackedText>>
where
    F: FnMut(&str) -> Result<Vec<String>>,
{
    let mut candidates = Vec::new();
    for &index in indices {
        let Some(word) = text.word(index) else {
            continue;
        };
        let word = word.to_string();
        for replacement in replacements(&word)? {
            if replacement.is_empty() || replacement == word {
                continue;
            }
            candidates.push(text.replace_word_at_index(index, &replacement)?);
        }
    }
    Ok(candidates)
}

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

//! # Constraints Module
//!
//! Constraints decide where a transformation may act and which of its
//! candidates survive.
//!
//! - **Pre-transformation** constraints ([`ZiPreTransformationConstraint`])
//!   narrow the set of word indices a transformation is allowed to touch.
//! - **Post-transformation** constraints ([`ZiPostTransformationConstraint`])
//!   accept or reject a candidate against a reference text, either the
//!   original input or the text the candidate was derived from.
//!
//! [`ZiConstraintChain`] keeps the declared order and evaluates the list as a
//! conjunction: eligible indices are the intersection of every pre filter,
//! and a candidate is accepted only when every post check passes.

pub mod grammar;
pub mod overlap;
pub mod pre;
pub mod semantics;

use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::errors::Result;
use crate::text::ZiAttackedText;

pub use grammar::ZiPartOfSpeech;
pub use overlap::{ZiLevenshteinEditDistance, ZiMaxWordsPerturbed};
pub use pre::{
    ZiInputColumnModification, ZiMinWordLength, ZiRepeatModification, ZiStopwordModification,
};
pub use semantics::{ZiSentenceEncoderConstraint, ZiSimilarityMetric, ZiWordEmbeddingDistance};

/// Restricts the word indices a transformation may modify.
pub trait ZiPreTransformationConstraint: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Indices of `text` this constraint leaves open for modification.
    fn filter_indices(&self, text: &ZiAttackedText) -> Result<BTreeSet<usize>>;
}

/// Accepts or rejects a candidate text.
pub trait ZiPostTransformationConstraint: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, candidate: &ZiAttackedText, reference: &ZiAttackedText) -> Result<bool>;

    /// Whether `reference` is the original input (`true`) or the text the
    /// candidate was produced from (`false`).
    fn compare_against_original(&self) -> bool {
        true
    }
}

/// A constraint as held by a recipe.
#[derive(Debug)]
pub enum ZiConstraint {
    Pre(Box<dyn ZiPreTransformationConstraint>),
    Post(Box<dyn ZiPostTransformationConstraint>),
}

impl ZiConstraint {
    pub fn pre(constraint: impl ZiPreTransformationConstraint + 'static) -> Self {
        Self::Pre(Box::new(constraint))
    }

    pub fn post(constraint: impl ZiPostTransformationConstraint + 'static) -> Self {
        Self::Post(Box::new(constraint))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pre(constraint) => constraint.name(),
            Self::Post(constraint) => constraint.name(),
        }
    }
}

/// Ordered constraint list split into its pre and post halves.
#[derive(Debug, Default)]
pub struct ZiConstraintChain {
    pre: Vec<Box<dyn ZiPreTransformationConstraint>>,
    post: Vec<Box<dyn ZiPostTransformationConstraint>>,
}

impl ZiConstraintChain {
    #[allow(non_snake_case)]
    pub fn new(constraints: Vec<ZiConstraint>) -> Self {
        let mut chain = Self::default();
        for constraint in constraints {
            match constraint {
                ZiConstraint::Pre(c) => chain.pre.push(c),
                ZiConstraint::Post(c) => chain.post.push(c),
            }
        }
        chain
    }

    pub fn len(&self) -> usize {
        self.pre.len() + self.post.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names in declaration order within each half, pre constraints first.
    pub fn names(&self) -> Vec<&'static str> {
        self.pre
            .iter()
            .map(|c| c.name())
            .chain(self.post.iter().map(|c| c.name()))
            .collect()
    }

    /// Every word index of `text` that all pre constraints leave open.
    pub fn eligible_indices(&self, text: &ZiAttackedText) -> Result<BTreeSet<usize>> {
        let mut eligible: BTreeSet<usize> = (0..text.num_words()).collect();
        for constraint in &self.pre {
            if eligible.is_empty() {
                break;
            }
            let allowed = constraint.filter_indices(text)?;
            eligible.retain(|index| allowed.contains(index));
        }
        Ok(eligible)
    }

    /// Stops at the first post constraint that rejects `candidate`.
    pub fn is_acceptable(
        &self,
        original: &ZiAttackedText,
        current: &ZiAttackedText,
        candidate: &ZiAttackedText,
    ) -> Result<bool> {
        for constraint in &self.post {
            let reference = if constraint.compare_against_original() {
                original
            } else {
                current
            };
            if !constraint.check(candidate, reference)? {
                log::trace!(
                    "augment.constraint.reject: candidate rejected - constraint={}",
                    constraint.name()
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn filter_candidates(
        &self,
        original: &ZiAttackedText,
        current: &ZiAttackedText,
        candidates: Vec<ZiAttackedText>,
    ) -> Result<Vec<ZiAttackedText>> {
        let mut accepted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if self.is_acceptable(original, current, &candidate)? {
                accepted.push(candidate);
            }
        }
        Ok(accepted)
    }
}

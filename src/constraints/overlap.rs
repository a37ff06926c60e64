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

//! # Overlap Constraints
//!
//! Bounds on how far a candidate may drift from its reference, measured in
//! perturbed words or in character edits.

use crate::constraints::ZiPostTransformationConstraint;
use crate::errors::{Result, ZiError};
use crate::text::ZiAttackedText;

/// Character-level Levenshtein distance.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let chars1: Vec<char> = s1.chars().collect();
    let chars2: Vec<char> = s2.chars().collect();

    let len1 = chars1.len();
    let len2 = chars2.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Two rolling rows of the full matrix.
    let mut previous: Vec<usize> = (0..=len2).collect();
    let mut current = vec![0; len2 + 1];

    for i in 1..=len1 {
        current[0] = i;
        for j in 1..=len2 {
            let cost = if chars1[i - 1] == chars2[j - 1] { 0 } else { 1 };
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[len2]
}

/// Rejects candidates more than `max_edit_distance` character edits away.
#[derive(Debug, Clone)]
pub struct ZiLevenshteinEditDistance {
    max_edit_distance: usize,
    compare_against_original: bool,
}

impl ZiLevenshteinEditDistance {
    #[allow(non_snake_case)]
    pub fn new(max_edit_distance: usize) -> Self {
        Self {
            max_edit_distance,
            compare_against_original: true,
        }
    }

    pub fn with_compare_against_original(mut self, enabled: bool) -> Self {
        self.compare_against_original = enabled;
        self
    }
}

impl ZiPostTransformationConstraint for ZiLevenshteinEditDistance {
    fn name(&self) -> &'static str {
        "levenshtein_edit_distance"
    }

    fn check(&self, candidate: &ZiAttackedText, reference: &ZiAttackedText) -> Result<bool> {
        let distance =
            levenshtein_distance(&reference.printable_text(), &candidate.printable_text());
        Ok(distance <= self.max_edit_distance)
    }

    fn compare_against_original(&self) -> bool {
        self.compare_against_original
    }
}

/// Caps the number of perturbed words, absolutely and as a share of the
/// reference's word count.
#[derive(Debug, Clone)]
pub struct ZiMaxWordsPerturbed {
    max_num_words: Option<usize>,
    max_percent: Option<f64>,
    compare_against_original: bool,
}

impl ZiMaxWordsPerturbed {
    #[allow(non_snake_case)]
    pub fn new(max_num_words: Option<usize>, max_percent: Option<f64>) -> Result<Self> {
        if max_num_words.is_none() && max_percent.is_none() {
            return Err(ZiError::constraint(
                "max_words_perturbed",
                "either 'max_num_words' or 'max_percent' must be set",
            ));
        }
        if let Some(percent) = max_percent {
            if !(0.0..=1.0).contains(&percent) {
                return Err(ZiError::constraint(
                    "max_words_perturbed",
                    format!("'max_percent' must be within [0, 1], got {percent}"),
                ));
            }
        }
        Ok(Self {
            max_num_words,
            max_percent,
            compare_against_original: true,
        })
    }

    pub fn with_compare_against_original(mut self, enabled: bool) -> Self {
        self.compare_against_original = enabled;
        self
    }
}

impl ZiPostTransformationConstraint for ZiMaxWordsPerturbed {
    fn name(&self) -> &'static str {
        "max_words_perturbed"
    }

    fn check(&self, candidate: &ZiAttackedText, reference: &ZiAttackedText) -> Result<bool> {
        let perturbed = candidate.words_perturbed();

        if let Some(max_num_words) = self.max_num_words {
            if perturbed > max_num_words {
                return Ok(false);
            }
        }
        if let Some(max_percent) = self.max_percent {
            let limit = (max_percent * reference.num_words() as f64).ceil() as usize;
            if perturbed > limit {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn compare_against_original(&self) -> bool {
        self.compare_against_original
    }
}

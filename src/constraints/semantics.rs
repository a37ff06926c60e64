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

//! # Semantic Constraints
//!
//! Candidates must stay close in meaning to their reference, judged either
//! word by word through an embedding or over the whole text (or a window of
//! it) through a sentence encoder.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constraints::ZiPostTransformationConstraint;
use crate::errors::{Result, ZiError};
use crate::resources::{cosine_similarity, ZiSentenceEncoder, ZiWordEmbedding};
use crate::text::ZiAttackedText;

/// Requires every replaced word to stay within `min_cos_sim` of the word it
/// replaced. Words the embedding does not know are accepted.
#[derive(Debug)]
pub struct ZiWordEmbeddingDistance {
    embedding: Arc<dyn ZiWordEmbedding>,
    min_cos_sim: f64,
}

impl ZiWordEmbeddingDistance {
    #[allow(non_snake_case)]
    pub fn new(embedding: Arc<dyn ZiWordEmbedding>, min_cos_sim: f64) -> Result<Self> {
        if !(-1.0..=1.0).contains(&min_cos_sim) {
            return Err(ZiError::constraint(
                "word_embedding_distance",
                format!("'min_cos_sim' must be within [-1, 1], got {min_cos_sim}"),
            ));
        }
        Ok(Self {
            embedding,
            min_cos_sim,
        })
    }
}

impl ZiPostTransformationConstraint for ZiWordEmbeddingDistance {
    fn name(&self) -> &'static str {
        "word_embedding_distance"
    }

    fn check(&self, candidate: &ZiAttackedText, reference: &ZiAttackedText) -> Result<bool> {
        for &index in candidate.newly_modified_indices() {
            let (Some(before), Some(after)) = (reference.word(index), candidate.word(index)) else {
                continue;
            };
            let (before, after) = (before.to_lowercase(), after.to_lowercase());
            if before == after {
                continue;
            }
            match self.embedding.cosine_similarity(&before, &after)? {
                Some(similarity) if similarity < self.min_cos_sim => return Ok(false),
                _ => {}
            }
        }
        Ok(true)
    }
}

/// How two sentence vectors are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZiSimilarityMetric {
    #[default]
    Cosine,
    /// `1 - acos(cos) / pi`
    Angular,
}

impl ZiSimilarityMetric {
    pub fn score(&self, a: &[f32], b: &[f32]) -> f64 {
        let cosine = cosine_similarity(a, b).clamp(-1.0, 1.0);
        match self {
            Self::Cosine => cosine,
            Self::Angular => 1.0 - cosine.acos() / std::f64::consts::PI,
        }
    }
}

/// Requires the encoded candidate to stay within `threshold` of the encoded
/// reference.
#[derive(Debug)]
pub struct ZiSentenceEncoderConstraint {
    encoder: Arc<dyn ZiSentenceEncoder>,
    threshold: f64,
    metric: ZiSimilarityMetric,
    compare_against_original: bool,
    window_size: Option<usize>,
    skip_text_shorter_than_window: bool,
}

impl ZiSentenceEncoderConstraint {
    /// Cosine metric, whole-text comparison against the original input.
    #[allow(non_snake_case)]
    pub fn new(encoder: Arc<dyn ZiSentenceEncoder>, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
            return Err(ZiError::constraint(
                "sentence_encoder",
                format!("'threshold' must be within [-1, 1], got {threshold}"),
            ));
        }
        Ok(Self {
            encoder,
            threshold,
            metric: ZiSimilarityMetric::Cosine,
            compare_against_original: true,
            window_size: None,
            skip_text_shorter_than_window: false,
        })
    }

    pub fn metric(mut self, metric: ZiSimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_compare_against_original(mut self, enabled: bool) -> Self {
        self.compare_against_original = enabled;
        self
    }

    /// Compares windows of `window_size` words around the first newly
    /// modified index instead of whole texts.
    pub fn window(mut self, window_size: usize, skip_text_shorter_than_window: bool) -> Result<Self> {
        if window_size == 0 {
            return Err(ZiError::constraint(
                "sentence_encoder",
                "'window_size' must be positive",
            ));
        }
        self.window_size = Some(window_size);
        self.skip_text_shorter_than_window = skip_text_shorter_than_window;
        Ok(self)
    }

    fn compared_texts(
        &self,
        candidate: &ZiAttackedText,
        reference: &ZiAttackedText,
    ) -> (String, String) {
        let focus = candidate.newly_modified_indices().iter().next().copied();
        match (self.window_size, focus) {
            (Some(window), Some(index)) => (
                reference.text_window_around_index(index, window),
                candidate.text_window_around_index(index, window),
            ),
            _ => (reference.text(), candidate.text()),
        }
    }
}

impl ZiPostTransformationConstraint for ZiSentenceEncoderConstraint {
    fn name(&self) -> &'static str {
        "sentence_encoder"
    }

    fn check(&self, candidate: &ZiAttackedText, reference: &ZiAttackedText) -> Result<bool> {
        if let Some(window) = self.window_size {
            if self.skip_text_shorter_than_window && reference.num_words() < window {
                return Ok(true);
            }
        }

        let (before, after) = self.compared_texts(candidate, reference);
        if before == after {
            return Ok(true);
        }

        let vectors = self.encoder.encode(&[before, after])?;
        let [first, second] = vectors.as_slice() else {
            return Err(ZiError::constraint(
                self.name(),
                format!("encoder returned {} vectors for 2 sentences", vectors.len()),
            ));
        };
        Ok(self.metric.score(first, second) >= self.threshold)
    }

    fn compare_against_original(&self) -> bool {
        self.compare_against_original
    }
}

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

//! # External Resources Module
//!
//! ZiAug does not ship lexical databases, embedding models, language models,
//! taggers or translators. Each of these capabilities is described by a
//! trait here and injected into the transformations and constraints that
//! need it.
//!
//! ## Capability Traits
//!
//! - [`ZiSynonymSource`]: synonym lookup (WordNet or any thesaurus)
//! - [`ZiWordEmbedding`]: word vectors, nearest neighbours, cosine similarity
//! - [`ZiMaskedLanguageModel`]: fill-mask predictions
//! - [`ZiSentenceEncoder`]: sentence vectors
//! - [`ZiPartOfSpeechTagger`]: per-word universal POS tags
//! - [`ZiTranslator`]: machine translation between language codes
//!
//! ## Bundled Implementations
//!
//! - [`lexicon`]: in-memory or file-backed synonym table and a lexicon tagger
//! - [`embedding`]: in-memory or file-backed embedding table and a
//!   mean-of-word-vectors sentence encoder
//!
//! File-backed tables load on first use, so a missing file surfaces as
//! [`ZiError::ResourceUnavailable`] from the first `augment` call rather than
//! from recipe construction.

pub mod embedding;
pub mod lexicon;

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::rng::ZiRng;

pub use embedding::{ZiEmbeddingTable, ZiMeanEmbeddingEncoder};
pub use lexicon::{ZiLexiconTagger, ZiSynonymTable};

/// Synonym lookup.
pub trait ZiSynonymSource: Debug + Send + Sync {
    /// Synonyms of `word`, excluding the word itself. Unknown words yield an
    /// empty list.
    fn synonyms(&self, word: &str) -> Result<Vec<String>>;
}

/// Word vectors.
pub trait ZiWordEmbedding: Debug + Send + Sync {
    /// Up to `k` nearest neighbours of `word`, most similar first. Unknown
    /// words yield an empty list.
    fn nearest_neighbours(&self, word: &str, k: usize) -> Result<Vec<String>>;

    /// Cosine similarity of two words, `None` when either is unknown.
    fn cosine_similarity(&self, a: &str, b: &str) -> Result<Option<f64>>;

    /// The vector of `word`, `None` when unknown.
    fn vector(&self, word: &str) -> Result<Option<Vec<f32>>>;

    /// Length of every vector in the embedding.
    fn dimension(&self) -> Result<usize>;
}

/// One fill-mask prediction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiTokenScore {
    pub token: String,
    pub probability: f64,
}

/// Masked language model.
pub trait ZiMaskedLanguageModel: Debug + Send + Sync {
    /// Model identifier used in logs.
    fn name(&self) -> &str;

    /// The placeholder the model expects in masked input.
    fn mask_token(&self) -> &str {
        "<mask>"
    }

    /// Top `max_candidates` predictions for the single mask in `masked_text`,
    /// most probable first.
    fn fill_mask(&self, masked_text: &str, max_candidates: usize) -> Result<Vec<ZiTokenScore>>;
}

/// Sentence encoder.
pub trait ZiSentenceEncoder: Debug + Send + Sync {
    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Part-of-speech tagger producing universal tags (`NOUN`, `VERB`, ...).
pub trait ZiPartOfSpeechTagger: Debug + Send + Sync {
    /// One tag per word, in order.
    fn tag(&self, words: &[&str]) -> Result<Vec<String>>;
}

/// Machine translation.
pub trait ZiTranslator: Debug + Send + Sync {
    /// Language codes the translator can target.
    fn supported_languages(&self) -> Vec<String>;

    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}

/// Capability handles a recipe may draw on, plus the shared random source.
///
/// The registry uses this bundle to build recipes by name; recipe types can
/// also be constructed directly from the individual handles.
#[derive(Clone, Debug, Default)]
pub struct ZiRecipeResources {
    pub rng: ZiRng,
    pub synonyms: Option<Arc<dyn ZiSynonymSource>>,
    pub embedding: Option<Arc<dyn ZiWordEmbedding>>,
    pub masked_lm: Option<Arc<dyn ZiMaskedLanguageModel>>,
    pub sentence_encoder: Option<Arc<dyn ZiSentenceEncoder>>,
    pub pos_tagger: Option<Arc<dyn ZiPartOfSpeechTagger>>,
    pub translator: Option<Arc<dyn ZiTranslator>>,
}

impl ZiRecipeResources {
    pub fn new(rng: ZiRng) -> Self {
        Self {
            rng,
            ..Default::default()
        }
    }

    pub fn with_synonyms(mut self, synonyms: Arc<dyn ZiSynonymSource>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    pub fn with_embedding(mut self, embedding: Arc<dyn ZiWordEmbedding>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_masked_lm(mut self, model: Arc<dyn ZiMaskedLanguageModel>) -> Self {
        self.masked_lm = Some(model);
        self
    }

    pub fn with_sentence_encoder(mut self, encoder: Arc<dyn ZiSentenceEncoder>) -> Self {
        self.sentence_encoder = Some(encoder);
        self
    }

    pub fn with_pos_tagger(mut self, tagger: Arc<dyn ZiPartOfSpeechTagger>) -> Self {
        self.pos_tagger = Some(tagger);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn ZiTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn require_synonyms(&self) -> Result<Arc<dyn ZiSynonymSource>> {
        self.synonyms
            .clone()
            .ok_or_else(|| missing("synonyms"))
    }

    pub fn require_embedding(&self) -> Result<Arc<dyn ZiWordEmbedding>> {
        self.embedding
            .clone()
            .ok_or_else(|| missing("embedding"))
    }

    pub fn require_masked_lm(&self) -> Result<Arc<dyn ZiMaskedLanguageModel>> {
        self.masked_lm
            .clone()
            .ok_or_else(|| missing("masked_lm"))
    }

    pub fn require_sentence_encoder(&self) -> Result<Arc<dyn ZiSentenceEncoder>> {
        self.sentence_encoder
            .clone()
            .ok_or_else(|| missing("sentence_encoder"))
    }

    pub fn require_pos_tagger(&self) -> Result<Arc<dyn ZiPartOfSpeechTagger>> {
        self.pos_tagger
            .clone()
            .ok_or_else(|| missing("pos_tagger"))
    }

    pub fn require_translator(&self) -> Result<Arc<dyn ZiTranslator>> {
        self.translator
            .clone()
            .ok_or_else(|| missing("translator"))
    }
}

fn missing(resource: &str) -> ZiError {
    ZiError::resource_unavailable(resource, "no handle was provided in the recipe resources")
}

/// Cosine similarity of two equally sized vectors; 0 for zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += *x as f64 * *y as f64;
        norm_a += *x as f64 * *x as f64;
        norm_b += *y as f64 * *y as f64;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

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

//! # Attack Recipes
//!
//! Augmenters adapted from adversarial attacks: CLARE (masked-LM replace,
//! insert and merge), TextBugger (character bugs plus embedding swaps) and
//! TextFooler (embedding swaps under strict semantic constraints).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::augmenter::{ZiAugmenter, ZiAugmenterConfig};
use crate::constraints::{
    ZiConstraint, ZiInputColumnModification, ZiPartOfSpeech, ZiRepeatModification,
    ZiSentenceEncoderConstraint, ZiSimilarityMetric, ZiStopwordModification,
    ZiWordEmbeddingDistance,
};
use crate::errors::Result;
use crate::recipes::{
    augmenter_config_from_value, augmenter_recipe, bind_augmenter, default_constraints,
    recipe_options_from_value, rng_from_value, ZiRecipe,
};
use crate::resources::{
    ZiMaskedLanguageModel, ZiPartOfSpeechTagger, ZiRecipeResources, ZiSentenceEncoder,
    ZiWordEmbedding,
};
use crate::rng::ZiRng;
use crate::transformation::{
    ZiCharacterEditOptions, ZiCompositeStrategy, ZiTransform, ZiTransformation,
    ZiWordInsertionMaskedLm, ZiWordMergeMaskedLm, ZiWordSwapEmbedding, ZiWordSwapHomoglyphSwap,
    ZiWordSwapMaskedLm, ZiWordSwapNeighboringCharacterSwap, ZiWordSwapRandomCharacterDeletion,
    ZiWordSwapRandomCharacterInsertion,
};

/// Options of [`ZiClareRecipe`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiClareRecipeConfig {
    pub max_candidates: usize,
    pub swap_min_confidence: f64,
    pub insert_min_confidence: f64,
    pub merge_min_confidence: f64,
    pub similarity_threshold: f64,
    pub window_size: usize,
}

impl Default for ZiClareRecipeConfig {
    fn default() -> Self {
        Self {
            max_candidates: 50,
            swap_min_confidence: 5e-4,
            insert_min_confidence: 0.0,
            merge_min_confidence: 5e-3,
            similarity_threshold: 0.7,
            window_size: 15,
        }
    }
}

/// Contextual replace, insert and merge (Li et al., 2020).
#[derive(Debug)]
pub struct ZiClareRecipe {
    augmenter: ZiAugmenter,
}

impl ZiClareRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        model: Arc<dyn ZiMaskedLanguageModel>,
        encoder: Arc<dyn ZiSentenceEncoder>,
        config: ZiAugmenterConfig,
        options: ZiClareRecipeConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let children: Vec<Box<dyn ZiTransform>> = vec![
            Box::new(ZiWordSwapMaskedLm::new(
                model.clone(),
                options.max_candidates,
                options.swap_min_confidence,
            )?),
            Box::new(ZiWordInsertionMaskedLm::new(
                model.clone(),
                options.max_candidates,
                options.insert_min_confidence,
            )?),
            Box::new(ZiWordMergeMaskedLm::new(
                model,
                options.max_candidates,
                options.merge_min_confidence,
            )?),
        ];
        let transformation = ZiTransformation::composite(children, ZiCompositeStrategy::All)?;

        let encoder_constraint =
            ZiSentenceEncoderConstraint::new(encoder, options.similarity_threshold)?
                .metric(ZiSimilarityMetric::Cosine)
                .with_compare_against_original(true)
                .window(options.window_size, true)?;
        let mut constraints = default_constraints();
        constraints.push(ZiConstraint::post(encoder_constraint));

        let augmenter = bind_augmenter("clare", transformation, constraints, config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiClareRecipe, "clare");

/// Character bugs and embedding swaps (Li et al., 2018).
#[derive(Debug)]
pub struct ZiTextBuggerRecipe {
    augmenter: ZiAugmenter,
}

impl ZiTextBuggerRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        embedding: Arc<dyn ZiWordEmbedding>,
        encoder: Arc<dyn ZiSentenceEncoder>,
        config: ZiAugmenterConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let inner = ZiCharacterEditOptions::default()
            .random_one(true)
            .skip_first_char(true)
            .skip_last_char(true);
        let children: Vec<Box<dyn ZiTransform>> = vec![
            // A space splits the word in two.
            Box::new(ZiWordSwapRandomCharacterInsertion::with_letters(inner, " ")?),
            Box::new(ZiWordSwapRandomCharacterDeletion::new(inner)),
            Box::new(ZiWordSwapNeighboringCharacterSwap::new(inner)),
            Box::new(ZiWordSwapHomoglyphSwap::new(false)),
            Box::new(ZiWordSwapEmbedding::new(embedding, 5)?),
        ];
        let transformation =
            ZiTransformation::composite(children, ZiCompositeStrategy::RandomOne)?;

        let mut constraints = default_constraints();
        constraints.push(ZiConstraint::post(
            ZiSentenceEncoderConstraint::new(encoder, 0.8)?.metric(ZiSimilarityMetric::Angular),
        ));

        let augmenter = bind_augmenter("textbugger", transformation, constraints, config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiTextBuggerRecipe, "textbugger");

/// Angular similarity floor matching a cosine of about 0.5 between sentence
/// vectors.
const ZI_TEXTFOOLER_SIMILARITY: f64 = 0.840845057;

/// Embedding swaps under stopword, column, embedding, part-of-speech and
/// sentence similarity constraints (Jin et al., 2019).
#[derive(Debug)]
pub struct ZiTextFoolerRecipe {
    augmenter: ZiAugmenter,
}

impl ZiTextFoolerRecipe {
    #[allow(non_snake_case)]
    pub fn new(
        embedding: Arc<dyn ZiWordEmbedding>,
        tagger: Arc<dyn ZiPartOfSpeechTagger>,
        encoder: Arc<dyn ZiSentenceEncoder>,
        config: ZiAugmenterConfig,
        rng: ZiRng,
    ) -> Result<Self> {
        let transformation =
            ZiTransformation::atomic(ZiWordSwapEmbedding::new(embedding.clone(), 50)?);

        let encoder_constraint = ZiSentenceEncoderConstraint::new(encoder, ZI_TEXTFOOLER_SIMILARITY)?
            .metric(ZiSimilarityMetric::Angular)
            .with_compare_against_original(false)
            .window(15, true)?;
        let constraints = vec![
            ZiConstraint::pre(ZiRepeatModification),
            ZiConstraint::pre(ZiStopwordModification::textfooler()),
            // Entailment pairs only perturb the hypothesis.
            ZiConstraint::pre(ZiInputColumnModification::new(
                ["premise", "hypothesis"],
                ["premise"],
            )),
            ZiConstraint::post(ZiWordEmbeddingDistance::new(embedding, 0.5)?),
            ZiConstraint::post(ZiPartOfSpeech::new(tagger, true)),
            ZiConstraint::post(encoder_constraint),
        ];

        let augmenter = bind_augmenter("textfooler", transformation, constraints, config, rng)?;
        Ok(Self { augmenter })
    }
}

augmenter_recipe!(ZiTextFoolerRecipe, "textfooler");

pub(crate) fn clare_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiClareRecipe::new(
        resources.require_masked_lm()?,
        resources.require_sentence_encoder()?,
        augmenter_config_from_value(config, "clare")?,
        recipe_options_from_value(config, "clare")?,
        rng_from_value(config, resources, "clare")?,
    )?))
}

pub(crate) fn textbugger_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiTextBuggerRecipe::new(
        resources.require_embedding()?,
        resources.require_sentence_encoder()?,
        augmenter_config_from_value(config, "textbugger")?,
        rng_from_value(config, resources, "textbugger")?,
    )?))
}

pub(crate) fn textfooler_factory(
    config: &Value,
    resources: &ZiRecipeResources,
) -> Result<Box<dyn ZiRecipe + Send + Sync>> {
    Ok(Box::new(ZiTextFoolerRecipe::new(
        resources.require_embedding()?,
        resources.require_pos_tagger()?,
        resources.require_sentence_encoder()?,
        augmenter_config_from_value(config, "textfooler")?,
        rng_from_value(config, resources, "textfooler")?,
    )?))
}
